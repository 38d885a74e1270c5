/*
[INPUT]:  API schema definitions and serde requirements
[OUTPUT]: Typed Rust enums with serialization support
[POS]:    Data layer - type definitions for API communication
[UPDATE]: When API schema changes or new types added
*/

use serde::{Deserialize, Serialize};

/// Where an aggregate came from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheState {
    /// Freshly fetched from the API
    #[default]
    None,
    /// Served from a cache backend
    Cached,
}

/// Paged list resources exposed by the open API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Orders,
    Sponsors,
}

impl ResourceKind {
    /// Endpoint name under the API root
    pub fn endpoint(self) -> &'static str {
        match self {
            ResourceKind::Orders => "query-order",
            ResourceKind::Sponsors => "query-sponsor",
        }
    }

    /// Key the aggregate is stored under on a remote cache
    pub fn cache_key(self) -> &'static str {
        match self {
            ResourceKind::Orders => "afdian-orders-cache",
            ResourceKind::Sponsors => "afdian-sponsors-cache",
        }
    }

    /// Default local cache file
    pub fn default_cache_file(self) -> &'static str {
        match self {
            ResourceKind::Orders => "order_cache.json",
            ResourceKind::Sponsors => "sponsor_cache.json",
        }
    }
}
