/*
[INPUT]:  API schema definitions and serde requirements
[OUTPUT]: Typed Rust request structs with serialization support
[POS]:    Data layer - type definitions for API communication
[UPDATE]: When API schema changes or new types added
*/

use serde::{Deserialize, Serialize};

/// Body POSTed to every open API endpoint.
///
/// `params` holds the JSON text that was signed, not a nested object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignedEnvelope {
    pub user_id: String,
    pub params: String,
    pub ts: i64,
    pub sign: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageParams {
    pub page: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PingParams {
    pub ping: String,
}

impl Default for PingParams {
    fn default() -> Self {
        Self {
            ping: "hello world".to_string(),
        }
    }
}
