/*
[INPUT]:  Cache key, serialized aggregate, expiry timestamp
[OUTPUT]: Stored value for a key
[POS]:    Cache layer - seam for remote key-value backends
[UPDATE]: When the remote read/write contract changes
*/

use async_trait::async_trait;

use crate::http::Result;

/// Remote key-value store holding serialized aggregates
#[async_trait]
pub trait KeyValueStore: Send + Sync + std::fmt::Debug {
    /// Value under `key`, `None` when absent or expired
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key` until `expire_at` (Unix seconds)
    async fn set_until(&self, key: &str, value: &str, expire_at: i64) -> Result<()>;
}
