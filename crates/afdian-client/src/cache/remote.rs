/*
[INPUT]:  Redis host/port, cache key, serialized aggregate, expiry timestamp
[OUTPUT]: Stored value for a key; SET + EXPIREAT writes
[POS]:    Cache layer - remote key-value backend
[UPDATE]: When key layout or expiry semantics change
*/

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use redis::AsyncCommands;
use redis::aio::MultiplexedConnection;

use crate::cache::store::KeyValueStore;
use crate::http::{AfdianError, Result};

/// Redis cache; every command is bounded by `timeout`
#[derive(Clone)]
pub struct RedisCache {
    connection: MultiplexedConnection,
    timeout: Duration,
}

impl std::fmt::Debug for RedisCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisCache")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl RedisCache {
    /// Connection URL for a host and port
    pub fn url(host: &str, port: u16) -> String {
        format!("redis://{host}:{port}/")
    }

    /// Open a multiplexed connection
    pub async fn connect(host: &str, port: u16, timeout: Duration) -> Result<Self> {
        let url = Self::url(host, port);
        let client = redis::Client::open(url.as_str())?;
        let connection = bounded(timeout, client.get_multiplexed_async_connection()).await?;
        tracing::debug!(redis_url = %url, "redis connection established");
        Ok(Self {
            connection,
            timeout,
        })
    }

    /// GET key
    pub async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut connection = self.connection.clone();
        bounded(self.timeout, connection.get::<_, Option<String>>(key)).await
    }

    /// SET key value, then EXPIREAT key expire_at (Unix seconds)
    pub async fn set_until(&self, key: &str, value: &str, expire_at: i64) -> Result<()> {
        let mut connection = self.connection.clone();
        let mut pipe = redis::pipe();
        pipe.atomic()
            .set(key, value)
            .ignore()
            .expire_at(key, expire_at)
            .ignore();
        bounded(self.timeout, pipe.query_async::<()>(&mut connection)).await
    }
}

#[async_trait]
impl KeyValueStore for RedisCache {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        RedisCache::get(self, key).await
    }

    async fn set_until(&self, key: &str, value: &str, expire_at: i64) -> Result<()> {
        RedisCache::set_until(self, key, value, expire_at).await
    }
}

async fn bounded<T, F>(timeout: Duration, operation: F) -> Result<T>
where
    F: Future<Output = redis::RedisResult<T>>,
{
    match tokio::time::timeout(timeout, operation).await {
        Ok(result) => Ok(result?),
        Err(_) => Err(AfdianError::Cache(format!(
            "redis operation timed out after {}s",
            timeout.as_secs()
        ))),
    }
}
