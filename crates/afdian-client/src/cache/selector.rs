/*
[INPUT]:  TTL, cache backend choice, live API access
[OUTPUT]: Aggregate tagged as cached or freshly fetched
[POS]:    Cache layer - read-through cache around the pagination walk
[UPDATE]: When freshness rules or backend fallbacks change
*/

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;

use crate::cache::{CacheBackend, FileCache, KeyValueStore, RedisCache, decode_entry, encode_entry};
use crate::http::{AfdianClient, Result};
use crate::types::{Aggregate, CacheState, Order, Record, ResourceKind, Sponsor};

/// A backend opened for one call
enum CacheStore {
    File(FileCache),
    Remote(Arc<dyn KeyValueStore>),
}

impl CacheStore {
    async fn read(&self, kind: ResourceKind, ttl: Duration) -> Option<String> {
        match self {
            CacheStore::File(cache) => cache.read_fresh(ttl).await,
            CacheStore::Remote(store) => match store.get(kind.cache_key()).await {
                Ok(value) => value,
                Err(err) => {
                    tracing::warn!(key = kind.cache_key(), error = %err, "remote cache read failed");
                    None
                }
            },
        }
    }

    async fn write(&self, kind: ResourceKind, value: &str, ttl: Duration) -> Result<()> {
        match self {
            CacheStore::File(cache) => cache.write(value).await,
            CacheStore::Remote(store) => {
                let expire_at = expiry_after(Utc::now().timestamp(), ttl);
                store.set_until(kind.cache_key(), value, expire_at).await
            }
        }
    }
}

/// `now + ttl` in Unix seconds, saturating at `i64::MAX`
fn expiry_after(now: i64, ttl: Duration) -> i64 {
    now.saturating_add(i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX))
}

impl AfdianClient {
    /// Every order, served from cache when fresh
    pub async fn get_all_orders(
        &self,
        ttl_seconds: u64,
        backend: &CacheBackend,
    ) -> Result<Aggregate<Order>> {
        self.get_all(ttl_seconds, backend).await
    }

    /// Every sponsor, served from cache when fresh
    pub async fn get_all_sponsors(
        &self,
        ttl_seconds: u64,
        backend: &CacheBackend,
    ) -> Result<Aggregate<Sponsor>> {
        self.get_all(ttl_seconds, backend).await
    }

    /// Every order, with the backend given as a legacy descriptor string
    pub async fn get_all_orders_with_descriptor(
        &self,
        ttl_seconds: u64,
        descriptor: &str,
    ) -> Result<Aggregate<Order>> {
        self.get_all_with_descriptor(ttl_seconds, descriptor).await
    }

    /// Every sponsor, with the backend given as a legacy descriptor string
    pub async fn get_all_sponsors_with_descriptor(
        &self,
        ttl_seconds: u64,
        descriptor: &str,
    ) -> Result<Aggregate<Sponsor>> {
        self.get_all_with_descriptor(ttl_seconds, descriptor).await
    }

    /// The descriptor is only resolved when caching is on, so a zero TTL
    /// never fails on a malformed address.
    pub async fn get_all_with_descriptor<T: Record>(
        &self,
        ttl_seconds: u64,
        descriptor: &str,
    ) -> Result<Aggregate<T>> {
        let backend = if ttl_seconds == 0 {
            CacheBackend::Disabled
        } else {
            CacheBackend::from_descriptor(descriptor)?
        };
        self.get_all(ttl_seconds, &backend).await
    }

    /// Read-through cache around [`AfdianClient::fetch_all`].
    ///
    /// A TTL of zero or a disabled backend always fetches live and writes
    /// nothing. Misses, stale entries and undecodable entries fall through
    /// to a live fetch whose result is then written back.
    pub async fn get_all<T: Record>(
        &self,
        ttl_seconds: u64,
        backend: &CacheBackend,
    ) -> Result<Aggregate<T>> {
        let store = if ttl_seconds == 0 {
            None
        } else {
            self.open_store(backend).await
        };
        self.read_through(ttl_seconds, store, &backend.to_string())
            .await
    }

    /// Same as [`AfdianClient::get_all`] against an already opened remote store
    pub async fn get_all_with_store<T: Record>(
        &self,
        ttl_seconds: u64,
        store: Arc<dyn KeyValueStore>,
    ) -> Result<Aggregate<T>> {
        let store = (ttl_seconds > 0).then(|| CacheStore::Remote(store));
        self.read_through(ttl_seconds, store, "store").await
    }

    async fn read_through<T: Record>(
        &self,
        ttl_seconds: u64,
        store: Option<CacheStore>,
        backend: &str,
    ) -> Result<Aggregate<T>> {
        let kind = T::KIND;
        let ttl = Duration::from_secs(ttl_seconds);

        if let Some(store) = &store {
            if let Some(raw) = store.read(kind, ttl).await.filter(|raw| !raw.is_empty()) {
                match decode_entry::<T>(&raw) {
                    Ok(list) => {
                        tracing::info!(?kind, backend, records = list.len(), "served from cache");
                        return Ok(Aggregate::new(list, CacheState::Cached));
                    }
                    Err(err) => {
                        tracing::warn!(?kind, backend, error = %err, "cache entry undecodable, refetching")
                    }
                }
            }
        }

        let aggregate = self.fetch_all::<T>().await;

        if let Some(store) = &store {
            let encoded = encode_entry(&aggregate.list)?;
            match store.write(kind, &encoded, ttl).await {
                Ok(()) => tracing::info!(?kind, backend, ttl_seconds, "cache written"),
                Err(err) => tracing::warn!(?kind, backend, error = %err, "cache write failed"),
            }
        }

        Ok(aggregate)
    }

    async fn open_store(&self, backend: &CacheBackend) -> Option<CacheStore> {
        match backend {
            CacheBackend::Disabled => None,
            CacheBackend::LocalFile(path) => Some(CacheStore::File(FileCache::new(path))),
            CacheBackend::RemoteStore { host, port } => {
                match RedisCache::connect(host, *port, self.config().timeout).await {
                    Ok(cache) => Some(CacheStore::Remote(Arc::new(cache))),
                    Err(err) => {
                        tracing::warn!(%backend, error = %err, "redis unavailable, caching skipped");
                        None
                    }
                }
            }
        }
    }
}
