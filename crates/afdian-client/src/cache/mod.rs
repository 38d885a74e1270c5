/*
[INPUT]:  Cache backend choice and serialized aggregates
[OUTPUT]: Fresh cached aggregates or a miss; persisted aggregates
[POS]:    Cache layer - backend selection and entry encoding
[UPDATE]: When adding backends or changing the persisted layout
*/

pub mod file;
pub mod memory;
pub mod remote;
pub mod selector;
pub mod store;

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::http::{AfdianError, Result};
use crate::types::Record;

pub use file::FileCache;
pub use memory::{MemoryStore, StoredValue};
pub use remote::RedisCache;
pub use store::KeyValueStore;

/// Legacy descriptor prefix selecting the Redis backend
pub const REDIS_DESCRIPTOR_PREFIX: &str = "&redis=";

/// Where aggregates are cached
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheBackend {
    Disabled,
    LocalFile(PathBuf),
    RemoteStore { host: String, port: u16 },
}

impl CacheBackend {
    pub fn local_file(path: impl Into<PathBuf>) -> Self {
        CacheBackend::LocalFile(path.into())
    }

    pub fn remote_store(host: impl Into<String>, port: u16) -> Self {
        CacheBackend::RemoteStore {
            host: host.into(),
            port,
        }
    }

    /// Resolve a descriptor string.
    ///
    /// `&redis=host:port` selects Redis, an empty string disables caching,
    /// anything else is a file path. A `&redis=` descriptor without a
    /// usable `host:port` fails with [`AfdianError::InvalidCacheAddress`].
    pub fn from_descriptor(descriptor: &str) -> Result<Self> {
        let descriptor = descriptor.trim();
        if descriptor.is_empty() {
            return Ok(CacheBackend::Disabled);
        }

        let Some(address) = descriptor.strip_prefix(REDIS_DESCRIPTOR_PREFIX) else {
            return Ok(CacheBackend::LocalFile(PathBuf::from(descriptor)));
        };

        let (host, port) = address
            .split_once(':')
            .ok_or(AfdianError::InvalidCacheAddress)?;
        // anything after a second ':' is ignored
        let port = port.split(':').next().unwrap_or_default().trim();
        let host = host.trim();
        if host.is_empty() {
            return Err(AfdianError::InvalidCacheAddress);
        }
        let port: u16 = port.parse().map_err(|_| AfdianError::InvalidCacheAddress)?;

        Ok(CacheBackend::remote_store(host, port))
    }
}

impl FromStr for CacheBackend {
    type Err = AfdianError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_descriptor(s)
    }
}

impl fmt::Display for CacheBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheBackend::Disabled => f.write_str("disabled"),
            CacheBackend::LocalFile(path) => write!(f, "file:{}", path.display()),
            CacheBackend::RemoteStore { host, port } => write!(f, "redis:{host}:{port}"),
        }
    }
}

/// Persisted entry layout: `{"data":{"list":[...]}}`.
///
/// The cache state is never stored; unknown top-level fields are ignored.
#[derive(Serialize, Deserialize)]
struct StoredAggregate<L> {
    data: StoredList<L>,
}

#[derive(Serialize, Deserialize)]
struct StoredList<L> {
    list: L,
}

pub(crate) fn encode_entry<T: Serialize>(list: &[T]) -> Result<String> {
    Ok(serde_json::to_string(&StoredAggregate {
        data: StoredList { list },
    })?)
}

pub(crate) fn decode_entry<T: Record>(raw: &str) -> Result<Vec<T>> {
    let stored: StoredAggregate<Vec<Value>> = serde_json::from_str(raw)?;
    Ok(stored
        .data
        .list
        .into_iter()
        .map(T::from_value_lenient)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Order, Sponsor};
    use rstest::rstest;

    #[rstest]
    #[case("&redis=127.0.0.1:6379", CacheBackend::remote_store("127.0.0.1", 6379))]
    #[case("&redis=cache.internal:6380", CacheBackend::remote_store("cache.internal", 6380))]
    #[case("&redis=10.0.0.2:6379:extra", CacheBackend::remote_store("10.0.0.2", 6379))]
    #[case("order_cache.json", CacheBackend::local_file("order_cache.json"))]
    #[case("/tmp/afdian/sponsors.json", CacheBackend::local_file("/tmp/afdian/sponsors.json"))]
    #[case("", CacheBackend::Disabled)]
    fn test_from_descriptor(#[case] descriptor: &str, #[case] expected: CacheBackend) {
        assert_eq!(CacheBackend::from_descriptor(descriptor).unwrap(), expected);
    }

    #[rstest]
    #[case("&redis=")]
    #[case("&redis=127.0.0.1")]
    #[case("&redis=:6379")]
    #[case("&redis=127.0.0.1:")]
    #[case("&redis=127.0.0.1:port")]
    #[case("&redis=127.0.0.1:70000")]
    fn test_from_descriptor_invalid_address(#[case] descriptor: &str) {
        let err = CacheBackend::from_descriptor(descriptor).unwrap_err();
        assert!(matches!(err, AfdianError::InvalidCacheAddress));
        assert_eq!(
            err.to_string(),
            "Failed to connect redis server: invalid server address"
        );
    }

    #[test]
    fn test_from_str() {
        let backend: CacheBackend = "&redis=localhost:6379".parse().unwrap();
        assert_eq!(backend.to_string(), "redis:localhost:6379");
    }

    #[test]
    fn test_entry_layout() {
        let encoded = encode_entry(&[1, 2, 3]).unwrap();
        assert_eq!(encoded, r#"{"data":{"list":[1,2,3]}}"#);

        let orders: Vec<Order> = serde_json::from_value(serde_json::json!([
            {"out_trade_no": "t1"},
            {"out_trade_no": "t2"}
        ]))
        .unwrap();
        let encoded = encode_entry(&orders).unwrap();
        assert_eq!(decode_entry::<Order>(&encoded).unwrap(), orders);
    }

    #[test]
    fn test_entry_ignores_stray_cache_field() {
        let raw = r#"{"data":{"list":[{"out_trade_no":"t7"}]},"cache":"none"}"#;
        let orders = decode_entry::<Order>(raw).unwrap();
        assert_eq!(orders[0].out_trade_no, "t7");
        assert!(decode_entry::<Order>(r#"{"list":[]}"#).is_err());
    }

    #[test]
    fn test_entry_keeps_odd_records() {
        let raw = r#"{"data":{"list":[{"user":[]},{"user":{"name":"Lain"}}]}}"#;
        let sponsors = decode_entry::<Sponsor>(raw).unwrap();
        assert_eq!(sponsors.len(), 2);
        assert_eq!(sponsors[1].user.name, "Lain");
    }
}
