/*
[INPUT]:  Keys, values and expiry timestamps
[OUTPUT]: In-process key-value store that records every write
[POS]:    Cache layer - test double for the remote store seam
[UPDATE]: When the KeyValueStore trait changes
*/

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use crate::cache::store::KeyValueStore;
use crate::http::Result;

/// One value as last written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredValue {
    pub value: String,
    pub expire_at: i64,
}

/// In-memory store with Redis-like expiry
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, StoredValue>>,
    writes: Mutex<Vec<(String, StoredValue)>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a value without recording a write
    pub fn insert(&self, key: &str, value: &str, expire_at: i64) -> &Self {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(
                key.to_string(),
                StoredValue {
                    value: value.to_string(),
                    expire_at,
                },
            );
        self
    }

    /// Current value under `key`, expired or not
    pub fn entry(&self, key: &str) -> Option<StoredValue> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(key)
            .cloned()
    }

    /// Every `set_until` call, in order
    pub fn writes(&self) -> Vec<(String, StoredValue)> {
        self.writes
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let now = Utc::now().timestamp();
        Ok(self
            .entry(key)
            .filter(|stored| stored.expire_at > now)
            .map(|stored| stored.value))
    }

    async fn set_until(&self, key: &str, value: &str, expire_at: i64) -> Result<()> {
        let stored = StoredValue {
            value: value.to_string(),
            expire_at,
        };
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(key.to_string(), stored.clone());
        self.writes
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push((key.to_string(), stored));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_expired_value_reads_as_absent() {
        let store = MemoryStore::new();
        let now = Utc::now().timestamp();
        store.insert("fresh", "1", now + 60).insert("stale", "2", now - 1);

        assert_eq!(store.get("fresh").await.unwrap().as_deref(), Some("1"));
        assert_eq!(store.get("stale").await.unwrap(), None);
        assert_eq!(store.get("absent").await.unwrap(), None);
        assert!(store.writes().is_empty());
    }

    #[tokio::test]
    async fn test_set_until_records_write() {
        let store = MemoryStore::new();
        store.set_until("k", "v", 42).await.unwrap();
        assert_eq!(
            store.writes(),
            vec![(
                "k".to_string(),
                StoredValue {
                    value: "v".to_string(),
                    expire_at: 42
                }
            )]
        );
        assert_eq!(store.entry("k").map(|stored| stored.expire_at), Some(42));
    }
}
