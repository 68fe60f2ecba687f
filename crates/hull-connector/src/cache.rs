//! Cache store boundary.
//!
//! The connector treats any cache failure as a miss (read) or a no-op
//! (write); implementations must surface failures as errors rather than
//! panicking.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

use crate::error::ConnectorResult;

/// Get/set-with-TTL store for JSON values.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Read a value; `None` on miss or expiry.
    async fn get(&self, key: &str) -> ConnectorResult<Option<Value>>;

    /// Store a value with the given time-to-live.
    async fn set(&self, key: &str, value: Value, ttl_secs: u64) -> ConnectorResult<()>;
}

/// In-process cache store with per-entry expiry.
#[derive(Default)]
pub struct MemoryCacheStore {
    entries: RwLock<HashMap<String, (Value, Instant)>>,
}

impl MemoryCacheStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CacheStore for MemoryCacheStore {
    async fn get(&self, key: &str) -> ConnectorResult<Option<Value>> {
        let entries = self.entries.read().await;
        match entries.get(key) {
            Some((value, expires_at)) if *expires_at > Instant::now() => Ok(Some(value.clone())),
            _ => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: Value, ttl_secs: u64) -> ConnectorResult<()> {
        let expires_at = Instant::now() + Duration::from_secs(ttl_secs);
        let mut entries = self.entries.write().await;
        entries.insert(key.to_string(), (value, expires_at));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_memory_store_round_trip() {
        let store = MemoryCacheStore::new();
        assert_eq!(store.get("key").await.unwrap(), None);

        store.set("key", json!({"a": 1}), 60).await.unwrap();
        assert_eq!(store.get("key").await.unwrap(), Some(json!({"a": 1})));
    }

    #[tokio::test]
    async fn test_memory_store_expiry() {
        let store = MemoryCacheStore::new();
        store.set("key", json!(1), 0).await.unwrap();
        assert_eq!(store.get("key").await.unwrap(), None);
    }
}
