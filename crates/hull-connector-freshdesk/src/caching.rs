//! Field-catalogue caching.
//!
//! Catalogue fetches are the hottest read path of the connector; results
//! are cached per connector and scenario. Only successful API results are
//! ever cached, and a failing cache backend degrades to a plain fetch.

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use redis::{aio::MultiplexedConnection, Client};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tokio::time::timeout;
use tracing::{debug, warn};

use hull_connector::api_result::ApiResultObject;
use hull_connector::cache::CacheStore;
use hull_connector::error::{ConnectorError, ConnectorResult};

/// Time-to-live for cached field catalogues.
pub const FIELD_CACHE_TTL_SECS: u64 = 600;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Named cache scenarios; each maps to one cache key per connector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheScenario {
    ContactFields,
    CompanyFields,
}

impl CacheScenario {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheScenario::ContactFields => "contactfields",
            CacheScenario::CompanyFields => "companyfields",
        }
    }
}

impl fmt::Display for CacheScenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Build the cache key for a connector and scenario.
#[must_use]
pub fn cache_key(connector_id: &str, scenario: CacheScenario) -> String {
    format!("{connector_id}_{scenario}")
}

/// Read-through cache for API results.
#[derive(Clone)]
pub struct CachingUtil {
    store: Arc<dyn CacheStore>,
}

impl CachingUtil {
    pub fn new(store: Arc<dyn CacheStore>) -> Self {
        Self { store }
    }

    /// Serve an API result from cache, computing and caching it on miss.
    ///
    /// Failed results are never stored, so a transient API error does not
    /// poison the cache for the TTL window. Cache backend errors are
    /// logged and treated as a miss (read) or a no-op (write).
    pub async fn get_cached_api_result<R, D, F, Fut>(
        &self,
        key: &str,
        compute: F,
        ttl_secs: u64,
    ) -> ApiResultObject<R, D>
    where
        R: Serialize + DeserializeOwned,
        D: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = ApiResultObject<R, D>>,
    {
        debug!(key = %key, "reading api result from cache");
        let cached = match self.store.get(key).await {
            Ok(value) => value,
            Err(err) => {
                warn!(key = %key, error = %err, "cache read failed, treating as miss");
                None
            }
        };

        if let Some(value) = cached {
            match serde_json::from_value::<ApiResultObject<R, D>>(value) {
                Ok(result) => {
                    debug!(key = %key, "serving cached api result");
                    return result;
                }
                Err(err) => {
                    warn!(key = %key, error = %err, "cached api result is malformed, recomputing");
                }
            }
        }

        let result = compute().await;
        if result.success {
            match serde_json::to_value(&result) {
                Ok(value) => {
                    if let Err(err) = self.store.set(key, value, ttl_secs).await {
                        warn!(key = %key, error = %err, "cache write failed");
                    }
                }
                Err(err) => {
                    warn!(key = %key, error = %err, "api result not serializable for cache");
                }
            }
        } else {
            debug!(key = %key, "api call failed, result not cached");
        }
        result
    }
}

/// Redis-backed cache store using a multiplexed async connection.
pub struct RedisCacheStore {
    client: Client,
}

impl RedisCacheStore {
    /// Create a store for the given Redis URL and verify the connection.
    pub async fn new(url: &str) -> ConnectorResult<Self> {
        let client = Client::open(url)
            .map_err(|err| ConnectorError::cache(format!("failed to create redis client: {err}")))?;

        let mut conn = client
            .get_multiplexed_async_connection()
            .await
            .map_err(|err| {
                ConnectorError::cache(format!("failed to connect to redis at {url}: {err}"))
            })?;

        let pong: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(|err| ConnectorError::cache(format!("redis ping failed: {err}")))?;
        if pong != "PONG" {
            return Err(ConnectorError::cache("redis ping did not return pong"));
        }

        Ok(Self { client })
    }

    async fn connection(&self) -> ConnectorResult<MultiplexedConnection> {
        timeout(CONNECT_TIMEOUT, self.client.get_multiplexed_async_connection())
            .await
            .map_err(|_| ConnectorError::cache("redis connection timeout"))?
            .map_err(|err| ConnectorError::cache(format!("redis connection failed: {err}")))
    }
}

#[hull_connector::async_trait]
impl CacheStore for RedisCacheStore {
    async fn get(&self, key: &str) -> ConnectorResult<Option<Value>> {
        let mut conn = self.connection().await?;
        let raw: Option<String> = redis::cmd("GET")
            .arg(key)
            .query_async(&mut conn)
            .await
            .map_err(|err| ConnectorError::cache(format!("redis get failed: {err}")))?;

        match raw {
            Some(raw) => {
                let value = serde_json::from_str(&raw)
                    .map_err(|err| ConnectorError::cache(format!("malformed cache entry: {err}")))?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: Value, ttl_secs: u64) -> ConnectorResult<()> {
        let mut conn = self.connection().await?;
        let raw = serde_json::to_string(&value)?;
        redis::cmd("SETEX")
            .arg(key)
            .arg(ttl_secs)
            .arg(raw)
            .query_async::<()>(&mut conn)
            .await
            .map_err(|err| ConnectorError::cache(format!("redis setex failed: {err}")))?;
        Ok(())
    }
}
