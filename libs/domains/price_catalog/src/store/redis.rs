use async_trait::async_trait;
use core_config::{ConfigError, FromEnv, env_or_default, env_parse};
use redis::AsyncCommands;
use redis::Client;
use redis::aio::ConnectionManager;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::PriceCatalogStore;
use crate::bucket;
use crate::error::CatalogResult;
use crate::identity::AssetIdentity;
use crate::models::CatalogItem;

/// Key prefix used when `CATALOG_NAMESPACE` is not set
pub const DEFAULT_NAMESPACE: &str = "price-catalog";

/// Redis catalog store settings
#[derive(Clone, Debug)]
pub struct RedisStoreConfig {
    /// Redis connection URL
    pub url: String,

    /// Prefix for every bucket key
    pub namespace: String,

    /// Connection attempts after the first one fails
    pub connect_retries: u32,

    /// Delay before the first reconnect attempt, doubled per attempt
    pub initial_delay_ms: u64,

    /// Upper bound for the reconnect delay
    pub max_delay_ms: u64,
}

impl RedisStoreConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            namespace: DEFAULT_NAMESPACE.to_string(),
            connect_retries: 3,
            initial_delay_ms: 100,
            max_delay_ms: 5000,
        }
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    pub fn with_connect_retries(mut self, retries: u32) -> Self {
        self.connect_retries = retries;
        self
    }
}

impl FromEnv for RedisStoreConfig {
    /// `REDIS_URL` wins; otherwise the URL is assembled from `REDIS_HOST`/`REDIS_PORT`
    fn from_env() -> Result<Self, ConfigError> {
        let url = match std::env::var("REDIS_URL") {
            Ok(url) => url,
            Err(_) => {
                let host = env_or_default("REDIS_HOST", "127.0.0.1");
                let port: u16 = env_parse("REDIS_PORT", 6379)?;
                format!("redis://{}:{}", host, port)
            }
        };

        Ok(Self::new(url)
            .with_namespace(env_or_default("CATALOG_NAMESPACE", DEFAULT_NAMESPACE))
            .with_connect_retries(env_parse("REDIS_CONNECT_RETRIES", 3)?))
    }
}

/// Connect and verify the connection with PING
async fn connect(url: &str) -> redis::RedisResult<ConnectionManager> {
    debug!(url = url, "Connecting to Redis");

    let client = Client::open(url)?;
    let manager = ConnectionManager::new(client).await?;

    let mut conn = manager.clone();
    let _: String = redis::cmd("PING").query_async(&mut conn).await?;

    Ok(manager)
}

/// Startup-only retry with exponential backoff
async fn connect_with_retry(config: &RedisStoreConfig) -> redis::RedisResult<ConnectionManager> {
    let mut attempt = 0;
    let mut delay = config.initial_delay_ms;

    loop {
        match connect(&config.url).await {
            Ok(manager) => {
                info!(attempts = attempt + 1, "Connected to Redis catalog store");
                return Ok(manager);
            }
            Err(e) if attempt < config.connect_retries => {
                attempt += 1;
                warn!(
                    error = %e,
                    attempt,
                    max_retries = config.connect_retries,
                    delay_ms = delay,
                    "Redis connection failed, retrying"
                );
                tokio::time::sleep(Duration::from_millis(delay)).await;
                delay = (delay * 2).min(config.max_delay_ms);
            }
            Err(e) => return Err(e),
        }
    }
}

/// Catalog store backed by Redis string values holding JSON buckets
#[derive(Clone)]
pub struct RedisCatalogStore {
    manager: ConnectionManager,
    namespace: String,
}

impl RedisCatalogStore {
    pub fn new(manager: ConnectionManager, namespace: impl Into<String>) -> Self {
        Self {
            manager,
            namespace: namespace.into(),
        }
    }

    /// Connect using the given settings, retrying transient startup failures
    pub async fn connect(config: &RedisStoreConfig) -> CatalogResult<Self> {
        let manager = connect_with_retry(config).await?;
        Ok(Self::new(manager, config.namespace.clone()))
    }

    fn key(&self, identity: &AssetIdentity) -> String {
        format!("{}:{}", self.namespace, identity)
    }
}

#[async_trait]
impl PriceCatalogStore for RedisCatalogStore {
    async fn get(&self, identity: &AssetIdentity) -> CatalogResult<Option<Vec<CatalogItem>>> {
        let mut conn = self.manager.clone();
        let raw: Option<String> = conn.get(self.key(identity)).await?;

        match raw {
            Some(json) => {
                let items: Vec<CatalogItem> = serde_json::from_str(&json)?;
                Ok(Some(bucket::normalize(items)))
            }
            None => Ok(None),
        }
    }

    async fn put(&self, identity: &AssetIdentity, items: &[CatalogItem]) -> CatalogResult<()> {
        let json = serde_json::to_string(items)?;
        let mut conn = self.manager.clone();
        conn.set::<_, _, ()>(self.key(identity), json).await?;
        Ok(())
    }
}
