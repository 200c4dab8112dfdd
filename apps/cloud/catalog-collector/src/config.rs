//! Configuration for the catalog collector

use core_config::{ConfigError, Environment, FromEnv, env_list, env_or_default, env_parse};
use domain_price_catalog::{PriceType, RETAIL_PRICES_API, RedisStoreConfig};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_SYNC_CRON: &str = "0 0 3 * * *";

#[derive(Debug, Clone)]
pub struct Config {
    pub environment: Environment,
    /// First page of the retail price list
    pub retail_prices_url: String,
    pub http_timeout: Duration,
    pub redis: RedisStoreConfig,
    /// Price types mirrored into the store
    pub price_types: Vec<PriceType>,
    /// Where `prices.json` is written; no snapshot when unset
    pub snapshot_dir: Option<PathBuf>,
    pub sync_cron: String,
}

impl FromEnv for Config {
    fn from_env() -> Result<Self, ConfigError> {
        let price_types = env_list("CATALOG_SYNC_PRICE_TYPES", &["Consumption"])
            .iter()
            .map(|raw| {
                raw.parse::<PriceType>().map_err(|e| ConfigError::ParseError {
                    key: "CATALOG_SYNC_PRICE_TYPES".to_string(),
                    details: format!("'{}': {}", raw, e),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Config {
            environment: Environment::from_env(),
            retail_prices_url: env_or_default("RETAIL_PRICES_API_URL", RETAIL_PRICES_API),
            http_timeout: Duration::from_secs(env_parse("HTTP_TIMEOUT_SECS", 60)?),
            redis: RedisStoreConfig::from_env()?,
            price_types,
            snapshot_dir: std::env::var("SNAPSHOT_DIR").ok().map(PathBuf::from),
            sync_cron: env_or_default("CATALOG_SYNC_CRON", DEFAULT_SYNC_CRON),
        })
    }
}
