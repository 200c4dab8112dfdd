//! Configuration for the cost estimator

use clap::ValueEnum;
use core_config::{ConfigError, Environment, FromEnv, env_or_default, env_parse};
use domain_estimation::{AZURERM_PROVIDER, BillingScheme, DEFAULT_CONCURRENCY};
use domain_price_catalog::{RETAIL_PRICES_API, RedisStoreConfig};
use std::time::Duration;
use strum::{Display, EnumString};

/// Where unit prices are looked up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString, ValueEnum)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum SourceKind {
    /// Query the retail prices API per asset
    #[default]
    Live,
    /// Read the synced Redis catalog
    Catalog,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub environment: Environment,
    pub retail_prices_url: String,
    pub http_timeout: Duration,
    pub redis: RedisStoreConfig,
    /// Only plan changes of this provider are estimated
    pub target_provider: String,
    pub price_source: SourceKind,
    pub billing_scheme: BillingScheme,
    /// Concurrent price lookups per estimate
    pub concurrency: usize,
}

impl FromEnv for Config {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Config {
            environment: Environment::from_env(),
            retail_prices_url: env_or_default("RETAIL_PRICES_API_URL", RETAIL_PRICES_API),
            http_timeout: Duration::from_secs(env_parse("HTTP_TIMEOUT_SECS", 30)?),
            redis: RedisStoreConfig::from_env()?,
            target_provider: env_or_default("TARGET_PROVIDER", AZURERM_PROVIDER),
            price_source: env_parse("PRICE_SOURCE", SourceKind::default())?,
            billing_scheme: env_parse("PRICE_TYPE", BillingScheme::default())?,
            concurrency: env_parse("ESTIMATE_CONCURRENCY", DEFAULT_CONCURRENCY)?,
        })
    }
}
