//! Runtime selection of the price source

use domain_price_catalog::{
    CatalogStorePriceSource, PriceSource, RedisCatalogStore, ReqwestHttpGet, RetailPricesClient,
};
use eyre::Result;
use tracing::info;

use crate::config::{Config, SourceKind};

pub async fn connect(config: &Config, kind: SourceKind) -> Result<Box<dyn PriceSource>> {
    info!(source = %kind, "Using price source");

    Ok(match kind {
        SourceKind::Live => {
            let http = ReqwestHttpGet::new(config.http_timeout)?;
            Box::new(RetailPricesClient::with_base_url(http, &config.retail_prices_url))
        }
        SourceKind::Catalog => {
            let store = RedisCatalogStore::connect(&config.redis).await?;
            Box::new(CatalogStorePriceSource::new(store))
        }
    })
}
