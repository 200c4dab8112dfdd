use domain_price_catalog::{CatalogItem, PriceQuery, PriceSource};
use std::fmt;

use crate::billing::BillingScheme;
use crate::error::{PricingError, PricingResult};

/// A billable unit derived from one plan resource.
///
/// Pricing happens in two steps so the catalog lookup can be shared: the asset
/// describes the items it needs, then computes an hourly price from whatever
/// the price source returned.
pub trait PriceableAsset: fmt::Debug + Send + Sync {
    /// Short label used in logs and metrics
    fn kind(&self) -> &'static str;

    /// Catalog query for this asset, `None` when the price is fixed
    fn build_query(&self, scheme: BillingScheme) -> Option<PriceQuery>;

    /// Hourly USD price from the items matching [`build_query`](Self::build_query)
    fn resolve_hourly_price(&self, items: &[CatalogItem], scheme: BillingScheme) -> PricingResult<f64>;
}

/// Look up and compute the hourly price of one asset
pub async fn price_asset<P>(
    asset: &dyn PriceableAsset,
    source: &P,
    scheme: BillingScheme,
) -> PricingResult<f64>
where
    P: PriceSource + ?Sized,
{
    let Some(query) = asset.build_query(scheme) else {
        return asset.resolve_hourly_price(&[], scheme);
    };

    let items = source.find_items(&query).await?;
    if items.is_empty() {
        return Err(PricingError::NoMatchingCatalogItem {
            filter: query.filter_expression(),
        });
    }

    asset.resolve_hourly_price(&items, scheme)
}
