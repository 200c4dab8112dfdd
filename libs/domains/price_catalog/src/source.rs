use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

use crate::client::RetailPricesClient;
use crate::error::CatalogResult;
use crate::http::HttpGet;
use crate::models::CatalogItem;
use crate::query::PriceQuery;
use crate::store::PriceCatalogStore;

/// Where priceable assets look up their candidate catalog items
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PriceSource: Send + Sync {
    /// Catalog items matching the query, in any order
    async fn find_items(&self, query: &PriceQuery) -> CatalogResult<Vec<CatalogItem>>;
}

#[async_trait]
impl<T: PriceSource + ?Sized> PriceSource for Box<T> {
    async fn find_items(&self, query: &PriceQuery) -> CatalogResult<Vec<CatalogItem>> {
        (**self).find_items(query).await
    }
}

#[async_trait]
impl<T: PriceSource + ?Sized> PriceSource for Arc<T> {
    async fn find_items(&self, query: &PriceQuery) -> CatalogResult<Vec<CatalogItem>> {
        (**self).find_items(query).await
    }
}

#[async_trait]
impl<H: HttpGet> PriceSource for RetailPricesClient<H> {
    async fn find_items(&self, query: &PriceQuery) -> CatalogResult<Vec<CatalogItem>> {
        self.query(query).await
    }
}

/// Reads prices from a synchronized catalog store
pub struct CatalogStorePriceSource<S> {
    store: S,
}

impl<S: PriceCatalogStore> CatalogStorePriceSource<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }
}

#[async_trait]
impl<S: PriceCatalogStore> PriceSource for CatalogStorePriceSource<S> {
    async fn find_items(&self, query: &PriceQuery) -> CatalogResult<Vec<CatalogItem>> {
        let identity = query.asset_identity();
        let Some(bucket) = self.store.get(&identity).await? else {
            debug!(identity = %identity, "No catalog bucket for query");
            return Ok(Vec::new());
        };

        Ok(bucket.into_iter().filter(|item| query.matches(item)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CatalogError;
    use crate::identity::AssetIdentity;
    use crate::models::PriceType;
    use crate::query::{CatalogField, Predicate};
    use crate::store::MockPriceCatalogStore;

    fn vm_item(meter_id: &str, sku_name: &str, price_type: &str) -> CatalogItem {
        CatalogItem {
            meter_id: meter_id.into(),
            sku_name: sku_name.into(),
            product_name: "Virtual Machines BS Series".into(),
            service_family: "Compute".into(),
            service_name: "Virtual Machines".into(),
            arm_region_name: "eastus".into(),
            arm_sku_name: "Standard_B2s".into(),
            price_type: price_type.into(),
            ..Default::default()
        }
    }

    fn spot_query() -> PriceQuery {
        PriceQuery::new("Compute", "Virtual Machines", "eastus", PriceType::Consumption)
            .with_arm_sku_name("Standard_B2s")
            .with(Predicate::contains(CatalogField::SkuName, "Spot"))
            .with(Predicate::not_contains(CatalogField::SkuName, "Low Priority"))
    }

    #[tokio::test]
    async fn test_store_source_filters_bucket() {
        let mut store = MockPriceCatalogStore::new();
        let expected = AssetIdentity::new(
            "azurerm",
            "Compute",
            "Virtual Machines",
            "eastus",
            "Standard_B2s",
        );
        store
            .expect_get()
            .withf(move |id| *id == expected)
            .times(1)
            .returning(|_| {
                Ok(Some(vec![
                    vm_item("1", "B2s", "Consumption"),
                    vm_item("2", "B2s Spot", "Consumption"),
                    vm_item("3", "B2s Low Priority", "Consumption"),
                    vm_item("4", "B2s", "Reservation"),
                ]))
            });

        let source = CatalogStorePriceSource::new(store);
        let items = source.find_items(&spot_query()).await.unwrap();

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].meter_id, "2");
    }

    #[tokio::test]
    async fn test_store_source_missing_bucket_is_empty() {
        let mut store = MockPriceCatalogStore::new();
        store.expect_get().returning(|_| Ok(None));

        let source = CatalogStorePriceSource::new(store);
        assert!(source.find_items(&spot_query()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_store_source_propagates_store_errors() {
        let mut store = MockPriceCatalogStore::new();
        store
            .expect_get()
            .returning(|_| Err(CatalogError::Store("connection refused".into())));

        let source = CatalogStorePriceSource::new(store);
        let err = source.find_items(&spot_query()).await.unwrap_err();
        assert_eq!(err.kind(), "store");
    }
}
