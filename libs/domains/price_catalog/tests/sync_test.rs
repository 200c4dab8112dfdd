use async_trait::async_trait;
use domain_price_catalog::{
    AssetIdentity, CatalogError, CatalogResult, CatalogStorePriceSource, CatalogSynchronizer,
    HttpGet, HttpResponse, InMemoryCatalogStore, PriceCatalogStore, PriceQuery, PriceSource,
    PriceType, RetailPricesClient,
};
use std::collections::HashMap;
use std::sync::Arc;

const BASE: &str = "http://prices.test/api/retail/prices";

/// Serves canned pages keyed by URL
struct CannedPages {
    pages: HashMap<String, HttpResponse>,
}

impl CannedPages {
    fn new() -> Self {
        Self {
            pages: HashMap::new(),
        }
    }

    fn page(mut self, url: &str, items: Vec<serde_json::Value>, next: Option<&str>) -> Self {
        let body = serde_json::to_vec(&serde_json::json!({
            "BillingCurrency": "USD",
            "Items": items,
            "NextPageLink": next,
            "Count": 0
        }))
        .unwrap();
        self.pages
            .insert(url.to_string(), HttpResponse { status: 200, body });
        self
    }

    fn failing(mut self, url: &str, status: u16) -> Self {
        self.pages.insert(
            url.to_string(),
            HttpResponse {
                status,
                body: b"upstream exploded".to_vec(),
            },
        );
        self
    }
}

#[async_trait]
impl HttpGet for CannedPages {
    async fn get(&self, url: &str) -> CatalogResult<HttpResponse> {
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| CatalogError::Store(format!("unexpected url {url}")))
    }
}

fn vm_item(meter_id: &str, arm_sku: &str, sku_name: &str, price: f64) -> serde_json::Value {
    serde_json::json!({
        "meterId": meter_id,
        "meterName": sku_name,
        "skuName": sku_name,
        "armSkuName": arm_sku,
        "productName": "Virtual Machines BS Series",
        "serviceFamily": "Compute",
        "serviceName": "Virtual Machines",
        "armRegionName": "eastus",
        "unitPrice": price,
        "retailPrice": price,
        "type": "Consumption",
        "unitOfMeasure": "1 Hour",
        "effectiveStartDate": "2024-01-01T00:00:00Z"
    })
}

fn identity(arm_sku: &str) -> AssetIdentity {
    AssetIdentity::new("azurerm", "Compute", "Virtual Machines", "eastus", arm_sku)
}

fn page_url(n: usize) -> String {
    format!("{BASE}?$skip={}", n * 100)
}

#[tokio::test]
async fn test_failed_page_keeps_earlier_buckets() {
    let p2 = page_url(1);
    let p3 = page_url(2);
    let http = CannedPages::new()
        .page(
            BASE,
            vec![
                vm_item("m-b1s", "Standard_B1s", "B1s", 0.0104),
                vm_item("m-b2s", "Standard_B2s", "B2s", 0.0416),
            ],
            Some(&p2),
        )
        .failing(&p2, 500)
        .page(&p3, vec![vm_item("m-b4ms", "Standard_B4ms", "B4ms", 0.166)], None);

    let store = Arc::new(InMemoryCatalogStore::new());
    let sync = CatalogSynchronizer::new(RetailPricesClient::with_base_url(http, BASE), store.clone());

    let err = sync.refresh().await.unwrap_err();
    assert!(matches!(err, CatalogError::UpstreamStatus { status: 500, .. }));

    let b1s = store.get(&identity("Standard_B1s")).await.unwrap().unwrap();
    assert_eq!(b1s.len(), 1);
    assert_eq!(b1s[0].unit_price, 0.0104);
    assert!(store.get(&identity("Standard_B2s")).await.unwrap().is_some());
    assert!(store.get(&identity("Standard_B4ms")).await.unwrap().is_none());
}

#[tokio::test]
async fn test_meters_deduplicated_across_pages_and_runs() {
    let p2 = page_url(1);
    let pages = || {
        CannedPages::new()
            .page(
                BASE,
                vec![
                    vm_item("m-2", "Standard_B2s", "B2s", 0.05),
                    vm_item("m-1", "Standard_B2s", "B2s Spot", 0.01),
                ],
                Some(&p2),
            )
            .page(&p2, vec![vm_item("m-2", "Standard_B2s", "B2s", 0.0416)], None)
    };

    let store = Arc::new(InMemoryCatalogStore::new());

    let first = CatalogSynchronizer::new(RetailPricesClient::with_base_url(pages(), BASE), store.clone());
    let report = first.refresh().await.unwrap();
    assert_eq!(report.pages_fetched, 2);
    assert_eq!(report.buckets_failed, 0);

    let after_first = store.get(&identity("Standard_B2s")).await.unwrap().unwrap();
    let ids: Vec<_> = after_first.iter().map(|i| i.meter_id.as_str()).collect();
    assert_eq!(ids, vec!["m-1", "m-2"]);
    assert_eq!(after_first[1].unit_price, 0.0416);

    let second = CatalogSynchronizer::new(RetailPricesClient::with_base_url(pages(), BASE), store.clone());
    second.refresh().await.unwrap();

    let after_second = store.get(&identity("Standard_B2s")).await.unwrap().unwrap();
    assert_eq!(after_first, after_second);
}

#[tokio::test]
async fn test_synced_catalog_answers_queries() {
    let http = CannedPages::new().page(
        BASE,
        vec![
            vm_item("m-regular", "Standard_B2s", "B2s", 0.0416),
            vm_item("m-spot", "Standard_B2s", "B2s Spot", 0.0083),
        ],
        None,
    );
    let store = Arc::new(InMemoryCatalogStore::new());
    CatalogSynchronizer::new(RetailPricesClient::with_base_url(http, BASE), store.clone())
        .refresh()
        .await
        .unwrap();

    let source = CatalogStorePriceSource::new(store);
    let query = PriceQuery::new("Compute", "Virtual Machines", "eastus", PriceType::Consumption)
        .with_arm_sku_name("Standard_B2s")
        .with(domain_price_catalog::Predicate::not_contains(
            domain_price_catalog::CatalogField::SkuName,
            "Spot",
        ));

    let items = source.find_items(&query).await.unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].meter_id, "m-regular");
}
