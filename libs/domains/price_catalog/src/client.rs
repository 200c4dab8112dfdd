//! Azure Retail Prices API client.
//!
//! <https://learn.microsoft.com/en-us/rest/api/cost-management/retail-prices/azure-retail-prices>

use std::collections::HashSet;
use tracing::{debug, instrument};

use crate::error::{CatalogError, CatalogResult};
use crate::http::HttpGet;
use crate::models::{CatalogItem, RetailPricesPage};
use crate::query::PriceQuery;

/// Public Retail Prices endpoint
pub const RETAIL_PRICES_API: &str = "https://prices.azure.com/api/retail/prices";

/// Paginated reader for the Retail Prices API
pub struct RetailPricesClient<H> {
    http: H,
    base_url: String,
}

impl<H: HttpGet> RetailPricesClient<H> {
    pub fn new(http: H) -> Self {
        Self::with_base_url(http, RETAIL_PRICES_API)
    }

    pub fn with_base_url(http: H, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// URL of the first page for a filtered query
    pub fn query_url(&self, query: &PriceQuery) -> String {
        format!(
            "{}?$filter={}",
            self.base_url,
            urlencoding::encode(&query.filter_expression())
        )
    }

    /// Fetch and decode a single page
    pub async fn fetch_page(&self, url: &str) -> CatalogResult<RetailPricesPage> {
        let response = self.http.get(url).await?;

        if !response.is_success() {
            return Err(CatalogError::UpstreamStatus {
                status: response.status,
                body: response.body_text(),
            });
        }

        Ok(serde_json::from_slice(&response.body)?)
    }

    /// Fetch a page and every page after it.
    ///
    /// A `NextPageLink` naming a page already fetched fails with
    /// [`CatalogError::PaginationLoop`].
    pub async fn fetch_all(&self, url: &str) -> CatalogResult<Vec<CatalogItem>> {
        let mut items = Vec::new();
        let mut next = Some(url.to_string());
        let mut visited = HashSet::new();
        let mut pages = 0usize;

        while let Some(url) = next.take() {
            if !visited.insert(url.clone()) {
                return Err(CatalogError::PaginationLoop { url });
            }
            let page = self.fetch_page(&url).await?;
            pages += 1;
            items.extend(page.items);
            next = page.next_page_link.filter(|link| !link.is_empty());
        }

        debug!(pages, items = items.len(), "Fetched retail prices");
        Ok(items)
    }

    /// All items matching a query, across pages
    #[instrument(skip(self, query), fields(filter = %query))]
    pub async fn query(&self, query: &PriceQuery) -> CatalogResult<Vec<CatalogItem>> {
        self.fetch_all(&self.query_url(query)).await
    }
}
