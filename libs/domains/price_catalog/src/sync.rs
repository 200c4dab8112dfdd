//! Catalog synchronization.
//!
//! Walks every page of the upstream catalog and merges the items into the
//! store, one asset identity bucket at a time. Pages are merged as they
//! arrive, so a run that aborts midway leaves earlier buckets updated.

use chrono::{DateTime, Utc};
use observability::CatalogMetrics;
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use std::time::Instant;
use tracing::{debug, error, info, instrument, warn};

use crate::bucket;
use crate::client::RetailPricesClient;
use crate::error::{CatalogError, CatalogResult};
use crate::http::HttpGet;
use crate::identity::AssetIdentity;
use crate::models::{CatalogItem, PriceType};
use crate::snapshot::{SNAPSHOT_NAME, SnapshotSink};
use crate::store::PriceCatalogStore;

/// Which upstream items a sync run keeps
#[derive(Debug, Clone)]
pub struct SyncOptions {
    pub price_types: Vec<PriceType>,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            price_types: vec![PriceType::Consumption],
        }
    }
}

impl SyncOptions {
    pub fn with_price_types(mut self, price_types: Vec<PriceType>) -> Self {
        self.price_types = price_types;
        self
    }

    fn keeps(&self, item: &CatalogItem) -> bool {
        item.price_type()
            .is_some_and(|price_type| self.price_types.contains(&price_type))
    }
}

/// Outcome of a completed sync run
#[derive(Debug, Clone, Serialize)]
pub struct SyncReport {
    pub pages_fetched: usize,
    pub items_seen: usize,
    pub items_merged: usize,
    pub buckets_attempted: usize,
    pub buckets_failed: usize,
    pub snapshot_written: bool,
    pub duration_ms: u64,
    pub timestamp: DateTime<Utc>,
}

/// Pulls the upstream catalog into a [`PriceCatalogStore`]
pub struct CatalogSynchronizer<H, S> {
    client: RetailPricesClient<H>,
    store: S,
    options: SyncOptions,
    snapshot: Option<Box<dyn SnapshotSink>>,
}

impl<H: HttpGet, S: PriceCatalogStore> CatalogSynchronizer<H, S> {
    pub fn new(client: RetailPricesClient<H>, store: S) -> Self {
        Self {
            client,
            store,
            options: SyncOptions::default(),
            snapshot: None,
        }
    }

    pub fn with_options(mut self, options: SyncOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_snapshot(mut self, sink: impl SnapshotSink + 'static) -> Self {
        self.snapshot = Some(Box::new(sink));
        self
    }

    /// Run one full sync.
    ///
    /// A page that cannot be fetched or decoded aborts the run. Buckets that
    /// cannot be read or written are skipped and reported as
    /// [`CatalogError::PartialSync`] once every page has been processed.
    #[instrument(skip(self), fields(base_url = %self.client.base_url()))]
    pub async fn refresh(&self) -> CatalogResult<SyncReport> {
        let start = Instant::now();
        let mut report = SyncReport {
            pages_fetched: 0,
            items_seen: 0,
            items_merged: 0,
            buckets_attempted: 0,
            buckets_failed: 0,
            snapshot_written: false,
            duration_ms: 0,
            timestamp: Utc::now(),
        };
        let mut snapshot_items = Vec::new();
        let mut next = Some(self.client.base_url().to_string());
        let mut visited = HashSet::new();

        info!(price_types = ?self.options.price_types, "Starting catalog sync");

        while let Some(url) = next.take() {
            if !visited.insert(url.clone()) {
                let e = CatalogError::PaginationLoop { url };
                CatalogMetrics::record_sync_aborted(e.kind());
                error!(
                    pages_fetched = report.pages_fetched,
                    error = %e,
                    "Catalog pagination loops back, aborting sync"
                );
                return Err(e);
            }

            let page = match self.client.fetch_page(&url).await {
                Ok(page) => page,
                Err(e) => {
                    CatalogMetrics::record_sync_aborted(e.kind());
                    error!(
                        url = %url,
                        pages_fetched = report.pages_fetched,
                        error = %e,
                        "Catalog page fetch failed, aborting sync"
                    );
                    return Err(e);
                }
            };

            report.pages_fetched += 1;
            report.items_seen += page.items.len();
            CatalogMetrics::record_page_fetched(page.items.len());
            next = page.next_page_link.filter(|link| !link.is_empty());

            if self.snapshot.is_some() {
                snapshot_items.extend(page.items.iter().cloned());
            }

            self.merge_page(page.items, &mut report).await;
        }

        if let Some(sink) = &self.snapshot {
            match sink.write_snapshot(SNAPSHOT_NAME, &snapshot_items).await {
                Ok(()) => report.snapshot_written = true,
                Err(e) => warn!(error = %e, "Failed to write catalog snapshot"),
            }
        }

        report.duration_ms = start.elapsed().as_millis() as u64;
        CatalogMetrics::record_sync_completed(
            report.items_merged,
            report.buckets_failed,
            start.elapsed().as_secs_f64(),
        );

        if report.buckets_failed > 0 {
            return Err(CatalogError::PartialSync {
                failed: report.buckets_failed,
                attempted: report.buckets_attempted,
            });
        }

        Ok(report)
    }

    async fn merge_page(&self, items: Vec<CatalogItem>, report: &mut SyncReport) {
        let mut groups: BTreeMap<AssetIdentity, Vec<CatalogItem>> = BTreeMap::new();
        for item in items.into_iter().filter(|item| self.options.keeps(item)) {
            groups
                .entry(AssetIdentity::for_item(&item))
                .or_default()
                .push(item);
        }

        for (identity, items) in groups {
            report.buckets_attempted += 1;
            let count = items.len();

            let mut bucket = match self.store.get(&identity).await {
                Ok(existing) => existing.unwrap_or_default(),
                Err(e) => {
                    warn!(identity = %identity, error = %e, "Failed to read catalog bucket");
                    CatalogMetrics::record_bucket_failed("get");
                    report.buckets_failed += 1;
                    continue;
                }
            };

            bucket::merge_items(&mut bucket, items);

            if let Err(e) = self.store.put(&identity, &bucket).await {
                warn!(identity = %identity, error = %e, "Failed to write catalog bucket");
                CatalogMetrics::record_bucket_failed("put");
                report.buckets_failed += 1;
                continue;
            }

            CatalogMetrics::record_bucket_written();
            report.items_merged += count;
            debug!(identity = %identity, items = count, size = bucket.len(), "Merged catalog bucket");
        }
    }
}
