//! Metrics for price catalog synchronization.

use metrics::{counter, gauge, histogram};

/// Catalog sync metrics recorder
pub struct CatalogMetrics;

impl CatalogMetrics {
    /// Record one upstream page fetched
    pub fn record_page_fetched(items: usize) {
        counter!("catalog_pages_fetched_total").increment(1);
        tracing::debug!(items = items, "Fetched catalog page");
    }

    /// Record an asset identity bucket written back to the store
    pub fn record_bucket_written() {
        counter!("catalog_buckets_written_total").increment(1);
    }

    /// Record a bucket that could not be read or written
    pub fn record_bucket_failed(operation: &str) {
        counter!("catalog_buckets_failed_total", "operation" => operation.to_string())
            .increment(1);
    }

    /// Record a finished sync run (complete or partial)
    pub fn record_sync_completed(items_merged: usize, failed_buckets: usize, duration_secs: f64) {
        let status = if failed_buckets == 0 {
            "completed"
        } else {
            "partial"
        };
        counter!("catalog_sync_runs_total", "status" => status).increment(1);
        histogram!("catalog_sync_duration_seconds").record(duration_secs);
        gauge!("catalog_items_merged_last_run").set(items_merged as f64);

        tracing::info!(
            items_merged = items_merged,
            failed_buckets = failed_buckets,
            duration_secs = duration_secs,
            "Catalog sync run finished"
        );
    }

    /// Record a sync run aborted by an upstream failure
    pub fn record_sync_aborted(error: &str) {
        counter!("catalog_sync_runs_total", "status" => "aborted").increment(1);
        tracing::error!(error = error, "Catalog sync run aborted");
    }
}
