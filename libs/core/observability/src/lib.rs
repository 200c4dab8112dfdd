//! Observability utilities for the plan cost estimator.
//!
//! This crate provides:
//! - Prometheus recorder installation and text rendering
//! - Metrics for estimate requests and per-asset price resolution
//! - Metrics for price catalog synchronization runs
//!
//! # Example
//!
//! ```rust,ignore
//! use observability::{init_metrics, render_metrics, EstimationMetrics};
//!
//! init_metrics()?;
//! EstimationMetrics::record_asset_priced("virtual_machine");
//! println!("{}", render_metrics());
//! ```

pub mod catalog;
pub mod estimation;

pub use catalog::CatalogMetrics;
pub use estimation::{EstimateTimer, EstimationMetrics};

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;
use tracing::info;

static METRICS_HANDLE: OnceCell<PrometheusHandle> = OnceCell::new();

/// Install the Prometheus metrics recorder.
///
/// Idempotent: the first successful call installs the recorder, later calls
/// return the same handle.
pub fn init_metrics() -> Result<&'static PrometheusHandle, BuildError> {
    METRICS_HANDLE.get_or_try_init(|| {
        let handle = PrometheusBuilder::new().install_recorder()?;

        info!("Prometheus metrics recorder initialized");
        register_metric_descriptions();

        Ok(handle)
    })
}

/// Get the metrics handle (must call init_metrics first)
pub fn get_metrics_handle() -> Option<&'static PrometheusHandle> {
    METRICS_HANDLE.get()
}

/// Render the current metrics in Prometheus exposition format
pub fn render_metrics() -> String {
    match get_metrics_handle() {
        Some(handle) => handle.render(),
        None => "# Metrics not initialized\n".to_string(),
    }
}

fn register_metric_descriptions() {
    use metrics::describe_counter;
    use metrics::describe_gauge;
    use metrics::describe_histogram;

    // Estimation
    describe_counter!("estimates_total", "Estimate requests by outcome");
    describe_histogram!(
        "estimate_duration_seconds",
        "Wall time of one estimate request"
    );
    describe_counter!(
        "estimate_resources_total",
        "Plan resources seen by classification bucket"
    );
    describe_counter!(
        "asset_pricing_total",
        "Priceable assets resolved by asset kind and outcome"
    );

    // Catalog synchronization
    describe_counter!(
        "catalog_pages_fetched_total",
        "Upstream catalog pages fetched"
    );
    describe_counter!(
        "catalog_buckets_written_total",
        "Asset identity buckets written to the catalog store"
    );
    describe_counter!(
        "catalog_buckets_failed_total",
        "Asset identity buckets that could not be read or written"
    );
    describe_counter!("catalog_sync_runs_total", "Catalog sync runs by status");
    describe_histogram!(
        "catalog_sync_duration_seconds",
        "Catalog sync run duration in seconds"
    );
    describe_gauge!(
        "catalog_items_merged_last_run",
        "Catalog items merged in the last sync run"
    );
}
