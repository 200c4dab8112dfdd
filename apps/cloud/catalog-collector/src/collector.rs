//! Catalog collector service
//!
//! Wires the retail price client, the Redis store and the optional snapshot
//! sink into a [`CatalogSynchronizer`], and runs it once or on a cron schedule.

use domain_price_catalog::{
    AssetIdentity, CatalogItem, CatalogSynchronizer, FsSnapshotSink, PriceCatalogStore,
    RedisCatalogStore, ReqwestHttpGet, RetailPricesClient, SyncOptions, SyncReport,
};
use eyre::Result;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::{error, info, warn};

use crate::config::Config;

type Synchronizer = CatalogSynchronizer<ReqwestHttpGet, RedisCatalogStore>;

pub struct CatalogCollector {
    config: Config,
    store: RedisCatalogStore,
}

impl CatalogCollector {
    /// Connect to the store, retrying per the Redis settings
    pub async fn connect(config: Config) -> Result<Self> {
        let store = RedisCatalogStore::connect(&config.redis).await?;
        Ok(Self { config, store })
    }

    fn synchronizer(&self, snapshot_dir: Option<PathBuf>) -> Result<Synchronizer> {
        let http = ReqwestHttpGet::new(self.config.http_timeout)?;
        let client = RetailPricesClient::with_base_url(http, &self.config.retail_prices_url);
        let options = SyncOptions::default().with_price_types(self.config.price_types.clone());

        let synchronizer =
            CatalogSynchronizer::new(client, self.store.clone()).with_options(options);

        Ok(match snapshot_dir.or_else(|| self.config.snapshot_dir.clone()) {
            Some(dir) => synchronizer.with_snapshot(FsSnapshotSink::new(dir)),
            None => synchronizer,
        })
    }

    /// Run a single sync; `snapshot_dir` overrides the configured directory
    pub async fn sync_once(&self, snapshot_dir: Option<PathBuf>) -> Result<SyncReport> {
        let report = self.synchronizer(snapshot_dir)?.refresh().await?;
        Ok(report)
    }

    /// Run syncs on `cron_expr` until interrupted.
    ///
    /// A tick that fires while the previous sync is still running is skipped.
    pub async fn run_scheduled(&self, cron_expr: &str) -> Result<()> {
        info!(cron = cron_expr, "Starting scheduled catalog sync");

        let synchronizer = Arc::new(Mutex::new(self.synchronizer(None)?));
        let mut sched = JobScheduler::new().await?;

        let job = Job::new_async(cron_expr, move |_uuid, _l| {
            let synchronizer = synchronizer.clone();

            Box::pin(async move {
                let Ok(running) = synchronizer.try_lock() else {
                    warn!("Previous catalog sync still running, skipping this tick");
                    return;
                };

                match running.refresh().await {
                    Ok(report) => info!(
                        pages = report.pages_fetched,
                        merged = report.items_merged,
                        buckets = report.buckets_attempted,
                        duration_ms = report.duration_ms,
                        "Scheduled catalog sync complete"
                    ),
                    Err(e) => error!(error = %e, "Scheduled catalog sync failed"),
                }
            })
        })?;

        sched.add(job).await?;
        sched.start().await?;

        info!("Scheduler started, waiting for jobs...");
        tokio::signal::ctrl_c().await?;

        info!("Shutting down scheduler");
        sched.shutdown().await?;
        Ok(())
    }

    /// Stored bucket for one asset identity
    pub async fn inspect(&self, identity: &AssetIdentity) -> Result<Option<Vec<CatalogItem>>> {
        Ok(self.store.get(identity).await?)
    }
}
