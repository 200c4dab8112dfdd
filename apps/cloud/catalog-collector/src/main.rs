//! Catalog Collector
//!
//! Mirrors the Azure retail price list into the Redis price catalog.
//! Can run as a one-shot sync or as a scheduled cron job.

use clap::{Parser, Subcommand};
use core_config::FromEnv;
use core_config::tracing::{init_tracing, install_color_eyre};
use domain_price_catalog::{AssetIdentity, CATALOG_PROVIDER};
use eyre::Result;
use std::path::PathBuf;
use tracing::info;

mod collector;
mod config;

use collector::CatalogCollector;
use config::Config;

#[derive(Parser)]
#[command(name = "catalog-collector")]
#[command(about = "Mirror the Azure retail price list into the price catalog")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a one-time sync
    Sync {
        /// Also write a prices.json snapshot into this directory
        #[arg(short, long)]
        snapshot_dir: Option<PathBuf>,
    },

    /// Run as a scheduled service
    Schedule {
        /// Cron expression with seconds (default: CATALOG_SYNC_CRON or daily at 03:00)
        #[arg(short, long)]
        cron: Option<String>,
    },

    /// Print one stored bucket as JSON
    Inspect {
        /// Service family, e.g. Compute
        #[arg(long)]
        family: String,

        /// Service name, e.g. "Virtual Machines"
        #[arg(long)]
        service: String,

        /// ARM region, e.g. eastus
        #[arg(long)]
        region: String,

        /// ARM SKU name, e.g. Standard_D2_v2
        #[arg(long, default_value = "")]
        sku: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    install_color_eyre();

    let config = Config::from_env()?;
    init_tracing(&config.environment);
    observability::init_metrics()?;

    let cli = Cli::parse();
    let collector = CatalogCollector::connect(config.clone()).await?;

    match cli.command {
        Commands::Sync { snapshot_dir } => {
            info!("Starting one-time catalog sync");

            let report = collector.sync_once(snapshot_dir).await?;

            info!(
                pages = report.pages_fetched,
                items = report.items_seen,
                merged = report.items_merged,
                snapshot = report.snapshot_written,
                "Sync complete"
            );
            println!("{}", serde_json::to_string_pretty(&report)?);
        }

        Commands::Schedule { cron } => {
            let cron = cron.unwrap_or(config.sync_cron);
            collector.run_scheduled(&cron).await?;
        }

        Commands::Inspect {
            family,
            service,
            region,
            sku,
        } => {
            let identity = AssetIdentity::new(CATALOG_PROVIDER, &family, &service, &region, &sku);
            let bucket = collector.inspect(&identity).await?.unwrap_or_default();

            info!(identity = %identity, items = bucket.len(), "Loaded bucket");
            println!("{}", serde_json::to_string_pretty(&bucket)?);
        }
    }

    Ok(())
}
