//! Cost Estimator
//!
//! Reads a Terraform plan in JSON form (`terraform show -json`) and prints the
//! hourly, monthly and yearly cost of its azurerm resources.

use clap::{Parser, Subcommand};
use core_config::FromEnv;
use core_config::tracing::{init_tracing, install_color_eyre};
use domain_estimation::{AssetPricerRegistry, BillingScheme, CostEstimator};
use eyre::{Result, WrapErr};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::AsyncReadExt;
use tracing::info;

mod config;
mod source;

use config::{Config, SourceKind};

#[derive(Parser)]
#[command(name = "cost-estimator")]
#[command(about = "Estimate the running cost of a Terraform plan on Azure")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Estimate a plan and print the result as JSON
    Estimate {
        /// Plan JSON file, `-` for stdin
        #[arg(short, long, default_value = "-")]
        plan: PathBuf,

        /// consumption, devtestconsumption, reservation1yr or reservation3yr (default: PRICE_TYPE)
        #[arg(short = 't', long)]
        price_type: Option<BillingScheme>,

        /// Price lookup backend (default: PRICE_SOURCE)
        #[arg(short, long, value_enum)]
        source: Option<SourceKind>,

        /// Concurrent price lookups (default: ESTIMATE_CONCURRENCY)
        #[arg(short, long)]
        concurrency: Option<usize>,

        /// Print Prometheus metrics to stderr after the estimate
        #[arg(long)]
        emit_metrics: bool,
    },

    /// List the resource types with a registered pricer
    Pricers,
}

#[derive(Serialize)]
struct PricerListing<'a> {
    priced: Vec<&'a str>,
    non_billable: Vec<&'a str>,
}

#[tokio::main]
async fn main() -> Result<()> {
    install_color_eyre();

    let config = Config::from_env()?;
    init_tracing(&config.environment);

    let cli = Cli::parse();
    let registry = Arc::new(AssetPricerRegistry::azure());

    match cli.command {
        Commands::Estimate {
            plan,
            price_type,
            source,
            concurrency,
            emit_metrics,
        } => {
            if emit_metrics {
                observability::init_metrics()?;
            }

            let scheme = price_type.unwrap_or(config.billing_scheme);
            let source = source::connect(&config, source.unwrap_or(config.price_source)).await?;
            let estimator = CostEstimator::new(registry, source)
                .with_target_provider(&config.target_provider)
                .with_concurrency(concurrency.unwrap_or(config.concurrency));

            let bytes = read_plan(&plan).await?;
            info!(plan = %plan.display(), bytes = bytes.len(), scheme = %scheme, "Estimating plan");

            let result = estimator.estimate(&bytes, scheme).await?;
            println!("{}", serde_json::to_string_pretty(&result)?);

            if emit_metrics {
                eprint!("{}", observability::render_metrics());
            }
        }

        Commands::Pricers => {
            let listing = PricerListing {
                priced: registry.registered_types(),
                non_billable: registry.non_billable_types(),
            };
            println!("{}", serde_json::to_string_pretty(&listing)?);
        }
    }

    Ok(())
}

/// Read the plan from a file, or from stdin for `-`
async fn read_plan(path: &Path) -> Result<Vec<u8>> {
    if path == Path::new("-") {
        let mut buf = Vec::new();
        tokio::io::stdin()
            .read_to_end(&mut buf)
            .await
            .wrap_err("Failed to read plan from stdin")?;
        return Ok(buf);
    }

    tokio::fs::read(path)
        .await
        .wrap_err_with(|| format!("Failed to read plan file {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_estimate_args() {
        let cli = Cli::try_parse_from([
            "cost-estimator",
            "estimate",
            "--plan",
            "plan.json",
            "--price-type",
            "reservation1yr",
            "--source",
            "catalog",
        ])
        .unwrap();

        let Commands::Estimate {
            plan,
            price_type,
            source,
            ..
        } = cli.command
        else {
            panic!("expected estimate command");
        };
        assert_eq!(plan, PathBuf::from("plan.json"));
        assert_eq!(
            price_type,
            Some(BillingScheme::Reservation(domain_estimation::ReservationTerm::OneYear))
        );
        assert_eq!(source, Some(SourceKind::Catalog));
    }

    #[test]
    fn test_bad_price_type_is_rejected() {
        assert!(Cli::try_parse_from(["cost-estimator", "estimate", "--price-type", "spot"]).is_err());
    }

    #[tokio::test]
    async fn test_read_plan_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plan.json");
        std::fs::write(&path, br#"{"resource_changes": []}"#).unwrap();

        let bytes = read_plan(&path).await.unwrap();
        assert_eq!(bytes, br#"{"resource_changes": []}"#);
    }

    #[tokio::test]
    async fn test_read_missing_plan_names_the_file() {
        let err = read_plan(Path::new("/nonexistent/plan.json")).await.unwrap_err();
        assert!(err.to_string().contains("/nonexistent/plan.json"));
    }
}
