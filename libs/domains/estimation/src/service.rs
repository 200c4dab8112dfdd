use domain_price_catalog::PriceSource;
use futures::stream::{self, StreamExt};
use observability::{EstimateTimer, EstimationMetrics};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use crate::asset::price_asset;
use crate::azure::AZURERM_PROVIDER;
use crate::billing::BillingScheme;
use crate::classifier::classify;
use crate::error::EstimationResult;
use crate::models::{EstimateResult, EstimateSummary, LineItem, PricingFailure};
use crate::plan::parse_plan;
use crate::registry::AssetPricerRegistry;

/// Default number of concurrent catalog lookups per estimate
pub const DEFAULT_CONCURRENCY: usize = 8;

/// Prices whole plan documents
pub struct CostEstimator<P> {
    registry: Arc<AssetPricerRegistry>,
    source: P,
    target_provider: String,
    concurrency: usize,
}

impl<P: PriceSource> CostEstimator<P> {
    pub fn new(registry: Arc<AssetPricerRegistry>, source: P) -> Self {
        Self {
            registry,
            source,
            target_provider: AZURERM_PROVIDER.to_string(),
            concurrency: DEFAULT_CONCURRENCY,
        }
    }

    pub fn with_target_provider(mut self, provider: impl Into<String>) -> Self {
        self.target_provider = provider.into();
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn registry(&self) -> &AssetPricerRegistry {
        &self.registry
    }

    /// Estimate the running cost of a plan.
    ///
    /// Only a malformed plan fails the call. Every priced asset gets its own
    /// line item, in plan order. Assets that cannot be priced add nothing to
    /// the total and are listed in `pricing_failures`.
    #[instrument(skip(self, plan), fields(plan_bytes = plan.len(), scheme = %scheme))]
    pub async fn estimate(&self, plan: &[u8], scheme: BillingScheme) -> EstimationResult<EstimateResult> {
        let mut timer = EstimateTimer::start();

        let document = parse_plan(plan).inspect_err(|_| EstimationMetrics::record_invalid_plan())?;
        let classification = classify(&document, &self.registry, &self.target_provider);

        EstimationMetrics::record_classification(
            classification.priced.len(),
            classification.unsupported.len(),
            classification.unestimateable.len(),
        );
        debug!(
            priced = classification.priced.len(),
            unsupported = classification.unsupported.len(),
            unestimateable = classification.unestimateable.len(),
            "Classified plan resources"
        );

        let jobs = classification
            .priced
            .iter()
            .enumerate()
            .flat_map(|(index, resource)| {
                resource.assets.iter().map(move |asset| (index, asset))
            })
            .map(|(index, asset)| async move {
                let outcome = price_asset(asset.as_ref(), &self.source, scheme).await;
                (index, asset.kind(), outcome)
            });

        let outcomes: Vec<_> = stream::iter(jobs)
            .buffered(self.concurrency)
            .collect()
            .await;

        let mut line_items = Vec::with_capacity(outcomes.len());
        let mut pricing_failures = classification.failures;

        for (index, kind, outcome) in outcomes {
            let resource = &classification.priced[index];
            match outcome {
                Ok(hourly) => {
                    EstimationMetrics::record_asset_priced(kind);
                    line_items.push(LineItem {
                        address: resource.address.clone(),
                        resource_type: resource.resource_type.clone(),
                        asset: kind.to_string(),
                        hourly_cost_usd: hourly,
                    });
                }
                Err(e) => {
                    EstimationMetrics::record_asset_failed(kind, e.kind());
                    warn!(
                        address = %resource.address,
                        asset = kind,
                        error = %e,
                        "Asset could not be priced, counting it as zero"
                    );
                    pricing_failures.push(PricingFailure {
                        address: resource.address.clone(),
                        resource_type: resource.resource_type.clone(),
                        asset: Some(kind.to_string()),
                        reason: e.to_string(),
                    });
                }
            }
        }

        let hourly: f64 = line_items.iter().map(|item| item.hourly_cost_usd).sum();

        let duration_ms = timer.finish(!pricing_failures.is_empty());
        info!(
            hourly_cost_usd = hourly,
            line_items = line_items.len(),
            failures = pricing_failures.len(),
            duration_ms,
            "Plan estimated"
        );

        Ok(EstimateResult {
            estimate_summary: EstimateSummary::from_hourly(hourly),
            unsupported_resources: classification.unsupported,
            unestimateable_resources: classification.unestimateable,
            line_items,
            pricing_failures,
        })
    }
}
