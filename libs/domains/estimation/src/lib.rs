//! Estimation domain
//!
//! Turns a Terraform plan into an hourly, monthly and yearly cost estimate.
//!
//! ```text
//! plan JSON ─► classify ─► PriceableAsset ─► PriceSource ─► EstimateResult
//!                 │
//!          AssetPricerRegistry
//! ```

pub mod asset;
pub mod azure;
pub mod billing;
pub mod classifier;
pub mod error;
pub mod models;
pub mod plan;
pub mod registry;
pub mod service;

pub use asset::{PriceableAsset, price_asset};
pub use azure::{AZURERM_PROVIDER, NON_BILLABLE_TYPES};
pub use billing::{
    BillingScheme, HOURS_PER_MONTH, HOURS_PER_YEAR, OsFamily, ReservationTerm, VmPriority,
    resolve_unit_price,
};
pub use classifier::{Classification, PricedResource, classify};
pub use error::{EstimationError, EstimationResult, PricingError, PricingResult};
pub use models::{EstimateResult, EstimateSummary, LineItem, PricingFailure};
pub use plan::{PlanDocument, PlanResourceChange, parse_plan};
pub use registry::{AssetPricer, AssetPricerRegistry};
pub use service::{CostEstimator, DEFAULT_CONCURRENCY};
