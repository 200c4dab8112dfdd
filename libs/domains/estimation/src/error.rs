use domain_price_catalog::CatalogError;
use thiserror::Error;

/// Result type for plan handling
pub type EstimationResult<T> = Result<T, EstimationError>;

/// Result type for pricing a single asset
pub type PricingResult<T> = Result<T, PricingError>;

/// Errors raised while reading a plan and turning it into priceable assets
#[derive(Debug, Error)]
pub enum EstimationError {
    /// The plan document is not valid JSON or not a plan at all
    #[error("Invalid plan document: {0}")]
    InvalidPlan(#[from] serde_json::Error),

    #[error("No pricer registered for resource type '{resource_type}' ({address})")]
    UnsupportedResourceType {
        resource_type: String,
        address: String,
    },

    /// A registered resource is missing attributes or carries unusable values
    #[error("Cannot price {address} ({resource_type}): {details}")]
    MalformedAttributes {
        address: String,
        resource_type: String,
        details: String,
    },
}

/// Errors raised while pricing one asset. These never fail a whole estimate.
#[derive(Debug, Error)]
pub enum PricingError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("No catalog item matches {filter}")]
    NoMatchingCatalogItem { filter: String },

    #[error("No catalog item with reservation term '{term}'")]
    ReservationTermNotFound { term: String },
}

impl PricingError {
    /// Short, stable label for metrics
    pub fn kind(&self) -> &'static str {
        match self {
            PricingError::Catalog(e) => e.kind(),
            PricingError::NoMatchingCatalogItem { .. } => "no_match",
            PricingError::ReservationTermNotFound { .. } => "reservation_term",
        }
    }
}
