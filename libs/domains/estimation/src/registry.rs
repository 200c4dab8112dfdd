//! Resource type → asset pricer lookup.
//!
//! The registry is filled once at startup and then shared read-only.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::debug;

use crate::asset::PriceableAsset;
use crate::error::{EstimationError, EstimationResult};
use crate::plan::PlanResourceChange;

/// Turns a planned resource of a known type into priceable assets
pub trait AssetPricer: Send + Sync {
    /// Resource types this pricer handles
    fn keys(&self) -> &'static [&'static str];

    /// Decode the planned attributes into zero or more assets
    fn generate(&self, change: &PlanResourceChange) -> EstimationResult<Vec<Box<dyn PriceableAsset>>>;
}

#[derive(Default)]
pub struct AssetPricerRegistry {
    pricers: HashMap<String, Arc<dyn AssetPricer>>,
    non_billable: HashSet<String>,
}

impl AssetPricerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every Azure pricer and the Azure non-billable types
    pub fn azure() -> Self {
        let mut registry = Self::new();
        crate::azure::register_all(&mut registry);
        registry
    }

    /// Register a pricer under each of its keys; a later registration wins
    pub fn register(&mut self, pricer: impl AssetPricer + 'static) {
        let pricer: Arc<dyn AssetPricer> = Arc::new(pricer);
        for key in pricer.keys() {
            if self
                .pricers
                .insert((*key).to_string(), Arc::clone(&pricer))
                .is_some()
            {
                debug!(resource_type = *key, "Replaced asset pricer");
            }
        }
    }

    /// Record a type that exists in plans but has no cost of its own
    pub fn mark_non_billable(&mut self, resource_type: impl Into<String>) {
        self.non_billable.insert(resource_type.into());
    }

    pub fn resolve(&self, resource_type: &str) -> Option<&dyn AssetPricer> {
        self.pricers.get(resource_type).map(|p| p.as_ref())
    }

    pub fn contains(&self, resource_type: &str) -> bool {
        self.pricers.contains_key(resource_type)
    }

    pub fn is_non_billable(&self, resource_type: &str) -> bool {
        self.non_billable.contains(resource_type)
    }

    /// Registered resource types, sorted
    pub fn registered_types(&self) -> Vec<&str> {
        let mut types: Vec<&str> = self.pricers.keys().map(String::as_str).collect();
        types.sort_unstable();
        types
    }

    /// Non-billable resource types, sorted
    pub fn non_billable_types(&self) -> Vec<&str> {
        let mut types: Vec<&str> = self.non_billable.iter().map(String::as_str).collect();
        types.sort_unstable();
        types
    }

    pub fn generate_priceable_assets(
        &self,
        change: &PlanResourceChange,
    ) -> EstimationResult<Vec<Box<dyn PriceableAsset>>> {
        let pricer = self.resolve(&change.resource_type).ok_or_else(|| {
            EstimationError::UnsupportedResourceType {
                resource_type: change.resource_type.clone(),
                address: change.address.clone(),
            }
        })?;
        pricer.generate(change)
    }
}
