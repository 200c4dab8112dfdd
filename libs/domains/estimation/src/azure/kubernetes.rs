use domain_price_catalog::{CatalogItem, PriceQuery};
use serde::Deserialize;

use super::attributes::{decode, malformed, nullable_list};
use super::virtual_machine::VirtualMachine;
use crate::asset::PriceableAsset;
use crate::billing::{BillingScheme, OsFamily, VmPriority};
use crate::error::{EstimationResult, PricingResult};
use crate::plan::PlanResourceChange;
use crate::registry::AssetPricer;

/// Hourly uptime SLA fee of a Standard tier control plane
pub const STANDARD_CONTROL_PLANE_HOURLY: f64 = 0.10;

/// Hourly fee of a Premium tier control plane, long term support included
pub const PREMIUM_CONTROL_PLANE_HOURLY: f64 = 0.60;

/// AKS control plane pricing tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ClusterSkuTier {
    #[default]
    Free,
    Standard,
    Premium,
}

impl ClusterSkuTier {
    /// Parse `sku_tier` case-insensitively. `Paid` is the legacy name of
    /// `Standard`; missing or unknown tiers are free.
    pub fn from_sku_tier(sku_tier: Option<&str>) -> Self {
        match sku_tier {
            Some(tier) if tier.eq_ignore_ascii_case("Premium") => Self::Premium,
            Some(tier) if tier.eq_ignore_ascii_case("Standard") || tier.eq_ignore_ascii_case("Paid") => {
                Self::Standard
            }
            _ => Self::Free,
        }
    }

    pub fn hourly_price(self) -> f64 {
        match self {
            Self::Free => 0.0,
            Self::Standard => STANDARD_CONTROL_PLANE_HOURLY,
            Self::Premium => PREMIUM_CONTROL_PLANE_HOURLY,
        }
    }
}

/// Managed Kubernetes control plane, priced by tier without a catalog lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClusterControlPlane {
    pub tier: ClusterSkuTier,
}

impl ClusterControlPlane {
    pub fn from_sku_tier(sku_tier: Option<&str>) -> Self {
        Self {
            tier: ClusterSkuTier::from_sku_tier(sku_tier),
        }
    }
}

impl PriceableAsset for ClusterControlPlane {
    fn kind(&self) -> &'static str {
        "cluster_control_plane"
    }

    fn build_query(&self, _scheme: BillingScheme) -> Option<PriceQuery> {
        None
    }

    fn resolve_hourly_price(&self, _items: &[CatalogItem], _scheme: BillingScheme) -> PricingResult<f64> {
        Ok(self.tier.hourly_price())
    }
}

#[derive(Debug, Deserialize)]
struct ClusterAttributes {
    location: String,
    #[serde(default)]
    sku_tier: Option<String>,
    #[serde(default, deserialize_with = "nullable_list")]
    default_node_pool: Vec<NodePoolAttributes>,
}

#[derive(Debug, Deserialize)]
struct NodePoolAttributes {
    vm_size: String,
    #[serde(default)]
    node_count: Option<f64>,
    #[serde(default)]
    min_count: Option<f64>,
}

/// `azurerm_kubernetes_cluster`: control plane plus the default node pool
pub struct KubernetesClusterPricer;

impl AssetPricer for KubernetesClusterPricer {
    fn keys(&self) -> &'static [&'static str] {
        &["azurerm_kubernetes_cluster"]
    }

    fn generate(&self, change: &PlanResourceChange) -> EstimationResult<Vec<Box<dyn PriceableAsset>>> {
        let attrs: ClusterAttributes = decode(change)?;
        let pool = attrs
            .default_node_pool
            .into_iter()
            .next()
            .ok_or_else(|| malformed(change, "default_node_pool block is missing"))?;
        // Autoscaled pools may leave node_count unknown until apply
        let node_count = pool
            .node_count
            .or(pool.min_count)
            .ok_or_else(|| malformed(change, "default_node_pool has neither node_count nor min_count"))?;

        let control_plane: Box<dyn PriceableAsset> =
            Box::new(ClusterControlPlane::from_sku_tier(attrs.sku_tier.as_deref()));
        let node_pool: Box<dyn PriceableAsset> = Box::new(VirtualMachine {
            size: pool.vm_size,
            location: attrs.location,
            os: OsFamily::Linux,
            priority: VmPriority::Regular,
            count: node_count,
        });

        Ok(vec![control_plane, node_pool])
    }
}
