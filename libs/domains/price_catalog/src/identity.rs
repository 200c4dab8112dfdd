use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::CatalogItem;

/// Provider segment of every identity written by this crate
pub const CATALOG_PROVIDER: &str = "azurerm";

/// Stable partition key grouping catalog items of one SKU in one region.
///
/// Format: `{provider}:{family}:{service}:{region}:{armSku}`, every segment
/// lower-cased, whitespace removed from family and service. On-demand, spot
/// and low-priority meters of the same SKU share one identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetIdentity(String);

impl AssetIdentity {
    pub fn new(
        provider: &str,
        service_family: &str,
        service_name: &str,
        region: &str,
        arm_sku_name: &str,
    ) -> Self {
        Self(format!(
            "{}:{}:{}:{}:{}",
            provider.to_lowercase(),
            compact(service_family),
            compact(service_name),
            region.to_lowercase(),
            arm_sku_name.to_lowercase(),
        ))
    }

    /// Identity of the bucket an upstream item belongs to
    pub fn for_item(item: &CatalogItem) -> Self {
        Self::new(
            CATALOG_PROVIDER,
            &item.service_family,
            &item.service_name,
            &item.arm_region_name,
            &item.arm_sku_name,
        )
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AssetIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn compact(value: &str) -> String {
    value
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_normalizes_segments() {
        let id = AssetIdentity::new(
            "azurerm",
            "Compute",
            "Virtual Machines",
            "EastUS",
            "Standard_D2s_v3",
        );
        assert_eq!(
            id.as_str(),
            "azurerm:compute:virtualmachines:eastus:standard_d2s_v3"
        );
    }

    #[test]
    fn test_identity_for_item_matches_manual_construction() {
        let item = CatalogItem {
            meter_id: "m-1".into(),
            service_family: "Compute".into(),
            service_name: "Virtual Machines".into(),
            arm_region_name: "westeurope".into(),
            arm_sku_name: "Standard_F2".into(),
            ..Default::default()
        };

        assert_eq!(
            AssetIdentity::for_item(&item),
            AssetIdentity::new(
                CATALOG_PROVIDER,
                "compute",
                "virtualmachines",
                "westeurope",
                "standard_f2"
            )
        );
    }

    #[test]
    fn test_spot_and_regular_meters_share_identity() {
        let regular = CatalogItem {
            meter_id: "regular".into(),
            sku_name: "D2s v3".into(),
            service_family: "Compute".into(),
            service_name: "Virtual Machines".into(),
            arm_region_name: "eastus".into(),
            arm_sku_name: "Standard_D2s_v3".into(),
            ..Default::default()
        };
        let spot = CatalogItem {
            meter_id: "spot".into(),
            sku_name: "D2s v3 Spot".into(),
            ..regular.clone()
        };

        assert_eq!(AssetIdentity::for_item(&regular), AssetIdentity::for_item(&spot));
    }
}
