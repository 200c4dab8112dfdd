use serde::Deserialize;

use super::attributes::{decode, malformed, nullable_list};
use super::virtual_machine::VirtualMachine;
use crate::asset::PriceableAsset;
use crate::billing::{OsFamily, VmPriority};
use crate::error::EstimationResult;
use crate::plan::PlanResourceChange;
use crate::registry::AssetPricer;

#[derive(Debug, Deserialize)]
struct ScaleSetAttributes {
    sku: String,
    location: String,
    #[serde(default)]
    instances: f64,
    #[serde(default)]
    priority: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LegacyScaleSetAttributes {
    location: String,
    sku: Vec<LegacySku>,
    #[serde(default)]
    priority: Option<String>,
    #[serde(default, deserialize_with = "nullable_list")]
    os_profile_windows_config: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct LegacySku {
    name: String,
    capacity: f64,
}

fn scale_set(change: &PlanResourceChange, os: OsFamily) -> EstimationResult<Vec<Box<dyn PriceableAsset>>> {
    let attrs: ScaleSetAttributes = decode(change)?;
    let priority = VmPriority::from_attribute(attrs.priority.as_deref())
        .map_err(|details| malformed(change, details))?;

    Ok(vec![Box::new(VirtualMachine {
        size: attrs.sku,
        location: attrs.location,
        os,
        priority,
        count: attrs.instances,
    })])
}

/// `azurerm_linux_virtual_machine_scale_set`
pub struct LinuxScaleSetPricer;

impl AssetPricer for LinuxScaleSetPricer {
    fn keys(&self) -> &'static [&'static str] {
        &["azurerm_linux_virtual_machine_scale_set"]
    }

    fn generate(&self, change: &PlanResourceChange) -> EstimationResult<Vec<Box<dyn PriceableAsset>>> {
        scale_set(change, OsFamily::Linux)
    }
}

/// `azurerm_windows_virtual_machine_scale_set`
pub struct WindowsScaleSetPricer;

impl AssetPricer for WindowsScaleSetPricer {
    fn keys(&self) -> &'static [&'static str] {
        &["azurerm_windows_virtual_machine_scale_set"]
    }

    fn generate(&self, change: &PlanResourceChange) -> EstimationResult<Vec<Box<dyn PriceableAsset>>> {
        scale_set(change, OsFamily::Windows)
    }
}

/// `azurerm_virtual_machine_scale_set`: size and capacity live in the first
/// `sku` block, priority is `Regular` or `Low`
pub struct LegacyScaleSetPricer;

impl AssetPricer for LegacyScaleSetPricer {
    fn keys(&self) -> &'static [&'static str] {
        &["azurerm_virtual_machine_scale_set"]
    }

    fn generate(&self, change: &PlanResourceChange) -> EstimationResult<Vec<Box<dyn PriceableAsset>>> {
        let attrs: LegacyScaleSetAttributes = decode(change)?;
        let priority = VmPriority::from_attribute(attrs.priority.as_deref())
            .map_err(|details| malformed(change, details))?;
        let os = if attrs.os_profile_windows_config.is_empty() {
            OsFamily::Linux
        } else {
            OsFamily::Windows
        };
        let sku = attrs
            .sku
            .into_iter()
            .next()
            .ok_or_else(|| malformed(change, "sku block is empty"))?;

        Ok(vec![Box::new(VirtualMachine {
            size: sku.name,
            location: attrs.location,
            os,
            priority,
            count: sku.capacity,
        })])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::billing::BillingScheme;
    use crate::error::EstimationError;
    use domain_price_catalog::{CatalogField, CatalogItem, Predicate};

    fn change(resource_type: &str, after: serde_json::Value) -> PlanResourceChange {
        serde_json::from_value(serde_json::json!({
            "address": format!("{resource_type}.pool"),
            "type": resource_type,
            "change": {"after": after}
        }))
        .unwrap()
    }

    fn priced(assets: &[Box<dyn PriceableAsset>], unit_price: f64) -> f64 {
        let item = CatalogItem {
            meter_id: "m".into(),
            unit_price,
            ..Default::default()
        };
        assets[0]
            .resolve_hourly_price(&[item], BillingScheme::Consumption)
            .unwrap()
    }

    #[test]
    fn test_linux_scale_set_uses_instances() {
        let assets = LinuxScaleSetPricer
            .generate(&change(
                "azurerm_linux_virtual_machine_scale_set",
                serde_json::json!({"sku": "Standard_F2", "location": "eastus", "instances": 4}),
            ))
            .unwrap();

        assert!((priced(&assets, 0.1) - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_windows_scale_set_queries_windows_meters() {
        let assets = WindowsScaleSetPricer
            .generate(&change(
                "azurerm_windows_virtual_machine_scale_set",
                serde_json::json!({"sku": "Standard_F2", "location": "eastus", "instances": 2}),
            ))
            .unwrap();

        let query = assets[0].build_query(BillingScheme::Consumption).unwrap();
        assert_eq!(query.arm_sku_name.as_deref(), Some("Standard_F2"));
        assert!(query
            .predicates
            .contains(&Predicate::contains(CatalogField::ProductName, "Windows")));
    }

    #[test]
    fn test_legacy_scale_set_reads_first_sku_block() {
        let assets = LegacyScaleSetPricer
            .generate(&change(
                "azurerm_virtual_machine_scale_set",
                serde_json::json!({
                    "location": "eastus",
                    "priority": "Low",
                    "sku": [{"name": "Standard_F2", "tier": "Standard", "capacity": 3}],
                    "os_profile_windows_config": []
                }),
            ))
            .unwrap();

        let query = assets[0].build_query(BillingScheme::Consumption).unwrap();
        assert_eq!(query.arm_sku_name.as_deref(), Some("Standard_F2"));
        assert!(query
            .predicates
            .contains(&Predicate::contains(CatalogField::SkuName, "Low Priority")));
        assert!(query
            .predicates
            .contains(&Predicate::not_contains(CatalogField::ProductName, "Windows")));
        assert!((priced(&assets, 0.2) - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_legacy_scale_set_without_sku_is_malformed() {
        let err = LegacyScaleSetPricer
            .generate(&change(
                "azurerm_virtual_machine_scale_set",
                serde_json::json!({"location": "eastus", "sku": []}),
            ))
            .unwrap_err();
        assert!(matches!(err, EstimationError::MalformedAttributes { .. }));
    }
}
