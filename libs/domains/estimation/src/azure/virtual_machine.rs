use domain_price_catalog::{CatalogField, CatalogItem, PriceQuery, Predicate};
use serde::Deserialize;

use super::attributes::{decode, malformed, nullable_list};
use crate::asset::PriceableAsset;
use crate::billing::{BillingScheme, OsFamily, VmPriority, resolve_unit_price};
use crate::error::{EstimationResult, PricingResult};
use crate::plan::PlanResourceChange;
use crate::registry::AssetPricer;

const SPOT: &str = "Spot";
const LOW_PRIORITY: &str = "Low Priority";
const WINDOWS: &str = "Windows";

/// One or more identical virtual machines
#[derive(Debug, Clone, PartialEq)]
pub struct VirtualMachine {
    pub size: String,
    pub location: String,
    pub os: OsFamily,
    pub priority: VmPriority,
    pub count: f64,
}

impl VirtualMachine {
    pub fn query(&self, scheme: BillingScheme) -> PriceQuery {
        let query = PriceQuery::new(
            "Compute",
            "Virtual Machines",
            &self.location,
            scheme.price_type(),
        )
        .with_arm_sku_name(&self.size);

        let query = match self.priority {
            VmPriority::Spot => query
                .with(Predicate::contains(CatalogField::SkuName, SPOT))
                .with(Predicate::not_contains(CatalogField::SkuName, LOW_PRIORITY)),
            VmPriority::LowPriority => query
                .with(Predicate::contains(CatalogField::SkuName, LOW_PRIORITY))
                .with(Predicate::not_contains(CatalogField::SkuName, SPOT)),
            VmPriority::Regular => query
                .with(Predicate::not_contains(CatalogField::SkuName, SPOT))
                .with(Predicate::not_contains(CatalogField::SkuName, LOW_PRIORITY)),
        };

        match self.os {
            OsFamily::Windows => query.with(Predicate::contains(CatalogField::ProductName, WINDOWS)),
            OsFamily::Linux => query.with(Predicate::not_contains(CatalogField::ProductName, WINDOWS)),
        }
    }
}

impl PriceableAsset for VirtualMachine {
    fn kind(&self) -> &'static str {
        "virtual_machine"
    }

    fn build_query(&self, scheme: BillingScheme) -> Option<PriceQuery> {
        Some(self.query(scheme))
    }

    fn resolve_hourly_price(&self, items: &[CatalogItem], scheme: BillingScheme) -> PricingResult<f64> {
        Ok(resolve_unit_price(items, scheme)? * self.count)
    }
}

#[derive(Debug, Deserialize)]
struct VmAttributes {
    size: String,
    location: String,
    #[serde(default)]
    priority: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LegacyVmAttributes {
    vm_size: String,
    location: String,
    #[serde(default, deserialize_with = "nullable_list")]
    os_profile_windows_config: Vec<serde_json::Value>,
}

fn priority(change: &PlanResourceChange, raw: Option<&str>) -> EstimationResult<VmPriority> {
    VmPriority::from_attribute(raw).map_err(|details| malformed(change, details))
}

fn single_vm(change: &PlanResourceChange, os: OsFamily) -> EstimationResult<Vec<Box<dyn PriceableAsset>>> {
    let attrs: VmAttributes = decode(change)?;
    Ok(vec![Box::new(VirtualMachine {
        priority: priority(change, attrs.priority.as_deref())?,
        size: attrs.size,
        location: attrs.location,
        os,
        count: 1.0,
    })])
}

/// `azurerm_linux_virtual_machine`
pub struct LinuxVirtualMachinePricer;

impl AssetPricer for LinuxVirtualMachinePricer {
    fn keys(&self) -> &'static [&'static str] {
        &["azurerm_linux_virtual_machine"]
    }

    fn generate(&self, change: &PlanResourceChange) -> EstimationResult<Vec<Box<dyn PriceableAsset>>> {
        single_vm(change, OsFamily::Linux)
    }
}

/// `azurerm_windows_virtual_machine`
pub struct WindowsVirtualMachinePricer;

impl AssetPricer for WindowsVirtualMachinePricer {
    fn keys(&self) -> &'static [&'static str] {
        &["azurerm_windows_virtual_machine"]
    }

    fn generate(&self, change: &PlanResourceChange) -> EstimationResult<Vec<Box<dyn PriceableAsset>>> {
        single_vm(change, OsFamily::Windows)
    }
}

/// `azurerm_virtual_machine`, the pre-2.0 resource; the OS comes from the
/// presence of a Windows profile block
pub struct LegacyVirtualMachinePricer;

impl AssetPricer for LegacyVirtualMachinePricer {
    fn keys(&self) -> &'static [&'static str] {
        &["azurerm_virtual_machine"]
    }

    fn generate(&self, change: &PlanResourceChange) -> EstimationResult<Vec<Box<dyn PriceableAsset>>> {
        let attrs: LegacyVmAttributes = decode(change)?;
        let os = if attrs.os_profile_windows_config.is_empty() {
            OsFamily::Linux
        } else {
            OsFamily::Windows
        };

        Ok(vec![Box::new(VirtualMachine {
            size: attrs.vm_size,
            location: attrs.location,
            os,
            priority: VmPriority::Regular,
            count: 1.0,
        })])
    }
}
