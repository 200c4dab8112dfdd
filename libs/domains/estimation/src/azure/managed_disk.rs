//! Managed disk pricing.
//!
//! Standard and premium disks are billed per capacity tier per month; ultra
//! disks are billed per provisioned GiB per hour.
//! <https://azure.microsoft.com/en-us/pricing/details/managed-disks/>

use domain_price_catalog::{CatalogField, CatalogItem, PriceQuery, PriceType, Predicate};
use serde::Deserialize;
use strum::{Display, EnumString};

use super::attributes::{decode, malformed};
use crate::asset::PriceableAsset;
use crate::billing::{BillingScheme, HOURS_PER_MONTH, resolve_unit_price};
use crate::error::{EstimationResult, PricingResult};
use crate::plan::PlanResourceChange;
use crate::registry::AssetPricer;

/// `storage_account_type` values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
pub enum DiskStorageType {
    #[strum(serialize = "Standard_LRS")]
    StandardLrs,
    #[strum(serialize = "StandardSSD_LRS")]
    StandardSsdLrs,
    #[strum(serialize = "StandardSSD_ZRS")]
    StandardSsdZrs,
    #[strum(serialize = "Premium_LRS")]
    PremiumLrs,
    #[strum(serialize = "Premium_ZRS")]
    PremiumZrs,
    #[strum(serialize = "UltraSSD_LRS")]
    UltraSsdLrs,
}

impl DiskStorageType {
    /// Catalog `productName`
    pub fn product_name(self) -> &'static str {
        match self {
            DiskStorageType::StandardLrs => "Standard HDD Managed Disks",
            DiskStorageType::StandardSsdLrs | DiskStorageType::StandardSsdZrs => {
                "Standard SSD Managed Disks"
            }
            DiskStorageType::PremiumLrs | DiskStorageType::PremiumZrs => "Premium SSD Managed Disks",
            DiskStorageType::UltraSsdLrs => "Ultra Disks",
        }
    }

    /// Letter prefixed to the capacity tier number, `None` for ultra disks
    pub fn tier_prefix(self) -> Option<char> {
        match self {
            DiskStorageType::StandardLrs => Some('S'),
            DiskStorageType::StandardSsdLrs | DiskStorageType::StandardSsdZrs => Some('E'),
            DiskStorageType::PremiumLrs | DiskStorageType::PremiumZrs => Some('P'),
            DiskStorageType::UltraSsdLrs => None,
        }
    }

    pub fn redundancy(self) -> &'static str {
        match self {
            DiskStorageType::StandardSsdZrs | DiskStorageType::PremiumZrs => "ZRS",
            _ => "LRS",
        }
    }
}

/// Largest size each capacity tier covers, in GiB
const TIERS: &[(f64, u32)] = &[
    (4.0, 1),
    (8.0, 2),
    (16.0, 3),
    (32.0, 4),
    (64.0, 6),
    (128.0, 10),
    (256.0, 15),
    (512.0, 20),
    (1024.0, 30),
    (2048.0, 40),
    (4096.0, 50),
    (8192.0, 60),
    (16384.0, 70),
    (32767.0, 80),
];

/// Capacity tier number for a disk size, `None` above the largest tier
pub fn capacity_tier(size_gb: f64) -> Option<u32> {
    TIERS
        .iter()
        .find(|(max_gb, _)| size_gb <= *max_gb)
        .map(|(_, tier)| *tier)
}

#[derive(Debug, Clone, PartialEq)]
pub struct ManagedDisk {
    pub location: String,
    pub size_gb: f64,
    pub storage_type: DiskStorageType,
    /// Resolved at classification time; unused for ultra disks
    pub tier: u32,
    pub count: u32,
}

impl ManagedDisk {
    /// Catalog `skuName` of a tiered disk, e.g. `P10 LRS`
    pub fn sku_name(&self) -> Option<String> {
        self.storage_type
            .tier_prefix()
            .map(|prefix| format!("{}{} {}", prefix, self.tier, self.storage_type.redundancy()))
    }

    pub fn query(&self) -> PriceQuery {
        let query = PriceQuery::new("Storage", "Storage", &self.location, PriceType::Consumption)
            .with(Predicate::equals(
                CatalogField::ProductName,
                self.storage_type.product_name(),
            ));

        match self.sku_name() {
            Some(sku_name) => query.with(Predicate::equals(CatalogField::SkuName, sku_name)),
            None => query.with(Predicate::equals(CatalogField::MeterName, "Provisioned Capacity")),
        }
    }
}

impl PriceableAsset for ManagedDisk {
    fn kind(&self) -> &'static str {
        "managed_disk"
    }

    /// Disks have no reservation or dev/test prices in the catalog
    fn build_query(&self, _scheme: BillingScheme) -> Option<PriceQuery> {
        Some(self.query())
    }

    fn resolve_hourly_price(&self, items: &[CatalogItem], _scheme: BillingScheme) -> PricingResult<f64> {
        let unit_price = resolve_unit_price(items, BillingScheme::Consumption)?;
        let count = f64::from(self.count);

        Ok(match self.storage_type {
            DiskStorageType::UltraSsdLrs => unit_price * self.size_gb * count,
            _ => unit_price * count / HOURS_PER_MONTH,
        })
    }
}

#[derive(Debug, Deserialize)]
struct DiskAttributes {
    location: String,
    disk_size_gb: f64,
    storage_account_type: String,
}

/// `azurerm_managed_disk`
pub struct ManagedDiskPricer;

impl AssetPricer for ManagedDiskPricer {
    fn keys(&self) -> &'static [&'static str] {
        &["azurerm_managed_disk"]
    }

    fn generate(&self, change: &PlanResourceChange) -> EstimationResult<Vec<Box<dyn PriceableAsset>>> {
        let attrs: DiskAttributes = decode(change)?;
        let storage_type: DiskStorageType = attrs.storage_account_type.parse().map_err(|_| {
            malformed(
                change,
                format!("unsupported storage_account_type '{}'", attrs.storage_account_type),
            )
        })?;
        let tier = capacity_tier(attrs.disk_size_gb).ok_or_else(|| {
            malformed(
                change,
                format!("disk_size_gb {} exceeds the largest disk tier", attrs.disk_size_gb),
            )
        })?;

        Ok(vec![Box::new(ManagedDisk {
            location: attrs.location,
            size_gb: attrs.disk_size_gb,
            storage_type,
            tier,
            count: 1,
        })])
    }
}
