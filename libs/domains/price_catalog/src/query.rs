//! Structured price filter.
//!
//! A [`PriceQuery`] is built by a priceable asset and interpreted twice:
//! serialized to an OData `$filter` expression for the live Retail Prices API,
//! or evaluated in-process against a stored catalog bucket.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::identity::{AssetIdentity, CATALOG_PROVIDER};
use crate::models::{CatalogItem, PriceType};

/// Catalog item fields a predicate can address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CatalogField {
    ServiceFamily,
    ServiceName,
    ArmRegionName,
    ArmSkuName,
    SkuName,
    ProductName,
    MeterName,
}

impl CatalogField {
    /// Field name in the upstream filter grammar
    pub fn odata_name(self) -> &'static str {
        match self {
            CatalogField::ServiceFamily => "serviceFamily",
            CatalogField::ServiceName => "serviceName",
            CatalogField::ArmRegionName => "armRegionName",
            CatalogField::ArmSkuName => "armSkuName",
            CatalogField::SkuName => "skuName",
            CatalogField::ProductName => "productName",
            CatalogField::MeterName => "meterName",
        }
    }

    fn value(self, item: &CatalogItem) -> &str {
        match self {
            CatalogField::ServiceFamily => &item.service_family,
            CatalogField::ServiceName => &item.service_name,
            CatalogField::ArmRegionName => &item.arm_region_name,
            CatalogField::ArmSkuName => &item.arm_sku_name,
            CatalogField::SkuName => &item.sku_name,
            CatalogField::ProductName => &item.product_name,
            CatalogField::MeterName => &item.meter_name,
        }
    }
}

/// A single constraint on one catalog field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Predicate {
    Equals(CatalogField, String),
    Contains {
        field: CatalogField,
        needle: String,
        expected: bool,
    },
}

impl Predicate {
    pub fn equals(field: CatalogField, value: impl Into<String>) -> Self {
        Predicate::Equals(field, value.into())
    }

    pub fn contains(field: CatalogField, needle: impl Into<String>) -> Self {
        Predicate::Contains {
            field,
            needle: needle.into(),
            expected: true,
        }
    }

    pub fn not_contains(field: CatalogField, needle: impl Into<String>) -> Self {
        Predicate::Contains {
            field,
            needle: needle.into(),
            expected: false,
        }
    }

    fn to_odata(&self) -> String {
        match self {
            Predicate::Equals(field, value) => {
                format!("{} eq '{}'", field.odata_name(), escape(value))
            }
            Predicate::Contains {
                field,
                needle,
                expected,
            } => format!(
                "contains({}, '{}') eq {}",
                field.odata_name(),
                escape(needle),
                expected
            ),
        }
    }

    /// In-process evaluation; comparisons ignore ASCII case
    pub fn matches(&self, item: &CatalogItem) -> bool {
        match self {
            Predicate::Equals(field, value) => field.value(item).eq_ignore_ascii_case(value),
            Predicate::Contains {
                field,
                needle,
                expected,
            } => {
                let haystack = field.value(item).to_ascii_lowercase();
                haystack.contains(&needle.to_ascii_lowercase()) == *expected
            }
        }
    }
}

/// Filter predicate selecting the catalog meters that price one asset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceQuery {
    pub service_family: String,
    pub service_name: String,
    pub region: String,
    pub arm_sku_name: Option<String>,
    pub price_type: PriceType,
    pub predicates: Vec<Predicate>,
}

impl PriceQuery {
    pub fn new(
        service_family: impl Into<String>,
        service_name: impl Into<String>,
        region: impl Into<String>,
        price_type: PriceType,
    ) -> Self {
        Self {
            service_family: service_family.into(),
            service_name: service_name.into(),
            region: region.into(),
            arm_sku_name: None,
            price_type,
            predicates: Vec::new(),
        }
    }

    pub fn with_arm_sku_name(mut self, arm_sku_name: impl Into<String>) -> Self {
        self.arm_sku_name = Some(arm_sku_name.into());
        self
    }

    pub fn with(mut self, predicate: Predicate) -> Self {
        self.predicates.push(predicate);
        self
    }

    /// OData `$filter` expression (not yet URL-encoded)
    pub fn filter_expression(&self) -> String {
        let mut clauses = vec![
            Predicate::equals(CatalogField::ServiceFamily, self.service_family.as_str()).to_odata(),
            Predicate::equals(CatalogField::ServiceName, self.service_name.as_str()).to_odata(),
            Predicate::equals(CatalogField::ArmRegionName, self.region.as_str()).to_odata(),
        ];
        if let Some(sku) = &self.arm_sku_name {
            clauses.push(Predicate::equals(CatalogField::ArmSkuName, sku.as_str()).to_odata());
        }
        clauses.extend(self.predicates.iter().map(Predicate::to_odata));
        clauses.push(format!("priceType eq '{}'", self.price_type));

        clauses.join(" and ")
    }

    /// Whether a stored catalog item satisfies every clause of this query
    pub fn matches(&self, item: &CatalogItem) -> bool {
        item.service_family.eq_ignore_ascii_case(&self.service_family)
            && item.service_name.eq_ignore_ascii_case(&self.service_name)
            && item.arm_region_name.eq_ignore_ascii_case(&self.region)
            && self
                .arm_sku_name
                .as_deref()
                .is_none_or(|sku| item.arm_sku_name.eq_ignore_ascii_case(sku))
            && item.price_type() == Some(self.price_type)
            && self.predicates.iter().all(|p| p.matches(item))
    }

    /// Store bucket holding every item this query can match
    pub fn asset_identity(&self) -> AssetIdentity {
        AssetIdentity::new(
            CATALOG_PROVIDER,
            &self.service_family,
            &self.service_name,
            &self.region,
            self.arm_sku_name.as_deref().unwrap_or(""),
        )
    }
}

impl fmt::Display for PriceQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.filter_expression())
    }
}

fn escape(value: &str) -> String {
    value.replace('\'', "''")
}
