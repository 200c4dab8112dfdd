use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum::{Display, EnumString};

/// Catalog price type (`type` / `priceType` in the Retail Prices API)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum PriceType {
    Consumption,
    DevTestConsumption,
    Reservation,
}

/// One billable meter from the upstream pricing source
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItem {
    /// Globally unique meter id, the dedupe key inside a bucket
    pub meter_id: String,
    #[serde(default)]
    pub meter_name: String,
    #[serde(default)]
    pub sku_id: String,
    #[serde(default)]
    pub sku_name: String,
    #[serde(default)]
    pub arm_sku_name: String,
    #[serde(default)]
    pub product_id: String,
    #[serde(default)]
    pub product_name: String,
    #[serde(default)]
    pub service_id: String,
    #[serde(default)]
    pub service_name: String,
    #[serde(default)]
    pub service_family: String,
    #[serde(default)]
    pub arm_region_name: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub currency_code: String,
    #[serde(default)]
    pub unit_of_measure: String,
    #[serde(default)]
    pub tier_minimum_units: f64,
    pub unit_price: f64,
    #[serde(default)]
    pub retail_price: f64,
    /// `"1 Year"` / `"3 Years"` for reservation meters, absent otherwise
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reservation_term: Option<String>,
    #[serde(rename = "type", default)]
    pub price_type: String,
    #[serde(default)]
    pub is_primary_meter_region: bool,
    pub effective_start_date: DateTime<Utc>,
}

impl CatalogItem {
    /// Parsed price type, `None` for values this crate does not know
    pub fn price_type(&self) -> Option<PriceType> {
        PriceType::from_str(&self.price_type).ok()
    }

    pub fn is_consumption(&self) -> bool {
        self.price_type() == Some(PriceType::Consumption)
    }
}

/// One page of the Retail Prices API response
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RetailPricesPage {
    #[serde(default)]
    pub billing_currency: String,
    #[serde(default)]
    pub items: Vec<CatalogItem>,
    #[serde(default)]
    pub next_page_link: Option<String>,
    #[serde(default)]
    pub count: usize,
}
