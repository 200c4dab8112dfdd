use serde::{Deserialize, Serialize};

use crate::billing::{HOURS_PER_MONTH, HOURS_PER_YEAR};

/// Estimate for a whole plan
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EstimateResult {
    pub estimate_summary: EstimateSummary,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unsupported_resources: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unestimateable_resources: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub line_items: Vec<LineItem>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pricing_failures: Vec<PricingFailure>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EstimateSummary {
    pub hourly_cost_usd: f64,
    pub monthly_cost_usd: f64,
    pub yearly_cost_usd: f64,
}

impl EstimateSummary {
    pub fn from_hourly(hourly: f64) -> Self {
        Self {
            hourly_cost_usd: hourly,
            monthly_cost_usd: hourly * HOURS_PER_MONTH,
            yearly_cost_usd: hourly * HOURS_PER_YEAR,
        }
    }
}

/// Hourly cost of one priced asset of a plan resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub address: String,
    pub resource_type: String,
    /// Asset kind, e.g. `cluster_control_plane`
    pub asset: String,
    pub hourly_cost_usd: f64,
}

/// A resource, or one of its assets, that was priced at 0 because of an error
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingFailure {
    pub address: String,
    pub resource_type: String,
    /// Failing asset kind; absent when the resource attributes could not be decoded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset: Option<String>,
    pub reason: String,
}
