//! Terraform plan documents (`terraform show -json` output).

use serde::{Deserialize, Serialize};

use crate::error::EstimationResult;

/// The subset of a plan this crate reads
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlanDocument {
    #[serde(default)]
    pub format_version: Option<String>,
    #[serde(default)]
    pub resource_changes: Vec<PlanResourceChange>,
}

/// One resource in the plan's change set
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanResourceChange {
    pub address: String,
    #[serde(rename = "type")]
    pub resource_type: String,
    #[serde(default)]
    pub provider_name: String,
    #[serde(default)]
    pub change: Change,
}

/// Planned attribute values; only `after` is used for pricing
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Change {
    #[serde(default)]
    pub actions: Vec<String>,
    #[serde(default)]
    pub after: serde_json::Value,
}

impl PlanResourceChange {
    /// Resources being destroyed have no `after` state and cost nothing
    pub fn is_delete_only(&self) -> bool {
        self.change.actions.iter().all(|a| a == "delete") && !self.change.actions.is_empty()
    }
}

/// Decode a plan document from raw JSON bytes
pub fn parse_plan(bytes: &[u8]) -> EstimationResult<PlanDocument> {
    Ok(serde_json::from_slice(bytes)?)
}
