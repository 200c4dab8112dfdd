//! Typed decoding of planned resource attributes.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};

use crate::error::{EstimationError, EstimationResult};
use crate::plan::PlanResourceChange;

/// Decode the `after` state of a change into `T`
pub(crate) fn decode<T: DeserializeOwned>(change: &PlanResourceChange) -> EstimationResult<T> {
    T::deserialize(&change.change.after).map_err(|e| malformed(change, e.to_string()))
}

pub(crate) fn malformed(change: &PlanResourceChange, details: impl Into<String>) -> EstimationError {
    EstimationError::MalformedAttributes {
        address: change.address.clone(),
        resource_type: change.resource_type.clone(),
        details: details.into(),
    }
}

/// Nested blocks such as `os_profile_windows_config` are lists that may be
/// null or missing
pub(crate) fn nullable_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
