//! Billing schemes and unit price resolution.

use domain_price_catalog::{CatalogItem, PriceType};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use strum::{Display, EnumString};

use crate::error::{PricingError, PricingResult};

pub const HOURS_PER_MONTH: f64 = 730.0;
pub const HOURS_PER_YEAR: f64 = 8760.0;

/// Reserved-instance commitment length
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReservationTerm {
    OneYear,
    ThreeYears,
}

impl ReservationTerm {
    /// `reservationTerm` value on matching catalog items
    pub fn label(self) -> &'static str {
        match self {
            ReservationTerm::OneYear => "1 Year",
            ReservationTerm::ThreeYears => "3 Years",
        }
    }

    /// Hours covered by one reservation price
    pub fn hours(self) -> f64 {
        match self {
            ReservationTerm::OneYear => HOURS_PER_YEAR,
            ReservationTerm::ThreeYears => 3.0 * HOURS_PER_YEAR,
        }
    }
}

/// How the caller intends to pay for compute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BillingScheme {
    #[default]
    Consumption,
    DevTestConsumption,
    Reservation(ReservationTerm),
}

impl BillingScheme {
    /// Catalog price type holding prices for this scheme
    pub fn price_type(self) -> PriceType {
        match self {
            BillingScheme::Consumption => PriceType::Consumption,
            BillingScheme::DevTestConsumption => PriceType::DevTestConsumption,
            BillingScheme::Reservation(_) => PriceType::Reservation,
        }
    }

    pub fn reservation_term(self) -> Option<ReservationTerm> {
        match self {
            BillingScheme::Reservation(term) => Some(term),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BillingScheme::Consumption => "consumption",
            BillingScheme::DevTestConsumption => "devtestconsumption",
            BillingScheme::Reservation(ReservationTerm::OneYear) => "reservation1yr",
            BillingScheme::Reservation(ReservationTerm::ThreeYears) => "reservation3yr",
        }
    }
}

impl fmt::Display for BillingScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BillingScheme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "consumption" => Ok(BillingScheme::Consumption),
            "devtestconsumption" => Ok(BillingScheme::DevTestConsumption),
            "reservation1yr" => Ok(BillingScheme::Reservation(ReservationTerm::OneYear)),
            "reservation3yr" => Ok(BillingScheme::Reservation(ReservationTerm::ThreeYears)),
            other => Err(format!(
                "unknown price type '{}', expected consumption, devtestconsumption, reservation1yr or reservation3yr",
                other
            )),
        }
    }
}

/// VM scheduling priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumString)]
pub enum VmPriority {
    #[default]
    Regular,
    Spot,
    #[strum(serialize = "Low")]
    LowPriority,
}

impl VmPriority {
    /// Parse a plan `priority` attribute; absent means regular
    pub fn from_attribute(value: Option<&str>) -> Result<Self, String> {
        match value {
            None | Some("") => Ok(VmPriority::Regular),
            Some(raw) => VmPriority::from_str(raw).map_err(|_| {
                format!("unknown priority '{}', expected Regular, Spot or Low", raw)
            }),
        }
    }
}

/// Operating system image family, which selects Windows or Linux meters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display)]
pub enum OsFamily {
    #[default]
    Linux,
    Windows,
}

/// Pick the unit price for a scheme from the candidate items of a query.
///
/// Candidates are considered in ascending `meter_id` order. Reservation
/// prices cover the whole term and are converted to an hourly rate.
pub fn resolve_unit_price(items: &[CatalogItem], scheme: BillingScheme) -> PricingResult<f64> {
    let mut candidates: Vec<&CatalogItem> = items.iter().collect();
    candidates.sort_by(|a, b| a.meter_id.cmp(&b.meter_id));

    match scheme.reservation_term() {
        None => candidates
            .first()
            .map(|item| item.unit_price)
            .ok_or_else(|| PricingError::NoMatchingCatalogItem {
                filter: format!("{} price", scheme),
            }),
        Some(term) => {
            if candidates.is_empty() {
                return Err(PricingError::NoMatchingCatalogItem {
                    filter: format!("{} price", scheme),
                });
            }
            candidates
                .into_iter()
                .find(|item| item.reservation_term.as_deref() == Some(term.label()))
                .map(|item| item.unit_price / term.hours())
                .ok_or_else(|| PricingError::ReservationTermNotFound {
                    term: term.label().to_string(),
                })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(meter_id: &str, unit_price: f64, term: Option<&str>) -> CatalogItem {
        CatalogItem {
            meter_id: meter_id.into(),
            unit_price,
            reservation_term: term.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn test_billing_scheme_parse() {
        assert_eq!("consumption".parse::<BillingScheme>(), Ok(BillingScheme::Consumption));
        assert_eq!(
            "DevTestConsumption".parse::<BillingScheme>(),
            Ok(BillingScheme::DevTestConsumption)
        );
        assert_eq!(
            "reservation3yr".parse::<BillingScheme>(),
            Ok(BillingScheme::Reservation(ReservationTerm::ThreeYears))
        );
        assert!("savingsplan".parse::<BillingScheme>().is_err());
    }

    #[test]
    fn test_billing_scheme_round_trips_through_display() {
        for scheme in [
            BillingScheme::Consumption,
            BillingScheme::DevTestConsumption,
            BillingScheme::Reservation(ReservationTerm::OneYear),
            BillingScheme::Reservation(ReservationTerm::ThreeYears),
        ] {
            assert_eq!(scheme.to_string().parse::<BillingScheme>(), Ok(scheme));
        }
    }

    #[test]
    fn test_priority_attribute() {
        assert_eq!(VmPriority::from_attribute(None), Ok(VmPriority::Regular));
        assert_eq!(VmPriority::from_attribute(Some("Spot")), Ok(VmPriority::Spot));
        assert_eq!(VmPriority::from_attribute(Some("Low")), Ok(VmPriority::LowPriority));
        assert!(VmPriority::from_attribute(Some("Urgent")).is_err());
    }

    #[test]
    fn test_on_demand_takes_lowest_meter_id() {
        let items = vec![item("m-b", 2.0, None), item("m-a", 1.0, None)];
        assert_eq!(resolve_unit_price(&items, BillingScheme::Consumption).unwrap(), 1.0);
    }

    #[test]
    fn test_no_candidates_is_an_error() {
        assert!(matches!(
            resolve_unit_price(&[], BillingScheme::Consumption),
            Err(PricingError::NoMatchingCatalogItem { .. })
        ));
    }

    #[test]
    fn test_one_year_reservation_is_hourly() {
        let items = vec![item("m-3y", 2190.0, Some("3 Years")), item("m-1y", 876.0, Some("1 Year"))];
        let price =
            resolve_unit_price(&items, BillingScheme::Reservation(ReservationTerm::OneYear)).unwrap();
        assert!((price - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_three_year_reservation_is_hourly() {
        let items = vec![item("m-1y", 876.0, Some("1 Year")), item("m-3y", 2628.0, Some("3 Years"))];
        let price = resolve_unit_price(&items, BillingScheme::Reservation(ReservationTerm::ThreeYears))
            .unwrap();
        assert!((price - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_missing_reservation_term() {
        let items = vec![item("m-1y", 876.0, Some("1 Year"))];
        let err = resolve_unit_price(&items, BillingScheme::Reservation(ReservationTerm::ThreeYears))
            .unwrap_err();
        assert!(matches!(err, PricingError::ReservationTermNotFound { ref term } if term == "3 Years"));
    }
}
