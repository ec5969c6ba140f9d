//! Weight limits of the supported aircraft types.
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::units::liters_to_kg;
use crate::Error;

static LIMITS: &[u8] = include_bytes!(concat!(env!("CARGO_MANIFEST_DIR"), "/src/limits.csv"));

/// A map of the aircraft type (e.g. `A319`) to its [`PerformanceLimits`].
pub type Limits = HashMap<String, PerformanceLimits>;

/// A record of `src/limits.csv`
#[derive(Deserialize, Serialize, Debug, Clone)]
struct LimitsRow {
    #[serde(rename = "type")]
    type_: String,
    mtow: f64,
    mlw: f64,
    oew: f64,
    mfc_liters: f64,
    max_payload: f64,
}

/// The weight limits of an aircraft type, all in kg.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PerformanceLimits {
    /// the type (e.g. `A319`)
    pub type_code: String,
    /// maximum takeoff weight
    pub mtow: f64,
    /// maximum landing weight
    pub mlw: f64,
    /// operating empty weight
    pub oew: f64,
    /// maximum fuel capacity, as mass of Jet-A
    pub mfc: f64,
    /// maximum payload
    pub max_payload: f64,
}

impl PerformanceLimits {
    /// The payload left when taking off at MTOW with full tanks. Not used to size
    /// missions (see [`PerformanceLimits::max_payload`]), only to compare against it.
    pub fn structural_max_payload(&self) -> f64 {
        self.mtow - self.mfc - self.oew
    }
}

impl From<LimitsRow> for PerformanceLimits {
    fn from(row: LimitsRow) -> Self {
        Self {
            type_code: row.type_,
            mtow: row.mtow,
            mlw: row.mlw,
            oew: row.oew,
            mfc: liters_to_kg(row.mfc_liters),
            max_payload: row.max_payload,
        }
    }
}

/// Parses a limits table with columns `type,mtow,mlw,oew,mfc_liters,max_payload`.
/// # Error
/// Errors if a record cannot be deserialized
pub fn parse_limits(data: &[u8]) -> Result<Limits, Error> {
    super::csv::load(data, |row: LimitsRow| (row.type_.clone(), row))
        .map(|rows| rows.into_iter().map(|(k, v)| (k, v.into())).collect())
}

/// Returns the limits of all supported aircraft types, shipped in `src/limits.csv`.
/// Maximum payloads are the BADA operational values.
pub fn load_limits() -> Result<Limits, Error> {
    parse_limits(LIMITS)
}

/// Loads a limits table from disk, replacing the shipped one.
pub fn load_limits_from(path: impl AsRef<std::path::Path>) -> Result<Limits, Error> {
    parse_limits(&std::fs::read(path)?)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn shipped_table() {
        let limits = load_limits().unwrap();
        assert_eq!(limits.len(), 13);
        let a319 = &limits["A319"];
        assert_eq!(a319.mtow, 75500.0);
        assert_eq!(a319.max_payload, 17000.0);
        assert!((a319.mfc - 24210.0 * 0.8).abs() < 1e-9);
    }

    #[test]
    fn every_type_is_consistent() {
        for limits in load_limits().unwrap().values() {
            assert!(limits.oew < limits.mlw, "{}", limits.type_code);
            assert!(limits.mlw <= limits.mtow, "{}", limits.type_code);
            assert!(
                limits.oew + limits.max_payload < limits.mtow,
                "{}",
                limits.type_code
            );
        }
    }

    #[test]
    fn structural_payload() {
        let limits = PerformanceLimits {
            type_code: "X".to_string(),
            mtow: 75000.0,
            mlw: 64000.0,
            oew: 42000.0,
            mfc: 24000.0,
            max_payload: 17000.0,
        };
        assert_eq!(limits.structural_max_payload(), 9000.0);
    }
}
