#![forbid(unsafe_code)]
//! Estimates the fuel burn and exhaust emissions of an aircraft flying a recorded
//! trajectory, sizing the trip fuel as the first feasible fraction of the maximum fuel
//! capacity.
pub mod airframe;
pub mod atmosphere;
pub mod csv;
mod emissions;
mod error;
pub mod flights;
pub mod fuel_flow;
mod integrate;
pub mod limits;
mod mission;
mod search;
pub mod serde;
mod trajectory;
pub mod units;
mod weight;

pub use airframe::Airframe;
pub use emissions::*;
pub use error::*;
pub use fuel_flow::{EmissionModel, FuelFlowModel, Models};
pub use integrate::*;
pub use limits::{Limits, PerformanceLimits};
pub use mission::*;
pub use search::*;
pub use trajectory::*;
pub use weight::*;

/// A recorded sample of an aircraft's trajectory
#[derive(Debug, Clone, PartialEq, ::serde::Serialize, ::serde::Deserialize)]
pub struct Waypoint {
    pub latitude: f64,
    pub longitude: f64,
    pub altitude_ft: f64,
    #[serde(with = "crate::serde::timestamp")]
    pub timestamp: time::OffsetDateTime,
    /// True airspeed in m/s
    pub true_airspeed: f64,
    /// Length of the segment ending at this waypoint in meters. `None` when the
    /// source did not record it.
    #[serde(default)]
    pub segment_length: Option<f64>,
}

impl Waypoint {
    pub fn pos(&self) -> (f64, f64) {
        (self.latitude, self.longitude)
    }

    /// Returns the distance to another [`Waypoint`] in m
    pub fn distance(&self, other: &Self) -> f64 {
        distance(self.pos(), other.pos())
    }
}

/// Returns the great-circle distance between two geo-points in m
pub fn distance(from: (f64, f64), to: (f64, f64)) -> f64 {
    let from = geoutils::Location::new(from.0, from.1);
    let to = geoutils::Location::new(to.0, to.1);
    from.haversine_distance_to(&to).meters()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn distance_is_symmetric() {
        let copenhagen = (55.6180, 12.6508);
        let aarhus = (56.3000, 10.6190);
        let d = distance(copenhagen, aarhus);
        assert!((d - distance(aarhus, copenhagen)).abs() < 1e-6);
        // ~145 km
        assert!(d > 140_000.0 && d < 150_000.0);
    }
}
