use serde::{Deserialize, Serialize};

use crate::{Error, PerformanceLimits};

/// Sizing rules of the mission weight that are policy rather than physics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightPolicy {
    /// Fraction of the maximum fuel capacity held back as reserve. Historical runs used
    /// 5%, 10% and 20%; 5% is the value used together with the fuel factor search.
    pub reserve_fraction: f64,
    /// Multiplier of MTOW above which a mission weight is rejected
    pub mtow_tolerance: f64,
}

impl Default for WeightPolicy {
    fn default() -> Self {
        Self {
            reserve_fraction: 0.05,
            mtow_tolerance: 1.0,
        }
    }
}

impl WeightPolicy {
    fn validate(&self) -> Result<(), Error> {
        if !(self.reserve_fraction.is_finite() && self.reserve_fraction >= 0.0) {
            return Err(Error::InvalidConfig(format!(
                "reserve_fraction must be non-negative, got {}",
                self.reserve_fraction
            )));
        }
        if !(self.mtow_tolerance.is_finite() && self.mtow_tolerance > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "mtow_tolerance must be positive, got {}",
                self.mtow_tolerance
            )));
        }
        Ok(())
    }
}

/// The mass of an aircraft at the start of a mission and its breakdown, in kg.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MissionWeightBudget {
    pub initial_mass: f64,
    pub trip_fuel: f64,
    pub reserve_fuel: f64,
    pub payload_weight: f64,
    /// The operating empty weight the budget was built on
    pub oew: f64,
    pub payload_factor: f64,
    pub fuel_factor: f64,
}

impl MissionWeightBudget {
    /// The lowest mass the aircraft may reach: nothing but reserve fuel left
    pub fn minimum_mass(&self) -> f64 {
        self.oew + self.payload_weight + self.reserve_fuel
    }
}

fn check_factor(name: &'static str, value: f64) -> Result<(), Error> {
    if value > 0.0 && value <= 1.0 {
        Ok(())
    } else {
        Err(Error::InvalidFactor { name, value })
    }
}

/// Returns the [`MissionWeightBudget`] of an aircraft carrying `payload_factor` of its
/// maximum payload and `fuel_factor` of its maximum fuel capacity as trip fuel.
///
/// The initial mass is `OEW + payload + trip fuel + reserve fuel`.
/// # Errors
/// * [`Error::InvalidConfig`] if `policy` has a negative or non-finite reserve fraction, or
///   a non-positive or non-finite MTOW tolerance
/// * [`Error::InvalidFactor`] if `payload_factor` is outside `(0, 1]` or `fuel_factor` is
///   negative or NaN
/// * [`Error::ZeroTripFuel`] if the trip fuel is zero
/// * [`Error::ExceedsMFC`] if `fuel_factor > 1`
/// * [`Error::ExceedsMTOW`] if the initial mass exceeds `MTOW * mtow_tolerance`
pub fn mission_weight(
    limits: &PerformanceLimits,
    payload_factor: f64,
    fuel_factor: f64,
    policy: &WeightPolicy,
) -> Result<MissionWeightBudget, Error> {
    policy.validate()?;
    check_factor("payload_factor", payload_factor)?;
    if fuel_factor.is_nan() || fuel_factor < 0.0 {
        return Err(Error::InvalidFactor {
            name: "fuel_factor",
            value: fuel_factor,
        });
    }

    let trip_fuel = limits.mfc * fuel_factor;
    if trip_fuel == 0.0 {
        return Err(Error::ZeroTripFuel);
    }
    if trip_fuel > limits.mfc {
        return Err(Error::ExceedsMFC {
            trip_fuel_kg: trip_fuel,
            mfc_kg: limits.mfc,
        });
    }
    let reserve_fuel = limits.mfc * policy.reserve_fraction;
    let payload_weight = limits.max_payload * payload_factor;
    let initial_mass = limits.oew + payload_weight + trip_fuel + reserve_fuel;

    if initial_mass > limits.mtow * policy.mtow_tolerance {
        log::debug!(
            "{}: OEW {:.0} kg, payload {payload_weight:.0} kg, fuel {:.0} kg exceed MTOW {:.0} kg",
            limits.type_code,
            limits.oew,
            trip_fuel + reserve_fuel,
            limits.mtow
        );
        return Err(Error::ExceedsMTOW {
            mass_kg: initial_mass,
            mtow_kg: limits.mtow,
            tolerance: policy.mtow_tolerance,
        });
    }

    Ok(MissionWeightBudget {
        initial_mass,
        trip_fuel,
        reserve_fuel,
        payload_weight,
        oew: limits.oew,
        payload_factor,
        fuel_factor,
    })
}
