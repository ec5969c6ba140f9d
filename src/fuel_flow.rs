//! The physical models consumed by the fuel burn integration and the reference
//! implementations shipped with the crate.
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::atmosphere::Atmosphere;
use crate::units::{knots_to_ms, G};
use crate::Error;

static DRAG_POLARS: &[u8] =
    include_bytes!(concat!(env!("CARGO_MANIFEST_DIR"), "/src/drag_polar.csv"));

/// An object that returns the fuel flow of an aircraft in kg/s.
pub trait FuelFlowModel {
    /// Fuel flow with the engines delivering the thrust required by the flight condition
    fn rate(&self, mass_kg: f64, tas_kt: f64, altitude_ft: f64, path_angle_rad: f64) -> f64;

    /// Fuel flow at a fixed `throttle` in `[0, 1]`, used during the initial climb
    fn takeoff_rate(&self, tas_kt: f64, altitude_ft: f64, throttle: f64) -> f64;
}

/// An object that returns emission rates in kg/s for a fuel flow in kg/s.
pub trait EmissionModel {
    fn co2(&self, fuel_flow: f64) -> f64;
    fn h2o(&self, fuel_flow: f64) -> f64;
    fn nox(&self, fuel_flow: f64, tas_kt: f64, altitude_ft: f64) -> f64;
    fn co(&self, fuel_flow: f64, tas_kt: f64, altitude_ft: f64) -> f64;
    fn hc(&self, fuel_flow: f64, tas_kt: f64, altitude_ft: f64) -> f64;
}

/// An object that builds the physical models of an aircraft type.
/// A new pair is built for every flight, so implementations may hold per-flight state.
pub trait Models {
    type FuelFlow: FuelFlowModel;
    type Emission: EmissionModel;

    fn build(&self, type_code: &str) -> Result<(Self::FuelFlow, Self::Emission), Error>;
}

/// Fuel flow of an aircraft whose drag follows a parabolic polar and whose engines have
/// a constant thrust specific fuel consumption.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DragPolarFuelFlow {
    /// the type (e.g. `A319`)
    #[serde(rename = "type")]
    pub type_code: String,
    /// reference wing area in m^2
    pub wing_area: f64,
    /// zero-lift drag coefficient
    pub cd0: f64,
    /// induced drag factor
    pub k: f64,
    /// thrust specific fuel consumption in kg/(N s)
    pub tsfc: f64,
    /// thrust specific fuel consumption at takeoff in kg/(N s)
    pub tsfc_takeoff: f64,
    /// maximum static thrust of all engines in N
    pub max_thrust: f64,
}

/// Thrust of the engines at flight idle, as a fraction of the maximum thrust
const IDLE_THRUST_FRACTION: f64 = 0.07;

impl DragPolarFuelFlow {
    /// Thrust in N balancing drag and the along-path component of weight.
    /// NaN when the airspeed is zero (no dynamic pressure to carry the weight).
    pub fn required_thrust(
        &self,
        mass_kg: f64,
        tas_kt: f64,
        altitude_ft: f64,
        path_angle_rad: f64,
    ) -> f64 {
        let atmosphere = Atmosphere::at_ft(altitude_ft);
        let v = knots_to_ms(tas_kt);
        let qs = 0.5 * atmosphere.density * v * v * self.wing_area;
        let weight = mass_kg * G;
        let cl = weight * path_angle_rad.cos() / qs;
        let drag = qs * (self.cd0 + self.k * cl * cl);
        drag + weight * path_angle_rad.sin()
    }
}

impl FuelFlowModel for DragPolarFuelFlow {
    fn rate(&self, mass_kg: f64, tas_kt: f64, altitude_ft: f64, path_angle_rad: f64) -> f64 {
        let thrust = self.required_thrust(mass_kg, tas_kt, altitude_ft, path_angle_rad);
        // `clamp` keeps NaN
        let thrust = thrust.clamp(IDLE_THRUST_FRACTION * self.max_thrust, self.max_thrust);
        self.tsfc * thrust
    }

    fn takeoff_rate(&self, _tas_kt: f64, _altitude_ft: f64, throttle: f64) -> f64 {
        self.tsfc_takeoff * self.max_thrust * throttle.clamp(0.0, 1.0)
    }
}

/// Returns the drag polars shipped in `src/drag_polar.csv`, keyed by aircraft type.
pub fn load_drag_polars() -> Result<HashMap<String, DragPolarFuelFlow>, Error> {
    super::csv::load(DRAG_POLARS, |d: DragPolarFuelFlow| (d.type_code.clone(), d))
}

/// Emissions proportional to the fuel flow. NOx, CO and HC indices are given at sea
/// level and corrected to the combustor inlet conditions in flight following the
/// Boeing fuel flow method 2 (dry air).
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct EmissionIndices {
    /// kg CO2 / kg fuel
    pub co2: f64,
    /// kg H2O / kg fuel
    pub h2o: f64,
    /// kg NOx / kg fuel at sea level
    pub nox: f64,
    /// kg CO / kg fuel at sea level
    pub co: f64,
    /// kg HC / kg fuel at sea level
    pub hc: f64,
}

impl Default for EmissionIndices {
    fn default() -> Self {
        Self {
            // see https://www.iata.org/en/services/statistics/intelligence/co2-connect/iata-co2-connect-passenger-calculator/calculator-faq/
            co2: 3.16,
            h2o: 1.23,
            nox: 0.0150,
            co: 0.0020,
            hc: 0.0002,
        }
    }
}

/// Total temperature and pressure ratios (θt, δt) at a flight condition
fn total_ratios(tas_kt: f64, altitude_ft: f64) -> (f64, f64) {
    let atmosphere = Atmosphere::at_ft(altitude_ft);
    let mach = knots_to_ms(tas_kt) / atmosphere.speed_of_sound();
    let factor = 1.0 + 0.2 * mach * mach;
    (atmosphere.theta() * factor, atmosphere.delta() * factor.powf(3.5))
}

impl EmissionModel for EmissionIndices {
    fn co2(&self, fuel_flow: f64) -> f64 {
        fuel_flow * self.co2
    }

    fn h2o(&self, fuel_flow: f64) -> f64 {
        fuel_flow * self.h2o
    }

    fn nox(&self, fuel_flow: f64, tas_kt: f64, altitude_ft: f64) -> f64 {
        let (theta, delta) = total_ratios(tas_kt, altitude_ft);
        fuel_flow * self.nox * (delta.powf(1.02) / theta.powf(3.3)).sqrt()
    }

    fn co(&self, fuel_flow: f64, tas_kt: f64, altitude_ft: f64) -> f64 {
        let (theta, delta) = total_ratios(tas_kt, altitude_ft);
        fuel_flow * self.co * theta.powf(3.3) / delta.powf(1.02)
    }

    fn hc(&self, fuel_flow: f64, tas_kt: f64, altitude_ft: f64) -> f64 {
        let (theta, delta) = total_ratios(tas_kt, altitude_ft);
        fuel_flow * self.hc * theta.powf(3.3) / delta.powf(1.02)
    }
}

/// [`Models`] backed by the shipped drag polars and a single set of emission indices.
#[derive(Debug, Clone)]
pub struct ReferenceModels {
    polars: HashMap<String, DragPolarFuelFlow>,
    indices: EmissionIndices,
}

impl ReferenceModels {
    pub fn new(indices: EmissionIndices) -> Result<Self, Error> {
        Ok(Self {
            polars: load_drag_polars()?,
            indices,
        })
    }
}

impl Models for ReferenceModels {
    type FuelFlow = DragPolarFuelFlow;
    type Emission = EmissionIndices;

    fn build(&self, type_code: &str) -> Result<(DragPolarFuelFlow, EmissionIndices), Error> {
        let polar = self
            .polars
            .get(type_code)
            .ok_or_else(|| Error::UnsupportedAirframe(type_code.to_string()))?;
        Ok((polar.clone(), self.indices))
    }
}
