use crate::error::{Quantity, SegmentInputs};
use crate::{
    EmissionModel, Error, FuelFlowModel, MissionWeightBudget, PerformanceLimits,
    ProcessedTrajectory,
};

/// Below this altitude a climbing aircraft flies at takeoff throttle
pub const TAKEOFF_ALTITUDE_FT: f64 = 3000.0;
/// Path angle above which an aircraft is considered climbing
pub const CLIMB_PATH_ANGLE_RAD: f64 = 0.001;

/// Per-segment series of an integration. All quantities are in kg per segment, except
/// `mass` which is the mass at the end of each segment.
#[derive(Debug, Clone, PartialEq, Default, serde::Serialize)]
pub struct SegmentSeries {
    pub mass: Vec<f64>,
    pub fuel_burn: Vec<f64>,
    pub co2: Vec<f64>,
    pub h2o: Vec<f64>,
    pub nox: Vec<f64>,
    pub co: Vec<f64>,
    pub hc: Vec<f64>,
}

impl SegmentSeries {
    fn with_capacity(n: usize) -> Self {
        Self {
            mass: Vec::with_capacity(n),
            fuel_burn: Vec::with_capacity(n),
            co2: Vec::with_capacity(n),
            h2o: Vec::with_capacity(n),
            nox: Vec::with_capacity(n),
            co: Vec::with_capacity(n),
            hc: Vec::with_capacity(n),
        }
    }

    pub fn len(&self) -> usize {
        self.fuel_burn.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fuel_burn.is_empty()
    }
}

/// The outcome of flying a trajectory with a [`MissionWeightBudget`].
#[derive(Debug, Clone, PartialEq)]
pub struct IntegrationResult {
    pub initial_mass: f64,
    pub final_mass: f64,
    /// `initial_mass - final_mass`
    pub total_fuel_burn: f64,
    pub series: SegmentSeries,
}

/// Fails with [`Error::NumericFault`] unless `value` is finite and non-negative
fn checked(
    value: f64,
    quantity: Quantity,
    segment: usize,
    inputs: SegmentInputs,
) -> Result<f64, Error> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(Error::NumericFault {
            segment,
            quantity,
            inputs,
        })
    }
}

/// Marches the aircraft mass over the segments of `trajectory`, burning the fuel flow of
/// `fuel_flow` during each segment's elapsed time.
///
/// A climbing segment below 3000 ft is flown at full takeoff throttle; every other segment
/// at the fuel flow of the current mass.
/// # Errors
/// * [`Error::NumericFault`] if a model returns NaN, an infinite or a negative value
/// * [`Error::FuelExhausted`] if the mass drops below `OEW + payload + reserve fuel`
/// * [`Error::ExceedsMLW`] if the final mass exceeds the maximum landing weight
pub fn integrate<F, E>(
    trajectory: &ProcessedTrajectory,
    budget: &MissionWeightBudget,
    limits: &PerformanceLimits,
    fuel_flow: &F,
    emission: &E,
) -> Result<IntegrationResult, Error>
where
    F: FuelFlowModel + ?Sized,
    E: EmissionModel + ?Sized,
{
    let floor = budget.minimum_mass();
    let mut mass = budget.initial_mass;
    let mut series = SegmentSeries::with_capacity(trajectory.len());

    for (i, segment) in trajectory.segments().iter().enumerate() {
        let tas = segment.true_airspeed_kt;
        let alt = segment.altitude_ft;
        let angle = segment.path_angle_rad;
        let dt = segment.elapsed_time_s;
        let inputs = SegmentInputs {
            mass_kg: mass,
            tas_kt: tas,
            altitude_ft: alt,
            path_angle_rad: angle,
            elapsed_time_s: dt,
        };

        let rate = if alt < TAKEOFF_ALTITUDE_FT && angle > CLIMB_PATH_ANGLE_RAD {
            fuel_flow.takeoff_rate(tas, alt, 1.0)
        } else {
            fuel_flow.rate(mass, tas, alt, angle)
        };
        let rate = checked(rate, Quantity::FuelFlow, i, inputs)?;
        let burned = checked(rate * dt, Quantity::FuelBurn, i, inputs)?;

        mass -= burned;
        if mass < floor {
            return Err(Error::FuelExhausted {
                segment: i,
                mass_kg: mass,
                floor_kg: floor,
                trip_fuel_kg: budget.trip_fuel,
            });
        }

        series.mass.push(mass);
        series.fuel_burn.push(burned);
        series.co2.push(checked(emission.co2(rate) * dt, Quantity::Co2, i, inputs)?);
        series.h2o.push(checked(emission.h2o(rate) * dt, Quantity::H2o, i, inputs)?);
        series.nox.push(checked(emission.nox(rate, tas, alt) * dt, Quantity::Nox, i, inputs)?);
        series.co.push(checked(emission.co(rate, tas, alt) * dt, Quantity::Co, i, inputs)?);
        series.hc.push(checked(emission.hc(rate, tas, alt) * dt, Quantity::Hc, i, inputs)?);
    }

    if mass > limits.mlw {
        return Err(Error::ExceedsMLW {
            final_mass_kg: mass,
            mlw_kg: limits.mlw,
        });
    }

    let total_fuel_burn = budget.initial_mass - mass;
    log::debug!(
        "{}: fuel factor {:.3} burned {total_fuel_burn:.1} kg over {} segments",
        limits.type_code,
        budget.fuel_factor,
        series.len()
    );

    Ok(IntegrationResult {
        initial_mass: budget.initial_mass,
        final_mass: mass,
        total_fuel_burn,
        series,
    })
}
