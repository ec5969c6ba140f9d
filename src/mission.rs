use serde::{Deserialize, Serialize};

use crate::{
    aggregate, process_waypoints, search, Airframe, Error, Limits, MissionEmissions,
    MissionWeightBudget, Models, ProcessedTrajectory, SearchConfig, Waypoint, WeightPolicy,
};

/// Everything that sizes a mission besides the aircraft and its trajectory.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MissionConfig {
    /// Fraction of the maximum payload carried
    pub payload_factor: f64,
    pub weight: WeightPolicy,
    pub search: SearchConfig,
}

impl Default for MissionConfig {
    fn default() -> Self {
        Self {
            payload_factor: 0.5,
            weight: WeightPolicy::default(),
            search: SearchConfig::default(),
        }
    }
}

/// The summary of a computed mission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissionSummary {
    pub flight_id: String,
    /// The recorded aircraft type
    pub aircraft_type: String,
    /// The type whose limits and models were used, when different from the recorded one
    pub substituted_by: Option<String>,
    pub total_distance_nm: f64,
    pub reserve_fuel_kg: f64,
    pub trip_fuel_kg: f64,
    pub payload_kg: f64,
    pub fuel_burnt_kg: f64,
    #[serde(rename = "CO2_kg")]
    pub co2_kg: f64,
    #[serde(rename = "H2O_kg")]
    pub h2o_kg: f64,
    #[serde(rename = "NOx_kg")]
    pub nox_kg: f64,
    #[serde(rename = "CO_kg")]
    pub co_kg: f64,
    #[serde(rename = "HC_kg")]
    pub hc_kg: f64,
    pub fuel_factor: f64,
    pub attempts: usize,
}

/// The state of the aircraft at the end of a segment of a computed mission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentRecord {
    pub flight_id: String,
    pub index: usize,
    pub latitude: f64,
    pub longitude: f64,
    pub altitude_ft: f64,
    pub cumulative_distance_nm: f64,
    pub mass_kg: f64,
    pub fuel_burn_kg: f64,
    #[serde(rename = "CO2_kg")]
    pub co2_kg: f64,
    #[serde(rename = "H2O_kg")]
    pub h2o_kg: f64,
    #[serde(rename = "NOx_kg")]
    pub nox_kg: f64,
    #[serde(rename = "CO_kg")]
    pub co_kg: f64,
    #[serde(rename = "HC_kg")]
    pub hc_kg: f64,
}

/// A computed mission
#[derive(Debug, Clone, PartialEq)]
pub struct MissionOutcome {
    pub summary: MissionSummary,
    pub budget: MissionWeightBudget,
    pub trajectory: ProcessedTrajectory,
    pub emissions: MissionEmissions,
}

impl MissionOutcome {
    /// The per-segment series mapped onto the segments of the trajectory
    pub fn segments(&self) -> Vec<SegmentRecord> {
        let series = &self.emissions.series;
        self.trajectory
            .segments()
            .iter()
            .enumerate()
            .map(|(i, segment)| SegmentRecord {
                flight_id: self.summary.flight_id.clone(),
                index: i,
                latitude: segment.latitude,
                longitude: segment.longitude,
                altitude_ft: segment.altitude_ft,
                cumulative_distance_nm: segment.cumulative_distance_nmi,
                mass_kg: series.mass[i],
                fuel_burn_kg: series.fuel_burn[i],
                co2_kg: series.co2[i],
                h2o_kg: series.h2o[i],
                nox_kg: series.nox[i],
                co_kg: series.co[i],
                hc_kg: series.hc[i],
            })
            .collect()
    }
}

/// Computes the fuel burn and emissions of `aircraft_type` flying `waypoints`.
///
/// The trajectory is derived from the waypoints, the aircraft type is resolved against
/// `limits` (falling back to a substitute type when needed), and the trip fuel is searched
/// with the models `models` builds for the resolved type.
/// # Errors
/// Any error of [`process_waypoints`], [`Airframe::resolve`], [`Models::build`] or [`search`].
pub fn process_flight<M: Models>(
    flight_id: &str,
    aircraft_type: &str,
    waypoints: &[Waypoint],
    limits: &Limits,
    models: &M,
    config: &MissionConfig,
) -> Result<MissionOutcome, Error> {
    let trajectory = process_waypoints(waypoints)?;

    let airframe = Airframe::resolve(aircraft_type, limits)?;
    let type_code = airframe.type_code();
    let aircraft_limits = limits
        .get(type_code)
        .ok_or_else(|| Error::UnsupportedAirframe(type_code.to_string()))?;
    let (fuel_flow, emission) = models.build(type_code)?;

    let found = search(
        &trajectory,
        aircraft_limits,
        config.payload_factor,
        &config.weight,
        &config.search,
        &fuel_flow,
        &emission,
    )?;
    let budget = found.budget;
    let emissions = aggregate(found.result);
    let totals = emissions.totals;

    let summary = MissionSummary {
        flight_id: flight_id.to_string(),
        aircraft_type: aircraft_type.to_string(),
        substituted_by: airframe.substituted_from().map(|_| type_code.to_string()),
        total_distance_nm: trajectory.total_distance_nmi(),
        reserve_fuel_kg: budget.reserve_fuel,
        trip_fuel_kg: budget.trip_fuel,
        payload_kg: budget.payload_weight,
        fuel_burnt_kg: totals.fuel_burn,
        co2_kg: totals.co2,
        h2o_kg: totals.h2o,
        nox_kg: totals.nox,
        co_kg: totals.co,
        hc_kg: totals.hc,
        fuel_factor: found.fuel_factor,
        attempts: found.attempts,
    };
    log::info!(
        "{flight_id} ({type_code}): {:.0} nm in {:.0} min, {:.0} kg fuel, {:.0} kg CO2 \
         (fuel factor {:.2}, {} tries)",
        summary.total_distance_nm,
        trajectory.duration_s() / 60.0,
        summary.fuel_burnt_kg,
        summary.co2_kg,
        summary.fuel_factor,
        summary.attempts,
    );

    Ok(MissionOutcome {
        summary,
        budget,
        trajectory,
        emissions,
    })
}
