use serde::{Deserialize, Serialize};

use crate::units::{m_to_nmi, ms_to_knots, FPM_PER_KNOT};
use crate::{Error, Waypoint};

/// A segment of a [`ProcessedTrajectory`], ending at a recorded waypoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub latitude: f64,
    pub longitude: f64,
    /// Time spent flying the segment in seconds
    pub elapsed_time_s: f64,
    pub true_airspeed_kt: f64,
    pub altitude_ft: f64,
    pub rate_of_climb_fpm: f64,
    pub path_angle_rad: f64,
    pub cumulative_distance_nmi: f64,
}

impl Segment {
    pub fn path_angle_deg(&self) -> f64 {
        self.path_angle_rad.to_degrees()
    }
}

/// The kinematic trajectory of a flight derived from its [`Waypoint`]s.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessedTrajectory {
    segments: Vec<Segment>,
}

impl ProcessedTrajectory {
    pub fn new(segments: Vec<Segment>) -> Self {
        Self { segments }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Distance flown in nautical miles
    pub fn total_distance_nmi(&self) -> f64 {
        self.segments
            .last()
            .map(|s| s.cumulative_distance_nmi)
            .unwrap_or(0.0)
    }

    /// Duration of the trajectory in seconds
    pub fn duration_s(&self) -> f64 {
        self.segments.iter().map(|s| s.elapsed_time_s).sum()
    }
}

/// Seconds between consecutive waypoints. The first entry has no predecessor and is
/// approximated as half of the following one.
fn elapsed_times(waypoints: &[Waypoint]) -> Vec<f64> {
    let mut elapsed = std::iter::once(0.0)
        .chain(
            waypoints
                .windows(2)
                .map(|w| (w[1].timestamp - w[0].timestamp).as_seconds_f64()),
        )
        .collect::<Vec<_>>();
    elapsed[0] = elapsed[1] * 0.5;
    elapsed
}

/// Running sum of the segment lengths in nautical miles. Missing lengths are replaced by
/// the great-circle distance from the previous waypoint.
fn cumulative_distances(waypoints: &[Waypoint]) -> Vec<f64> {
    waypoints
        .iter()
        .enumerate()
        .scan(0.0, |total, (i, waypoint)| {
            let length = waypoint.segment_length.unwrap_or_else(|| {
                i.checked_sub(1)
                    .map(|previous| waypoints[previous].distance(waypoint))
                    .unwrap_or(0.0)
            });
            *total += m_to_nmi(length);
            Some(*total)
        })
        .collect()
}

/// Rate of climb in ft/min of every waypoint; a zero time delta yields a zero rate.
/// The first entry has no predecessor and takes the value of the second.
fn rates_of_climb(waypoints: &[Waypoint]) -> Vec<f64> {
    let mut rates = std::iter::once(0.0)
        .chain(waypoints.windows(2).map(|w| {
            let dt = (w[1].timestamp - w[0].timestamp).as_seconds_f64();
            if dt == 0.0 {
                0.0
            } else {
                (w[1].altitude_ft - w[0].altitude_ft) / dt * 60.0
            }
        }))
        .collect::<Vec<_>>();
    rates[0] = rates[1];
    rates
}

/// Derives the [`ProcessedTrajectory`] of a flight from its ordered waypoints.
///
/// A trailing waypoint with zero true airspeed (the aircraft parked at the gate) is
/// dropped. The path angle is `atan(rate of climb / (TAS in knots * 101.3))`; it is NaN
/// when both are zero, which the fuel burn integration reports rather than hides.
/// # Error
/// [`Error::InsufficientData`] when fewer than two waypoints remain.
pub fn process_waypoints(waypoints: &[Waypoint]) -> Result<ProcessedTrajectory, Error> {
    if waypoints.len() < 2 {
        return Err(Error::InsufficientData {
            usable: waypoints.len(),
        });
    }

    let elapsed = elapsed_times(waypoints);
    let distances = cumulative_distances(waypoints);
    let rates = rates_of_climb(waypoints);

    let mut usable = waypoints.len();
    if waypoints[usable - 1].true_airspeed == 0.0 {
        usable -= 1;
    }
    if usable < 2 {
        return Err(Error::InsufficientData { usable });
    }

    let segments = waypoints[..usable]
        .iter()
        .enumerate()
        .map(|(i, waypoint)| {
            let true_airspeed_kt = ms_to_knots(waypoint.true_airspeed);
            let speed_fpm = true_airspeed_kt * FPM_PER_KNOT;
            Segment {
                latitude: waypoint.latitude,
                longitude: waypoint.longitude,
                elapsed_time_s: elapsed[i],
                true_airspeed_kt,
                altitude_ft: waypoint.altitude_ft,
                rate_of_climb_fpm: rates[i],
                path_angle_rad: (rates[i] / speed_fpm).atan(),
                cumulative_distance_nmi: distances[i],
            }
        })
        .collect();

    Ok(ProcessedTrajectory { segments })
}
