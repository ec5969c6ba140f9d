use std::fmt;

/// The quantity that failed the numeric checks of a segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quantity {
    FuelFlow,
    FuelBurn,
    Co2,
    H2o,
    Nox,
    Co,
    Hc,
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::FuelFlow => "fuel flow",
            Self::FuelBurn => "fuel burn",
            Self::Co2 => "CO2",
            Self::H2o => "H2O",
            Self::Nox => "NOx",
            Self::Co => "CO",
            Self::Hc => "HC",
        };
        f.write_str(name)
    }
}

/// The inputs handed to the physical models on the segment that failed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentInputs {
    pub mass_kg: f64,
    pub tas_kt: f64,
    pub altitude_ft: f64,
    pub path_angle_rad: f64,
    pub elapsed_time_s: f64,
}

/// Every way computing a mission can fail.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// Fewer than two usable waypoints after cleaning
    #[error("trajectory has {usable} usable waypoints, at least 2 are required")]
    InsufficientData { usable: usize },
    /// A payload or fuel factor outside `(0, 1]`
    #[error("{name} must be in (0, 1], got {value}")]
    InvalidFactor { name: &'static str, value: f64 },
    #[error("trip fuel is zero, cannot start the mission on reserves")]
    ZeroTripFuel,
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("mission weight {mass_kg:.1} kg exceeds MTOW {mtow_kg:.1} kg (tolerance {tolerance})")]
    ExceedsMTOW {
        mass_kg: f64,
        mtow_kg: f64,
        tolerance: f64,
    },
    #[error("trip fuel {trip_fuel_kg:.1} kg exceeds the maximum fuel capacity {mfc_kg:.1} kg")]
    ExceedsMFC { trip_fuel_kg: f64, mfc_kg: f64 },
    /// The mass dropped below OEW + payload + reserve: the trip fuel was not enough.
    #[error("trip fuel {trip_fuel_kg:.1} kg exhausted at segment {segment} (mass {mass_kg:.1} kg < floor {floor_kg:.1} kg)")]
    FuelExhausted {
        segment: usize,
        mass_kg: f64,
        floor_kg: f64,
        trip_fuel_kg: f64,
    },
    #[error("final mass {final_mass_kg:.1} kg exceeds MLW {mlw_kg:.1} kg")]
    ExceedsMLW { final_mass_kg: f64, mlw_kg: f64 },
    /// A physical model returned NaN, an infinite or a negative quantity
    #[error("{quantity} is not a finite non-negative number at segment {segment} ({inputs:?})")]
    NumericFault {
        segment: usize,
        quantity: Quantity,
        inputs: SegmentInputs,
    },
    #[error("no feasible fuel factor after {tries} tries (last factor {last_fuel_factor:.3}): {last_error}")]
    MissionInfeasible {
        tries: usize,
        last_fuel_factor: f64,
        last_error: Box<Error>,
    },
    #[error("fuel factor search exceeded {limit_s:.1} s after {tries} tries")]
    Timeout { tries: usize, limit_s: f64 },
    /// Neither the limits table nor the fallback mapping knows this type
    #[error("aircraft type {0} is not supported and has no fallback")]
    UnsupportedAirframe(String),
    #[error("{0}")]
    Io(String),
    #[error("{0}")]
    Csv(String),
}

impl Error {
    /// Whether the fuel factor search should try again with more trip fuel.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::FuelExhausted { .. })
    }

    /// A short stable name of the variant, used to group failures in reports.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InsufficientData { .. } => "insufficient_data",
            Self::InvalidFactor { .. } => "invalid_factor",
            Self::ZeroTripFuel => "zero_trip_fuel",
            Self::InvalidConfig(_) => "invalid_config",
            Self::ExceedsMTOW { .. } => "exceeds_mtow",
            Self::ExceedsMFC { .. } => "exceeds_mfc",
            Self::FuelExhausted { .. } => "fuel_exhausted",
            Self::ExceedsMLW { .. } => "exceeds_mlw",
            Self::NumericFault { .. } => "numeric_fault",
            Self::MissionInfeasible { .. } => "mission_infeasible",
            Self::Timeout { .. } => "timeout",
            Self::UnsupportedAirframe(_) => "unsupported_airframe",
            Self::Io(_) => "io",
            Self::Csv(_) => "csv",
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}

impl From<csv::Error> for Error {
    fn from(e: csv::Error) -> Self {
        Self::Csv(e.to_string())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn only_exhaustion_is_retryable() {
        let exhausted = Error::FuelExhausted {
            segment: 3,
            mass_kg: 1.0,
            floor_kg: 2.0,
            trip_fuel_kg: 3.0,
        };
        assert!(exhausted.is_retryable());
        assert!(!Error::ZeroTripFuel.is_retryable());
        assert!(!Error::ExceedsMLW {
            final_mass_kg: 2.0,
            mlw_kg: 1.0
        }
        .is_retryable());
    }

    #[test]
    fn display() {
        let e = Error::InsufficientData { usable: 1 };
        assert_eq!(
            e.to_string(),
            "trajectory has 1 usable waypoints, at least 2 are required"
        );
        assert_eq!(e.kind(), "insufficient_data");
    }
}
