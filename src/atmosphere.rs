//! International Standard Atmosphere up to 20 km (troposphere and the isothermal layer
//! above the tropopause).

const T0: f64 = 288.15; // K
const P0: f64 = 101325.0; // Pa
const LAPSE_RATE: f64 = 0.0065; // K/m
const R_AIR: f64 = 287.05287; // J/(kg K)
const GAMMA: f64 = 1.4;
const TROPOPAUSE_M: f64 = 11000.0;
const T_TROPOPAUSE: f64 = 216.65; // K
const P_TROPOPAUSE: f64 = 22632.06; // Pa
const CEILING_M: f64 = 20000.0;

/// Ambient conditions at an altitude
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Atmosphere {
    /// K
    pub temperature: f64,
    /// Pa
    pub pressure: f64,
    /// kg/m^3
    pub density: f64,
}

impl Atmosphere {
    /// Conditions at `altitude_m` above mean sea level. Altitudes outside `[0, 20 km]` are
    /// clamped to that range.
    pub fn at(altitude_m: f64) -> Self {
        let h = altitude_m.clamp(0.0, CEILING_M);
        let (temperature, pressure) = if h <= TROPOPAUSE_M {
            let temperature = T0 - LAPSE_RATE * h;
            let exponent = crate::units::G / (R_AIR * LAPSE_RATE);
            (temperature, P0 * (temperature / T0).powf(exponent))
        } else {
            let exponent = -crate::units::G * (h - TROPOPAUSE_M) / (R_AIR * T_TROPOPAUSE);
            (T_TROPOPAUSE, P_TROPOPAUSE * exponent.exp())
        };
        Self {
            temperature,
            pressure,
            density: pressure / (R_AIR * temperature),
        }
    }

    /// Conditions at `altitude_ft` above mean sea level
    pub fn at_ft(altitude_ft: f64) -> Self {
        Self::at(crate::units::ft_to_m(altitude_ft))
    }

    /// Temperature ratio to sea level (θ)
    pub fn theta(&self) -> f64 {
        self.temperature / T0
    }

    /// Pressure ratio to sea level (δ)
    pub fn delta(&self) -> f64 {
        self.pressure / P0
    }

    /// Speed of sound in m/s
    pub fn speed_of_sound(&self) -> f64 {
        (GAMMA * R_AIR * self.temperature).sqrt()
    }
}
