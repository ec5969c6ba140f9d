//! Unit conversions used across the crate.

pub const KNOTS_PER_MS: f64 = 1.94384;
pub const MS_PER_KNOT: f64 = 1.0 / KNOTS_PER_MS;
pub const NMI_PER_M: f64 = 0.000539957;
pub const M_PER_FT: f64 = 0.3048;
/// Vertical speed in ft/min equivalent to one knot
pub const FPM_PER_KNOT: f64 = 101.3;
/// Jet-A density
pub const KG_PER_LITER: f64 = 0.8;
/// Standard gravity in m/s^2
pub const G: f64 = 9.80665;

pub fn ms_to_knots(v: f64) -> f64 {
    v * KNOTS_PER_MS
}

pub fn knots_to_ms(v: f64) -> f64 {
    v * MS_PER_KNOT
}

pub fn m_to_nmi(d: f64) -> f64 {
    d * NMI_PER_M
}

pub fn ft_to_m(h: f64) -> f64 {
    h * M_PER_FT
}

pub fn liters_to_kg(volume: f64) -> f64 {
    volume * KG_PER_LITER
}
