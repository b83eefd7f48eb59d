//! Fraction/percentage detection and display shaping.
//!
//! The canonical table keeps full-precision percentages. Flooring and
//! rounding only happen through [`display_value`].

/// Values at or below this are fractions of one.
pub const FRACTION_THRESHOLD: f64 = 1.5;

pub const DEFAULT_DISPLAY_FLOOR: f64 = 0.1;
pub const DEFAULT_DISPLAY_DECIMALS: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Normalized {
    pub pct: f64,
    /// Set when the scaled value fell outside [0, 100] and was clamped.
    pub clamped: bool,
}

/// Scale a source value to a percentage.
pub fn normalize(value: f64) -> Normalized {
    let scaled = if value <= FRACTION_THRESHOLD {
        value * 100.0
    } else {
        value
    };
    let pct = scaled.clamp(0.0, 100.0);
    Normalized {
        pct,
        clamped: pct != scaled,
    }
}

pub fn to_percent(value: f64) -> f64 {
    normalize(value).pct
}

/// Render-time value: near-zero positives are lifted to `floor` so a bubble
/// stays visible, then the value is rounded to `decimals` places.
pub fn display_value(pct: f64, floor: f64, decimals: u32) -> f64 {
    let lifted = if pct > 0.0 && pct < floor { floor } else { pct };
    round_to(lifted, decimals)
}

pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

/// Force three shares to total 100. The first two are rounded to one
/// decimal and the third absorbs the remainder.
pub fn rebalance(rail: f64, road: f64, waterway: f64) -> Option<(f64, f64, f64)> {
    let total = rail + road + waterway;
    if total <= 0.0 || !total.is_finite() {
        return None;
    }
    let rail = round_to(rail / total * 100.0, 1);
    let road = round_to(road / total * 100.0, 1);
    let waterway = round_to(100.0 - rail - road, 1);
    Some((rail, road, waterway))
}
