//! Decimal rounding used for every exposed value.
//!
//! Prices and oscillators are exposed at 2 places; EMA, DIF, DEA and the
//! MACD histogram are carried at 4 places.

pub fn round_to(value: f64, places: i32) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

pub fn round2(value: f64) -> f64 {
    round_to(value, 2)
}

pub fn round4(value: f64) -> f64 {
    round_to(value, 4)
}
