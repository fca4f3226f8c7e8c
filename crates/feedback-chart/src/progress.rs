//! Progress fractions for trend rows and dashboard meters.

/// `value / max` clamped into `[0, 1]`. A non-positive or non-finite `max`
/// gives 0 rather than dividing by it.
pub fn fraction(value: f64, max: f64) -> f64 {
    if !max.is_finite() || max <= 0.0 || !value.is_finite() {
        return 0.0;
    }
    (value / max).clamp(0.0, 1.0)
}

/// [`fraction`] as a percentage.
pub fn percent(value: f64, max: f64) -> f64 {
    fraction(value, max) * 100.0
}
