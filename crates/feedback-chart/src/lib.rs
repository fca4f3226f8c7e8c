//! Chart primitives: pure layouts that turn a numeric series into
//! proportional visual extents, plus SVG emission of those layouts.

pub mod bar;
pub mod donut;
mod error;
pub mod progress;
pub mod svg;

pub use bar::{Bar, BarDatum, BarLayout, layout_bars};
pub use donut::{DonutDatum, DonutGeometry, DonutLayout, Segment, layout_donut};
pub use error::ChartError;

/// Format a chart number the way labels show it: integers without a
/// fractional part, everything else with at most two decimals.
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        let s = format!("{value:.2}");
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

/// Reject values outside the `value >= 0` input contract.
fn check_value(label: &str, value: f64) -> Result<(), ChartError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ChartError::InvalidValue {
            label: label.to_string(),
            value,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integers_have_no_decimals() {
        assert_eq!(format_number(10.0), "10");
        assert_eq!(format_number(0.0), "0");
    }

    #[test]
    fn fractions_are_trimmed() {
        assert_eq!(format_number(82.5), "82.5");
        assert_eq!(format_number(3.14159), "3.14");
        assert_eq!(format_number(4.999), "5");
    }

    #[test]
    fn negative_and_non_finite_values_are_rejected() {
        assert!(check_value("a", 0.0).is_ok());
        assert!(check_value("a", -1.0).is_err());
        assert!(check_value("a", f64::NAN).is_err());
        assert!(check_value("a", f64::INFINITY).is_err());
    }
}
