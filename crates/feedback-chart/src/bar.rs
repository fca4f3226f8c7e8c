//! Proportional bar layout.
//!
//! Each bar's height is its value's share of the series maximum, mapped
//! linearly onto a fixed extent. Opacity is blended from a floor of 0.7 so
//! small bars stay visible but read as de-emphasised:
//!
//! ```text
//! max      = max(values), or 1 when the series is empty or all zero
//! fraction = value / max
//! height   = fraction * extent
//! opacity  = 0.7 + 0.3 * fraction
//! ```

use serde::{Deserialize, Serialize};

use crate::{ChartError, check_value};

/// Opacity of a zero-height bar.
pub const OPACITY_FLOOR: f64 = 0.7;
/// Opacity added at full height.
pub const OPACITY_SPAN: f64 = 0.3;
/// Height of the tallest bar when no extent is given.
pub const DEFAULT_EXTENT: f64 = 100.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarDatum {
    pub label: String,
    pub value: f64,
}

impl BarDatum {
    pub fn new(label: impl Into<String>, value: f64) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bar {
    pub label: String,
    pub value: f64,
    /// `value / max`, in `[0, 1]`.
    pub fraction: f64,
    pub height: f64,
    pub opacity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarLayout {
    /// Denominator used for every fraction (never zero).
    pub max: f64,
    pub extent: f64,
    /// Bars in input order.
    pub bars: Vec<Bar>,
}

/// Lay out a bar series against `extent`.
///
/// The divisor falls back to 1 only when the peak is 0; a series whose
/// maximum is below 1 is not floored to 1 and still fills the extent.
pub fn layout_bars(data: &[BarDatum], extent: f64) -> Result<BarLayout, ChartError> {
    if !extent.is_finite() || extent < 0.0 {
        return Err(ChartError::InvalidExtent(extent));
    }
    for d in data {
        check_value(&d.label, d.value)?;
    }

    let peak = data.iter().map(|d| d.value).fold(0.0_f64, f64::max);
    let max = if peak > 0.0 { peak } else { 1.0 };

    let bars = data
        .iter()
        .map(|d| {
            let fraction = d.value / max;
            Bar {
                label: d.label.clone(),
                value: d.value,
                fraction,
                height: fraction * extent,
                opacity: OPACITY_FLOOR + OPACITY_SPAN * fraction,
            }
        })
        .collect();

    Ok(BarLayout { max, extent, bars })
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-12;

    fn series(values: &[(&str, f64)]) -> Vec<BarDatum> {
        values.iter().map(|&(l, v)| BarDatum::new(l, v)).collect()
    }

    #[test]
    fn fractions_and_opacities_follow_the_maximum() {
        let layout = layout_bars(&series(&[("A", 3.0), ("B", 7.0), ("C", 1.0)]), DEFAULT_EXTENT).unwrap();
        assert_eq!(layout.max, 7.0);

        let expected_fractions = [3.0 / 7.0, 1.0, 1.0 / 7.0];
        let expected_opacity = [0.7 + 0.3 * 3.0 / 7.0, 1.0, 0.7 + 0.3 * 1.0 / 7.0];
        for (i, bar) in layout.bars.iter().enumerate() {
            assert!((bar.fraction - expected_fractions[i]).abs() < EPS, "bar {i} fraction");
            assert!((bar.opacity - expected_opacity[i]).abs() < EPS, "bar {i} opacity");
            assert!((bar.height - expected_fractions[i] * 100.0).abs() < EPS, "bar {i} height");
        }
    }

    #[test]
    fn labels_keep_input_order() {
        let layout = layout_bars(&series(&[("CS501", 82.5), ("CS302", 64.0)]), 50.0).unwrap();
        let labels: Vec<&str> = layout.bars.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, vec!["CS501", "CS302"]);
        assert!((layout.bars[0].height - 50.0).abs() < EPS);
    }

    #[test]
    fn empty_series_is_empty_layout() {
        let layout = layout_bars(&[], DEFAULT_EXTENT).unwrap();
        assert_eq!(layout.max, 1.0);
        assert!(layout.bars.is_empty());
    }

    #[test]
    fn all_zero_series_renders_flat() {
        let layout = layout_bars(&series(&[("A", 0.0), ("B", 0.0)]), DEFAULT_EXTENT).unwrap();
        assert_eq!(layout.max, 1.0);
        for bar in &layout.bars {
            assert_eq!(bar.fraction, 0.0);
            assert_eq!(bar.height, 0.0);
            assert!((bar.opacity - OPACITY_FLOOR).abs() < EPS);
        }
    }

    #[test]
    fn small_maximum_is_not_clamped_to_one() {
        let layout = layout_bars(&series(&[("A", 0.25), ("B", 0.5)]), DEFAULT_EXTENT).unwrap();
        assert_eq!(layout.max, 0.5);
        assert!((layout.bars[1].fraction - 1.0).abs() < EPS);
    }

    #[test]
    fn rejects_negative_values_and_bad_extent() {
        assert_eq!(
            layout_bars(&series(&[("A", -2.0)]), DEFAULT_EXTENT).unwrap_err(),
            ChartError::InvalidValue {
                label: "A".into(),
                value: -2.0,
            }
        );
        assert_eq!(
            layout_bars(&[], f64::NAN).unwrap_err().to_string(),
            "extent must be a finite non-negative number, got NaN"
        );
    }

    #[test]
    fn datum_reads_label_value_json() {
        let data: Vec<BarDatum> =
            serde_json::from_str(r#"[{"label": "CS501", "value": 82.5}]"#).unwrap();
        assert_eq!(data, vec![BarDatum::new("CS501", 82.5)]);
    }
}
