//! Proportional arc (donut) layout.
//!
//! Segments are laid out in input order from the 12-o'clock position, each
//! starting where the previous one ended. Angles are in degrees with 0° at
//! 3 o'clock, increasing clockwise, so 12 o'clock is −90°.
//!
//! For backends that draw arcs as a dash pattern along a circle of
//! circumference `C`, segment `i` has:
//!
//! ```text
//! dash_length = value_i / total * C
//! dash_offset = -(cumulative_before_i / 360) * C
//! ```
//!
//! where `cumulative_before_i` is measured from 12 o'clock. The backend is
//! expected to rotate the circle by −90° so that offset 0 sits at the top.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::{ChartError, check_value};

/// Angle of the first segment's leading edge.
pub const START_ANGLE_DEG: f64 = -90.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DonutDatum {
    pub label: String,
    pub value: f64,
    pub color: String,
}

impl DonutDatum {
    pub fn new(label: impl Into<String>, value: f64, color: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value,
            color: color.into(),
        }
    }
}

/// Size of the drawn ring.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DonutGeometry {
    /// Width and height of the square canvas.
    pub size: f64,
    pub radius: f64,
    pub stroke_width: f64,
}

impl DonutGeometry {
    pub fn circumference(&self) -> f64 {
        2.0 * PI * self.radius
    }

    pub fn center(&self) -> f64 {
        self.size / 2.0
    }
}

impl Default for DonutGeometry {
    fn default() -> Self {
        Self {
            size: 140.0,
            radius: 50.0,
            stroke_width: 20.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Segment {
    pub label: String,
    pub value: f64,
    pub color: String,
    /// Share of the whole circle, `value / total`.
    pub fraction: f64,
    /// Angle of the leading edge, in the 3-o'clock-is-zero system.
    pub start_angle: f64,
    pub sweep: f64,
    /// Turns already covered before this segment, measured from 12 o'clock.
    pub offset_fraction: f64,
    pub dash_length: f64,
    /// Remainder of the circumference after the dash.
    pub gap_length: f64,
    pub dash_offset: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DonutLayout {
    /// Sum of the input values, for the center label. Zero for an empty series.
    pub total: f64,
    pub circumference: f64,
    /// Segments in input order; the legend uses the same order.
    pub segments: Vec<Segment>,
}

impl DonutLayout {
    /// Sum of all dash lengths. Equals the circumference when `total > 0`.
    pub fn covered_length(&self) -> f64 {
        self.segments.iter().map(|s| s.dash_length).sum()
    }
}

/// Lay out a donut series on a ring of the given geometry.
pub fn layout_donut(
    data: &[DonutDatum],
    geometry: &DonutGeometry,
) -> Result<DonutLayout, ChartError> {
    if !geometry.radius.is_finite() || geometry.radius <= 0.0 {
        return Err(ChartError::InvalidRadius(geometry.radius));
    }
    for d in data {
        check_value(&d.label, d.value)?;
    }

    let total: f64 = data.iter().map(|d| d.value).sum();
    if !total.is_finite() {
        return Err(ChartError::InvalidTotal(total));
    }
    let denominator = if total > 0.0 { total } else { 1.0 };
    let circumference = geometry.circumference();

    let mut cumulative = 0.0_f64;
    let segments = data
        .iter()
        .map(|d| {
            let fraction = d.value / denominator;
            let sweep = fraction * 360.0;
            let dash_length = fraction * circumference;
            let offset_fraction = cumulative / 360.0;
            let segment = Segment {
                label: d.label.clone(),
                value: d.value,
                color: d.color.clone(),
                fraction,
                start_angle: START_ANGLE_DEG + cumulative,
                sweep,
                offset_fraction,
                dash_length,
                gap_length: circumference - dash_length,
                dash_offset: -offset_fraction * circumference,
            };
            cumulative += sweep;
            segment
        })
        .collect();

    Ok(DonutLayout {
        total,
        circumference,
        segments,
    })
}
