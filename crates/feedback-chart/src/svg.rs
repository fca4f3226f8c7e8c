//! SVG documents for bar and donut layouts.
//!
//! The donut is drawn as one stroked circle per segment using
//! `stroke-dasharray` / `stroke-dashoffset`, rotated by −90° so that the dash
//! pattern starts at 12 o'clock.

use crate::bar::BarLayout;
use crate::donut::{DonutGeometry, DonutLayout, START_ANGLE_DEG};
use crate::format_number;

pub const DEFAULT_BAR_COLOR: &str = "#3b82f6";
pub const TRACK_COLOR: &str = "#e5e7eb";
pub const TEXT_COLOR: &str = "#111827";
pub const MUTED_TEXT_COLOR: &str = "#6b7280";

/// Height reserved above the bars for values and below them for labels.
const LABEL_BAND: f64 = 16.0;

#[derive(Debug, Clone, PartialEq)]
pub struct BarStyle {
    pub color: String,
    pub bar_width: f64,
    pub gap: f64,
}

impl Default for BarStyle {
    fn default() -> Self {
        Self {
            color: DEFAULT_BAR_COLOR.to_string(),
            bar_width: 32.0,
            gap: 8.0,
        }
    }
}

pub fn bar_svg(layout: &BarLayout, style: &BarStyle) -> String {
    let count = layout.bars.len() as f64;
    let width = style.gap + count * (style.bar_width + style.gap);
    let height = layout.extent + 2.0 * LABEL_BAND;
    let baseline = LABEL_BAND + layout.extent;

    let mut out = svg_open(width, height);
    for (i, bar) in layout.bars.iter().enumerate() {
        let x = style.gap + i as f64 * (style.bar_width + style.gap);
        let mid = x + style.bar_width / 2.0;
        let top = baseline - bar.height;
        out.push_str(&format!(
            r#"  <rect x="{}" y="{}" width="{}" height="{}" rx="4" fill="{}" fill-opacity="{}"/>"#,
            coord(x),
            coord(top),
            coord(style.bar_width),
            coord(bar.height),
            escape(&style.color),
            coord(bar.opacity),
        ));
        out.push('\n');
        out.push_str(&text(mid, top - 4.0, 10.0, MUTED_TEXT_COLOR, &format_number(bar.value)));
        out.push_str(&text(mid, baseline + 12.0, 10.0, MUTED_TEXT_COLOR, &bar.label));
    }
    out.push_str("</svg>\n");
    out
}

pub fn donut_svg(layout: &DonutLayout, geometry: &DonutGeometry) -> String {
    let c = geometry.center();
    let ring = format!(
        r#"cx="{0}" cy="{0}" r="{1}" fill="none" stroke-width="{2}""#,
        coord(c),
        coord(geometry.radius),
        coord(geometry.stroke_width),
    );

    let mut out = svg_open(geometry.size, geometry.size);
    out.push_str(&format!(r#"  <circle {ring} stroke="{TRACK_COLOR}"/>"#));
    out.push('\n');
    for s in layout.segments.iter().filter(|s| s.dash_length > 0.0) {
        out.push_str(&format!(
            r#"  <circle {ring} stroke="{}" stroke-dasharray="{} {}" stroke-dashoffset="{}" transform="rotate({} {c} {c})"/>"#,
            escape(&s.color),
            coord(s.dash_length),
            coord(s.gap_length),
            coord(s.dash_offset),
            coord(START_ANGLE_DEG),
            c = coord(c),
        ));
        out.push('\n');
    }
    out.push_str(&text(c, c - 8.0, 20.0, TEXT_COLOR, &format_number(layout.total)));
    out.push_str(&text(c, c + 12.0, 10.0, MUTED_TEXT_COLOR, "total"));
    out.push_str("</svg>\n");
    out
}

fn svg_open(width: f64, height: f64) -> String {
    format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">\n",
        w = coord(width),
        h = coord(height),
    )
}

fn text(x: f64, y: f64, size: f64, fill: &str, content: &str) -> String {
    format!(
        "  <text x=\"{}\" y=\"{}\" text-anchor=\"middle\" font-size=\"{}\" fill=\"{}\">{}</text>\n",
        coord(x),
        coord(y),
        coord(size),
        fill,
        escape(content),
    )
}

/// Four decimals, trailing zeros dropped.
fn coord(v: f64) -> String {
    let s = format!("{v:.4}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" { "0".to_string() } else { s.to_string() }
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}
