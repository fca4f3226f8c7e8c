//! `chart` subcommands: lay out a series read from a JSON file, print it,
//! and optionally write the SVG.

use std::fs;
use std::path::Path;

use anyhow::Context;
use feedback_chart::svg::{BarStyle, bar_svg, donut_svg};
use feedback_chart::{BarDatum, DonutDatum, DonutGeometry, layout_bars, layout_donut};
use serde::de::DeserializeOwned;
use tracing::info;

use crate::display;

pub fn bar(input: &Path, svg: Option<&Path>, extent: f64) -> anyhow::Result<()> {
    let data: Vec<BarDatum> = read_series(input)?;
    let layout = layout_bars(&data, extent)?;
    display::print_bar_chart(&layout);
    if let Some(out) = svg {
        write_svg(out, &bar_svg(&layout, &BarStyle::default()))?;
    }
    Ok(())
}

pub fn donut(input: &Path, svg: Option<&Path>) -> anyhow::Result<()> {
    let data: Vec<DonutDatum> = read_series(input)?;
    let geometry = DonutGeometry::default();
    let layout = layout_donut(&data, &geometry)?;
    display::print_donut_legend(&layout);
    if let Some(out) = svg {
        write_svg(out, &donut_svg(&layout, &geometry))?;
    }
    Ok(())
}

pub fn read_series<T: DeserializeOwned>(path: &Path) -> anyhow::Result<Vec<T>> {
    let raw = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let data: Vec<T> =
        serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))?;
    info!(path = %path.display(), points = data.len(), "loaded series");
    Ok(data)
}

fn write_svg(path: &Path, svg: &str) -> anyhow::Result<()> {
    fs::write(path, svg).with_context(|| format!("writing {}", path.display()))?;
    println!("SVG written to {}", path.display());
    Ok(())
}
