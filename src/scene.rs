//! A [`MapSink`] that records draw calls into a serializable scene.
//!
//! The web page replays the scene with Leaflet; `generate` also writes it to
//! disk and rasterizes it into tiles.

use crate::colormap::Color;
use crate::config::{AppConfig, StyleConfig};
use crate::data::load_dataset;
use crate::legend::{legend_html, LegendEntry};
use crate::render::{render, MapSink, RenderOptions, RenderSummary};
use crate::types::{Bounds, DataPoint};
use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenePoint {
    pub lat: f64,
    pub lon: f64,
    pub color: Color,
    pub tooltip: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CircleStyle {
    pub radius_m: f64,
    pub fill_opacity: f64,
    pub weight: u32,
}

impl CircleStyle {
    pub fn from_style(style: &StyleConfig) -> Self {
        CircleStyle {
            radius_m: style.radius_m,
            fill_opacity: style.fill_opacity,
            weight: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapScene {
    pub viewport: Option<Bounds>,
    pub limit: Option<Bounds>,
    pub min_zoom_offset: u8,
    pub circle: CircleStyle,
    pub points: Vec<ScenePoint>,
    pub legend: Vec<LegendEntry>,
    pub legend_html: String,
}

impl MapScene {
    pub fn new(circle: CircleStyle) -> Self {
        MapScene {
            viewport: None,
            limit: None,
            min_zoom_offset: 0,
            circle,
            points: Vec::new(),
            legend: Vec::new(),
            legend_html: String::new(),
        }
    }

    pub fn write_to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {:?}", parent))?;
        }
        let json = serde_json::to_string(self).context("Failed to serialize scene")?;
        fs::write(path, json).with_context(|| format!("Failed to write scene file: {:?}", path))?;
        Ok(())
    }
}

/// Load the configured payload and render it into a fresh scene.
///
/// Reading the payload is the only suspension point; everything after it
/// runs to completion on the loaded data.
pub async fn build_scene(config: &AppConfig) -> Result<(MapScene, RenderSummary)> {
    let options = RenderOptions::from_style(&config.style)?;
    let dataset = load_dataset(&config.input.data_json).await?;

    let mut scene = MapScene::new(CircleStyle::from_style(&config.style));
    let summary = render(&dataset, &options, &mut scene)?;
    Ok((scene, summary))
}

impl MapSink for MapScene {
    fn set_bounds(&mut self, viewport: &Bounds, limit: &Bounds) {
        self.viewport = Some(*viewport);
        self.limit = Some(*limit);
    }

    fn set_min_zoom_offset(&mut self, offset: u8) {
        self.min_zoom_offset = offset;
    }

    fn draw_point(&mut self, point: &DataPoint, color: Color, tooltip: &str) {
        self.points.push(ScenePoint {
            lat: point.latitude,
            lon: point.longitude,
            color,
            tooltip: tooltip.to_string(),
        });
    }

    fn set_legend(&mut self, entries: &[LegendEntry]) {
        self.legend = entries.to_vec();
        self.legend_html = legend_html(entries);
    }
}
