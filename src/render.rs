//! Turns a sanitized dataset into map draw calls.

use crate::colormap::{Color, ColorScale, ScaleKind};
use crate::config::StyleConfig;
use crate::error::RenderResult;
use crate::legend::{build_legend, LegendEntry};
use crate::processing::{compute_ranges_with, Ranges};
use crate::types::{Bounds, DataPoint, Dataset};
use tracing::{info, warn};

/// The map widget the pipeline draws into.
///
/// Calls are fire-and-forget: a sink that fails to draw deals with it itself.
pub trait MapSink {
    fn set_bounds(&mut self, viewport: &Bounds, limit: &Bounds);
    /// Ask for a minimum zoom `offset` levels below the fitted zoom.
    fn set_min_zoom_offset(&mut self, offset: u8);
    fn draw_point(&mut self, point: &DataPoint, color: Color, tooltip: &str);
    fn set_legend(&mut self, entries: &[LegendEntry]);
}

/// Per-load options for [`render`].
#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub palette: Vec<Color>,
    pub value_label: String,
    pub viewport_padding: f64,
    pub limit_padding: f64,
    pub min_zoom_offset: u8,
}

impl RenderOptions {
    pub fn from_style(style: &StyleConfig) -> RenderResult<Self> {
        Ok(RenderOptions {
            palette: crate::colormap::parse_palette(&style.palette[..])?,
            value_label: style.value_label.clone(),
            viewport_padding: style.viewport_padding,
            limit_padding: style.limit_padding,
            min_zoom_offset: style.min_zoom_offset,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderSummary {
    pub points_drawn: usize,
    pub ranges: Ranges,
    pub scale: ColorScale,
    pub legend: Vec<LegendEntry>,
}

impl RenderSummary {
    pub fn scale_kind(&self) -> ScaleKind {
        self.scale.kind()
    }
}

pub fn tooltip_text(point: &DataPoint, value_label: &str) -> String {
    format!(
        "<b>Lat:</b> {}<br><b>Lon:</b> {}<br><b>{}:</b> {:.2}",
        point.latitude, point.longitude, value_label, point.value
    )
}

/// Draw every point of `dataset` into `sink`, colored on a scale spanning the
/// observed values, then hand over the legend.
///
/// Ranges and scale are settled before the first sink call, so a failure
/// leaves the sink untouched.
pub fn render<S: MapSink + ?Sized>(
    dataset: &Dataset,
    options: &RenderOptions,
    sink: &mut S,
) -> RenderResult<RenderSummary> {
    let ranges = compute_ranges_with(dataset, options.viewport_padding, options.limit_padding)?;
    let scale = ColorScale::new(ranges.value.min, ranges.value.max, options.palette.clone())?;
    if scale.kind() == ScaleKind::Degenerate {
        warn!(
            "All {} values equal {}; drawing every point with the lowest color",
            dataset.len(),
            scale.min()
        );
    }

    sink.set_bounds(&ranges.viewport, &ranges.limit);
    sink.set_min_zoom_offset(options.min_zoom_offset);

    for point in dataset {
        let tooltip = tooltip_text(point, &options.value_label);
        sink.draw_point(point, scale.color_for(point.value), &tooltip);
    }

    let legend = build_legend(&scale);
    sink.set_legend(&legend);

    info!(
        "Rendered {} points, values {:.2} to {:.2}",
        dataset.len(),
        scale.min(),
        scale.max()
    );

    Ok(RenderSummary {
        points_drawn: dataset.len(),
        ranges,
        scale,
        legend,
    })
}
