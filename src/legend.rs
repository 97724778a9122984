//! Legend entries for a color scale, highest bin first.
//!
//! Ranges come from [`ColorScale::bin_range`], the same arithmetic the
//! quantizer bins with, so labels and plotted colors agree at the edges.

use crate::colormap::{Color, ColorScale};
use serde::Serialize;
use std::fmt::Write;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LegendEntry {
    pub color: Color,
    pub range_low: f64,
    pub range_high: f64,
}

impl LegendEntry {
    pub fn label(&self) -> String {
        format!("{:.2} to {:.2}", self.range_low, self.range_high)
    }
}

pub fn build_legend(scale: &ColorScale) -> Vec<LegendEntry> {
    scale
        .palette()
        .iter()
        .enumerate()
        .rev()
        .map(|(i, &color)| {
            let (range_low, range_high) = scale.bin_range(i);
            LegendEntry { color, range_low, range_high }
        })
        .collect()
}

/// Markup for the map's legend control.
pub fn legend_html(entries: &[LegendEntry]) -> String {
    let mut html = String::new();
    for entry in entries {
        let _ = write!(
            html,
            "<p><span class=\"map_colormap_color\" style=\"background: {};\"></span>\
             <span class=\"map_colormap_value\">{}</span></p>",
            entry.color,
            entry.label()
        );
    }
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colormap::{parse_palette, DEFAULT_PALETTE};

    fn scale(min: f64, max: f64) -> ColorScale {
        ColorScale::new(min, max, parse_palette(&DEFAULT_PALETTE[..]).unwrap()).unwrap()
    }

    #[test]
    fn test_legend_is_descending() {
        let legend = build_legend(&scale(0.0, 50.0));
        assert_eq!(legend.len(), 10);
        assert_eq!(legend[0].color.to_string(), "#ff0029");
        assert_eq!((legend[0].range_low, legend[0].range_high), (45.0, 50.0));
        assert_eq!(legend[9].color.to_string(), "#1400ff");
        assert_eq!((legend[9].range_low, legend[9].range_high), (0.0, 5.0));
        for pair in legend.windows(2) {
            assert!(pair[0].range_low >= pair[1].range_high - 1e-9);
        }
    }

    #[test]
    fn test_legend_matches_quantizer_bins() {
        let scale = scale(3.25, 71.9);
        let legend = build_legend(&scale);
        let n = legend.len();
        for (k, entry) in legend.iter().enumerate() {
            let bin = n - 1 - k;
            assert_eq!(scale.bin_range(bin), (entry.range_low, entry.range_high));
            assert_eq!(scale.palette()[bin], entry.color);

            let mid = (entry.range_low + entry.range_high) / 2.0;
            assert_eq!(scale.color_for(mid), entry.color);
        }
    }

    #[test]
    fn test_legend_low_edges_may_round_into_the_bin_below() {
        // Edges are min + i * width; floor((edge - min) / width) can come
        // out one short when the product rounds down.
        for (min, max) in [(0.1, 0.7), (3.25, 71.9), (-2.2, 9.7), (0.0, 1.0), (0.0, 50.0)] {
            let color_scale = scale(min, max);
            for entry in build_legend(&color_scale) {
                let (low, high) = (entry.range_low, entry.range_high);
                let bin = color_scale.palette().iter().position(|&c| c == entry.color).unwrap();
                let at_low = color_scale.bin_index(low);
                assert!(
                    at_low == bin || at_low + 1 == bin,
                    "low edge {} of bin {} landed in bin {}",
                    low,
                    bin,
                    at_low
                );
                assert_eq!(color_scale.bin_index((low + high) / 2.0), bin);
            }
        }

        // Exact binary widths have no drift.
        let exact = scale(0.0, 50.0);
        for entry in build_legend(&exact) {
            assert_eq!(exact.color_for(entry.range_low), entry.color);
        }
    }

    #[test]
    fn test_legend_labels_use_two_decimals() {
        let legend = build_legend(&scale(0.0, 1.0));
        assert_eq!(legend[0].label(), "0.90 to 1.00");
        assert_eq!(legend[9].label(), "0.00 to 0.10");
    }

    #[test]
    fn test_degenerate_legend_collapses() {
        let legend = build_legend(&scale(4.0, 4.0));
        assert!(legend.iter().all(|e| e.range_low == 4.0 && e.range_high == 4.0));
    }

    #[test]
    fn test_legend_html() {
        let scale = ColorScale::new(0.0, 10.0, vec![Color::new(0, 0, 255), Color::new(255, 0, 0)])
            .unwrap();
        let html = legend_html(&build_legend(&scale));
        assert_eq!(
            html,
            "<p><span class=\"map_colormap_color\" style=\"background: #ff0000;\"></span>\
             <span class=\"map_colormap_value\">5.00 to 10.00</span></p>\
             <p><span class=\"map_colormap_color\" style=\"background: #0000ff;\"></span>\
             <span class=\"map_colormap_value\">0.00 to 5.00</span></p>"
        );
    }
}
