//! Fixed-width quantization of a scalar onto a discrete palette.
//!
//! The value domain `[min, max]` is cut into `palette.len()` bins of equal
//! width. Values outside the domain clamp into the first or last bin, so any
//! input gets a color. `value == max` lands one past the last bin before the
//! clamp and is folded back into it.

use crate::error::{RenderError, RenderResult};
use image::Rgba;
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Ten-step blue to red ramp used when no palette is configured.
pub const DEFAULT_PALETTE: [&str; 10] = [
    "#1400ff", "#0064ff", "#00dbff", "#00ffac", "#00ff36",
    "#46ff00", "#bdff00", "#ffca00", "#ff5300", "#ff0029",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b }
    }

    pub fn to_rgba(self, alpha: u8) -> Rgba<u8> {
        Rgba([self.r, self.g, self.b, alpha])
    }
}

impl FromStr for Color {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(RenderError::InvalidColor(s.to_string()));
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16)
                .map_err(|_| RenderError::InvalidColor(s.to_string()))
        };
        Ok(Color::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Parse a list of hex strings into a palette.
pub fn parse_palette<S: AsRef<str>>(hex: &[S]) -> RenderResult<Vec<Color>> {
    hex.iter().map(|h| h.as_ref().parse()).collect()
}

/// Whether the scale spreads values over its bins or collapses them all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScaleKind {
    Linear,
    /// `min == max`: every value maps to the first palette color.
    Degenerate,
}

/// A data-dependent color scale. The palette is never empty.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorScale {
    min: f64,
    max: f64,
    palette: Vec<Color>,
}

impl ColorScale {
    pub fn new(min: f64, max: f64, palette: Vec<Color>) -> RenderResult<Self> {
        if palette.is_empty() {
            return Err(RenderError::EmptyPalette);
        }
        if !min.is_finite() || !max.is_finite() || min > max {
            return Err(RenderError::InvalidRange { min, max });
        }
        Ok(ColorScale { min, max, palette })
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn palette(&self) -> &[Color] {
        &self.palette
    }

    pub fn kind(&self) -> ScaleKind {
        if self.max == self.min {
            ScaleKind::Degenerate
        } else {
            ScaleKind::Linear
        }
    }

    pub fn bin_width(&self) -> f64 {
        (self.max - self.min) / self.palette.len() as f64
    }

    /// `floor((value - min) / bin_width)` clamped into `[0, n-1]`.
    pub fn bin_index(&self, value: f64) -> usize {
        let last = self.palette.len() - 1;
        if self.kind() == ScaleKind::Degenerate {
            return 0;
        }
        let raw = ((value - self.min) / self.bin_width()).floor();
        if raw.is_nan() || raw <= 0.0 {
            0
        } else if raw >= last as f64 {
            last
        } else {
            raw as usize
        }
    }

    /// The `[low, high)` interval covered by bin `index`.
    pub fn bin_range(&self, index: usize) -> (f64, f64) {
        let width = self.bin_width();
        (
            self.min + index as f64 * width,
            self.min + (index + 1) as f64 * width,
        )
    }

    pub fn color_for(&self, value: f64) -> Color {
        self.palette[self.bin_index(value)]
    }
}
