//! Failures of the render pipeline.
//!
//! Malformed rows never show up here: the sanitizer drops them silently.

use thiserror::Error;

pub type RenderResult<T> = Result<T, RenderError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RenderError {
    #[error("No renderable data: dataset is empty after sanitization")]
    EmptyDataset,

    #[error("Color palette is empty")]
    EmptyPalette,

    #[error("Invalid color: {0}")]
    InvalidColor(String),

    #[error("Invalid color scale range: min={min}, max={max}")]
    InvalidRange { min: f64, max: f64 },
}
