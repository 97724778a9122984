use crate::error::{RenderError, RenderResult};
use crate::types::{Bounds, Dataset};

pub const VIEWPORT_PADDING: f64 = 0.0001;
pub const LIMIT_PADDING: f64 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
}

impl ValueRange {
    fn seed(v: f64) -> Self {
        ValueRange { min: v, max: v }
    }

    fn include(&mut self, v: f64) {
        self.min = self.min.min(v);
        self.max = self.max.max(v);
    }
}

/// Observed extremes of a dataset and the two bounds derived from them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ranges {
    pub lat: ValueRange,
    pub lon: ValueRange,
    pub value: ValueRange,
    /// Tight fit around the data, for the initial view.
    pub viewport: Bounds,
    /// Looser box that caps panning.
    pub limit: Bounds,
}

pub fn compute_ranges(dataset: &Dataset) -> RenderResult<Ranges> {
    compute_ranges_with(dataset, VIEWPORT_PADDING, LIMIT_PADDING)
}

/// Single pass over the dataset. Fails on an empty dataset instead of
/// producing infinite extremes.
pub fn compute_ranges_with(
    dataset: &Dataset,
    viewport_padding: f64,
    limit_padding: f64,
) -> RenderResult<Ranges> {
    let (first, rest) = dataset
        .points()
        .split_first()
        .ok_or(RenderError::EmptyDataset)?;

    let mut lat = ValueRange::seed(first.latitude);
    let mut lon = ValueRange::seed(first.longitude);
    let mut value = ValueRange::seed(first.value);
    for point in rest {
        lat.include(point.latitude);
        lon.include(point.longitude);
        value.include(point.value);
    }

    Ok(Ranges {
        lat,
        lon,
        value,
        viewport: padded_bounds(&lat, &lon, viewport_padding),
        limit: padded_bounds(&lat, &lon, limit_padding),
    })
}

fn padded_bounds(lat: &ValueRange, lon: &ValueRange, padding: f64) -> Bounds {
    Bounds::new(
        lat.min - padding,
        lon.min - padding,
        lat.max + padding,
        lon.max + padding,
    )
}
