use geo::{coord, Rect};
use serde::de::IgnoredAny;
use serde::ser::{Serialize, SerializeTuple, Serializer};
use serde::Deserialize;

/// One field of the source payload as it arrives over the wire.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Number(f64),
    Text(String), // "NaN" marks a missing reading
    Missing,
    Other(IgnoredAny), // booleans, objects, arrays
}

impl RawValue {
    /// The finite number this field holds, if any.
    pub fn as_finite(&self) -> Option<f64> {
        let value = match self {
            RawValue::Number(n) => *n,
            RawValue::Text(s) => s.trim().parse::<f64>().ok()?,
            RawValue::Missing | RawValue::Other(_) => return None,
        };
        value.is_finite().then_some(value)
    }
}

/// The fetched payload: three parallel arrays, one entry per reading.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawPayload {
    pub lats: Vec<RawValue>,
    pub lons: Vec<RawValue>,
    pub pm25: Vec<RawValue>,
}

impl RawPayload {
    /// Walk the three arrays in lock-step. Stops at the shortest array.
    pub fn records(&self) -> impl Iterator<Item = RawRecord<'_>> {
        self.lats
            .iter()
            .zip(&self.lons)
            .zip(&self.pm25)
            .map(|((latitude, longitude), value)| RawRecord {
                latitude,
                longitude,
                value,
            })
    }

    pub fn is_ragged(&self) -> bool {
        self.lats.len() != self.lons.len() || self.lats.len() != self.pm25.len()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RawRecord<'a> {
    pub latitude: &'a RawValue,
    pub longitude: &'a RawValue,
    pub value: &'a RawValue,
}

/// A validated reading. All three fields are finite.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DataPoint {
    pub latitude: f64,
    pub longitude: f64,
    pub value: f64,
}

/// Sanitized readings in source order. Frozen once built.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    points: Vec<DataPoint>,
}

impl Dataset {
    pub fn points(&self) -> &[DataPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DataPoint> {
        self.points.iter()
    }
}

impl FromIterator<DataPoint> for Dataset {
    fn from_iter<I: IntoIterator<Item = DataPoint>>(iter: I) -> Self {
        Dataset {
            points: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a DataPoint;
    type IntoIter = std::slice::Iter<'a, DataPoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

/// A lat/lon rectangle. x is longitude, y is latitude.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds(Rect<f64>);

impl Bounds {
    pub fn new(south: f64, west: f64, north: f64, east: f64) -> Self {
        Bounds(Rect::new(
            coord! { x: west, y: south },
            coord! { x: east, y: north },
        ))
    }

    /// Returns (lat, lon).
    pub fn southwest(&self) -> (f64, f64) {
        (self.0.min().y, self.0.min().x)
    }

    /// Returns (lat, lon).
    pub fn northeast(&self) -> (f64, f64) {
        (self.0.max().y, self.0.max().x)
    }
}

#[cfg(test)]
impl Bounds {
    pub(crate) fn contains(&self, point: &DataPoint) -> bool {
        use geo::algorithm::contains::Contains;
        self.0.contains(&geo::Point::new(point.longitude, point.latitude))
    }

    pub(crate) fn contains_bounds(&self, other: &Bounds) -> bool {
        use geo::algorithm::contains::Contains;
        self.0.contains(&other.0)
    }
}

// Leaflet order: [[south, west], [north, east]]
impl Serialize for Bounds {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let (south, west) = self.southwest();
        let (north, east) = self.northeast();
        let mut corners = serializer.serialize_tuple(2)?;
        corners.serialize_element(&[south, west])?;
        corners.serialize_element(&[north, east])?;
        corners.end()
    }
}
