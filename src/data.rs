use crate::types::{DataPoint, Dataset, RawPayload, RawRecord};
use anyhow::{Context, Result};
use std::path::Path;
use tracing::{debug, info, warn};

/// Read and parse the raw payload. The file read is the only await point.
pub async fn load_payload(path: &Path) -> Result<RawPayload> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read data file: {:?}", path))?;
    let payload: RawPayload = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse data JSON: {:?}", path))?;
    Ok(payload)
}

/// Load the payload and sanitize it into a dataset.
pub async fn load_dataset(path: &Path) -> Result<Dataset> {
    info!("Loading data from {:?}...", path);
    let payload = load_payload(path).await?;
    let dataset = sanitize(&payload);
    info!("Loaded {} valid points", dataset.len());
    Ok(dataset)
}

/// Keep only rows whose latitude, longitude and value are all finite numbers.
///
/// The three arrays are walked together, so a dropped row never shifts the
/// fields of the rows that follow it. Rows past the end of the shortest array
/// are incomplete and dropped too.
pub fn sanitize(payload: &RawPayload) -> Dataset {
    if payload.is_ragged() {
        warn!(
            "Payload arrays differ in length (lats={}, lons={}, pm25={}); extra rows ignored",
            payload.lats.len(),
            payload.lons.len(),
            payload.pm25.len()
        );
    }

    let dataset: Dataset = payload.records().filter_map(to_point).collect();

    debug!(
        "Sanitizer kept {} of {} rows",
        dataset.len(),
        payload.lats.len()
    );
    dataset
}

fn to_point(record: RawRecord<'_>) -> Option<DataPoint> {
    Some(DataPoint {
        latitude: record.latitude.as_finite()?,
        longitude: record.longitude.as_finite()?,
        value: record.value.as_finite()?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RawValue;
    use std::io::Write;

    fn payload(json: &str) -> RawPayload {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_sanitize_drops_rows_with_any_nan() {
        let raw = payload(r#"{"lats":[10,20,"NaN"],"lons":[1,2,3],"pm25":[5,"NaN",15]}"#);
        let dataset = sanitize(&raw);
        assert_eq!(
            dataset.points(),
            &[DataPoint { latitude: 10.0, longitude: 1.0, value: 5.0 }]
        );
    }

    #[test]
    fn test_sanitize_preserves_alignment() {
        let raw = payload(
            r#"{"lats":["NaN",11,12,null,14],
                "lons":[0,"NaN",22,23,24],
                "pm25":[30,31,32,33,34]}"#,
        );
        let dataset = sanitize(&raw);
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.points()[0], DataPoint { latitude: 12.0, longitude: 22.0, value: 32.0 });
        assert_eq!(dataset.points()[1], DataPoint { latitude: 14.0, longitude: 24.0, value: 34.0 });
    }

    #[test]
    fn test_sanitize_output_never_longer_than_input() {
        let raw = payload(
            r#"{"lats":[1,2,3,"x","NaN"],"lons":[1,2,3,4,5],"pm25":[1,"bad",3,4,5]}"#,
        );
        let dataset = sanitize(&raw);
        assert!(dataset.len() <= raw.lats.len());
        assert!(dataset
            .iter()
            .all(|p| p.latitude.is_finite() && p.longitude.is_finite() && p.value.is_finite()));
    }

    #[test]
    fn test_sanitize_drops_rows_with_non_numeric_json() {
        let raw = payload(
            r#"{"lats":[10,true,12,13],
                "lons":[1,2,{},[4]],
                "pm25":[5,6,7,8]}"#,
        );
        let dataset = sanitize(&raw);
        assert_eq!(
            dataset.points(),
            &[DataPoint { latitude: 10.0, longitude: 1.0, value: 5.0 }]
        );
    }

    #[test]
    fn test_sanitize_empty_payload() {
        let raw = payload(r#"{"lats":[],"lons":[],"pm25":[]}"#);
        assert!(sanitize(&raw).is_empty());
    }

    #[test]
    fn test_sanitize_ragged_arrays() {
        let raw = RawPayload {
            lats: vec![RawValue::Number(1.0), RawValue::Number(2.0), RawValue::Number(3.0)],
            lons: vec![RawValue::Number(4.0), RawValue::Number(5.0)],
            pm25: vec![RawValue::Number(6.0), RawValue::Number(7.0), RawValue::Number(8.0)],
        };
        let dataset = sanitize(&raw);
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.points()[1].value, 7.0);
    }

    #[test]
    fn test_sanitize_leaves_input_untouched() {
        let raw = payload(r#"{"lats":[1,"NaN"],"lons":[1,2],"pm25":[1,2]}"#);
        let before = raw.lats.clone();
        let _ = sanitize(&raw);
        assert_eq!(raw.lats, before);
    }

    #[tokio::test]
    async fn test_load_dataset_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"lats":[53.8,"NaN"],"lons":[-1.5,-1.6],"pm25":[7.5,8.0]}}"#
        )
        .unwrap();

        let dataset = load_dataset(file.path()).await.unwrap();
        assert_eq!(dataset.len(), 1);
        assert_eq!(dataset.points()[0].value, 7.5);
    }

    #[tokio::test]
    async fn test_load_dataset_tolerates_odd_values() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"lats":[10,true],"lons":[1,2],"pm25":[{{}},3]}}"#
        )
        .unwrap();

        let dataset = load_dataset(file.path()).await.unwrap();
        assert!(dataset.is_empty());
    }

    #[tokio::test]
    async fn test_load_payload_missing_file() {
        let err = load_payload(Path::new("/nonexistent/data.json")).await.unwrap_err();
        assert!(err.to_string().contains("Failed to read data file"));
    }

    #[tokio::test]
    async fn test_load_payload_bad_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        let err = load_payload(file.path()).await.unwrap_err();
        assert!(err.to_string().contains("Failed to parse data JSON"));
    }
}
