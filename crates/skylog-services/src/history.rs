//! Persisted history records and the temperature series they carry.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ApiError;

/// Opaque backend identifier of a history record.
///
/// The backend issues string ids; numeric ids are accepted and kept in
/// their decimal form so lookups compare consistently.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Number(i64),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(s) => Self(s),
            RawId::Number(n) => Self(n.to_string()),
        })
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for RecordId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<i64> for RecordId {
    fn from(id: i64) -> Self {
        Self(id.to_string())
    }
}

/// A saved weather query for a date range. Owned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub id: RecordId,
    pub location: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Daily series serialized as a JSON string
    pub temperatures: String,
}

impl HistoryRecord {
    /// Decode the serialized daily series.
    pub fn series(&self) -> Result<TemperatureSeries, ApiError> {
        serde_json::from_str(&self.temperatures).map_err(|e| {
            ApiError::InvalidResponse(format!(
                "temperature series for record {}: {}",
                self.id, e
            ))
        })
    }

    /// Summary of the mean temperatures, `None` when there is nothing to summarize.
    pub fn summary(&self) -> Option<TemperatureSummary> {
        match self.series() {
            Ok(series) => TemperatureSummary::from_series(&series.means()),
            Err(e) => {
                tracing::warn!("{}", e);
                None
            }
        }
    }
}

/// Daily values as returned by the upstream archive API.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TemperatureSeries {
    #[serde(default)]
    pub time: Vec<NaiveDate>,
    /// Missing days arrive as `null`
    #[serde(default)]
    pub temperature_2m_mean: Vec<Option<f64>>,
}

impl TemperatureSeries {
    /// Mean temperatures with missing days skipped.
    pub fn means(&self) -> Vec<f64> {
        self.temperature_2m_mean.iter().flatten().copied().collect()
    }

    /// `(date, mean)` pairs for the detail view.
    pub fn entries(&self) -> Vec<(NaiveDate, Option<f64>)> {
        self.time
            .iter()
            .copied()
            .zip(self.temperature_2m_mean.iter().copied())
            .collect()
    }
}

/// Average, minimum and maximum of a series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TemperatureSummary {
    pub average: f64,
    pub min: f64,
    pub max: f64,
}

impl TemperatureSummary {
    /// Returns `None` for an empty series.
    pub fn from_series(values: &[f64]) -> Option<Self> {
        let (first, rest) = values.split_first()?;

        let (sum, min, max) = rest.iter().fold(
            (*first, *first, *first),
            |(sum, min, max), &v| (sum + v, min.min(v), max.max(v)),
        );

        Some(Self {
            average: sum / values.len() as f64,
            min,
            max,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(temperatures: &str) -> HistoryRecord {
        HistoryRecord {
            id: RecordId::from(5),
            location: "Lisbon, Portugal".to_string(),
            start_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 3, 3).unwrap(),
            temperatures: temperatures.to_string(),
        }
    }

    #[test]
    fn test_summary_of_simple_series() {
        let summary = TemperatureSummary::from_series(&[10.0, 20.0, 30.0]).unwrap();
        assert_eq!(summary.average, 20.0);
        assert_eq!(summary.min, 10.0);
        assert_eq!(summary.max, 30.0);
    }

    #[test]
    fn test_summary_of_empty_series() {
        assert_eq!(TemperatureSummary::from_series(&[]), None);
    }

    #[test]
    fn test_summary_single_point() {
        let summary = TemperatureSummary::from_series(&[-4.5]).unwrap();
        assert_eq!(summary.average, -4.5);
        assert_eq!(summary.min, -4.5);
        assert_eq!(summary.max, -4.5);
    }

    #[test]
    fn test_record_id_accepts_number_and_string() {
        let from_number: RecordId = serde_json::from_str("5").unwrap();
        let from_string: RecordId = serde_json::from_str("\"5\"").unwrap();
        assert_eq!(from_number, from_string);

        let object_id: RecordId = serde_json::from_str("\"65f1c0ffee\"").unwrap();
        assert_eq!(object_id.as_str(), "65f1c0ffee");
    }

    #[test]
    fn test_record_series_skips_missing_days() {
        let rec = record(
            r#"{"time":["2024-03-01","2024-03-02","2024-03-03"],"temperature_2m_mean":[12.0,null,14.0]}"#,
        );
        let series = rec.series().unwrap();
        assert_eq!(series.means(), vec![12.0, 14.0]);
        assert_eq!(series.entries().len(), 3);
        assert_eq!(series.entries()[1].1, None);

        let summary = rec.summary().unwrap();
        assert_eq!(summary.average, 13.0);
    }

    #[test]
    fn test_record_with_bad_series_has_no_summary() {
        let rec = record("not json");
        assert!(matches!(rec.series(), Err(ApiError::InvalidResponse(_))));
        assert_eq!(rec.summary(), None);
    }

    #[test]
    fn test_record_deserializes_backend_shape() {
        let json = serde_json::json!({
            "id": "65f1",
            "location": "Oslo, Norway",
            "start_date": "2024-01-01",
            "end_date": "2024-01-02",
            "temperatures": "{\"time\":[\"2024-01-01\",\"2024-01-02\"],\"temperature_2m_mean\":[-3.0,-5.0]}"
        });
        let rec: HistoryRecord = serde_json::from_value(json).unwrap();
        assert_eq!(rec.id, RecordId::new("65f1"));
        let summary = rec.summary().unwrap();
        assert_eq!(summary.min, -5.0);
        assert_eq!(summary.max, -3.0);
    }
}
