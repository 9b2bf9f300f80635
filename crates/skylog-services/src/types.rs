use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize, Serializer};

/// Location sent to the backend: either a precise coordinate pair or free text.
///
/// On the wire both forms travel in the same `location` string field, as
/// `"<lat>,<lon>"` or the text verbatim.
#[derive(Debug, Clone, PartialEq)]
pub enum LocationQuery {
    Coordinates { latitude: f64, longitude: f64 },
    Text(String),
}

impl LocationQuery {
    pub fn coordinates(latitude: f64, longitude: f64) -> Self {
        Self::Coordinates {
            latitude,
            longitude,
        }
    }

    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// Coordinates from a device position, rounded to 4 decimal places.
    pub fn from_position(latitude: f64, longitude: f64) -> Self {
        Self::coordinates(round_4(latitude), round_4(longitude))
    }

    pub fn is_coordinates(&self) -> bool {
        matches!(self, Self::Coordinates { .. })
    }

    /// Value for the `location` request field.
    pub fn to_param(&self) -> String {
        self.to_string()
    }
}

fn round_4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

impl fmt::Display for LocationQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Coordinates {
                latitude,
                longitude,
            } => write!(f, "{},{}", latitude, longitude),
            Self::Text(value) => f.write_str(value),
        }
    }
}

impl Serialize for LocationQuery {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Autocomplete entry returned by the location search endpoint.
///
/// Immutable once received; there is no stable identity beyond its display name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub display_name: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    #[serde(default)]
    pub admin1: String,
    #[serde(default)]
    pub id: Option<i64>,
}

impl Suggestion {
    /// Coordinate pair, only when both halves are present.
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => Some((lat, lon)),
            _ => None,
        }
    }
}

/// Frontend settings served by `GET /api/config`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RemoteConfig {
    #[serde(default)]
    pub google_maps_api_key: Option<String>,
}

const MAPS_KEY_PLACEHOLDER: &str = "YOUR_GOOGLE_MAPS_API_KEY_HERE";

impl RemoteConfig {
    /// Check if the maps key is set (not empty and not the placeholder)
    pub fn maps_configured(&self) -> bool {
        self.google_maps_api_key
            .as_deref()
            .is_some_and(|key| !key.is_empty() && key != MAPS_KEY_PLACEHOLDER)
    }
}

/// Current conditions for a resolved location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentWeather {
    pub location: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub temperature: Option<f64>,
    pub feels_like: Option<f64>,
    pub humidity: Option<f64>,
    pub wind_speed: Option<f64>,
    pub wind_direction: Option<f64>,
    pub precipitation: Option<f64>,
    pub cloud_cover: Option<f64>,
    pub pressure: Option<f64>,
    #[serde(default)]
    pub weather_description: String,
    #[serde(default)]
    pub weather_icon: String,
    pub is_day: Option<u8>,
}

/// Multi-day forecast for a resolved location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    #[serde(default)]
    pub location: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub forecast: Vec<ForecastDay>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastDay {
    pub date: NaiveDate,
    pub temp_max: Option<f64>,
    pub temp_min: Option<f64>,
    pub precipitation: Option<f64>,
    pub wind_speed: Option<f64>,
    #[serde(default)]
    pub weather_description: String,
    #[serde(default)]
    pub weather_icon: String,
}

/// Body of `POST /api/weather/current` and `POST /api/weather/forecast`.
#[derive(Debug, Clone, Serialize)]
pub struct LocationRequest<'a> {
    pub location: &'a LocationQuery,
}

/// Body for creating or updating a history record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherRangeRequest {
    pub location: LocationQuery,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// Reply to `POST /api/weather`: the location the backend resolved and saved.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreateResponse {
    pub location: String,
}

/// Plain `{message}` acknowledgement.
#[derive(Debug, Clone, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClearHistoryResponse {
    pub message: String,
    #[serde(default)]
    pub deleted_count: u64,
}

/// Download formats offered by `GET /api/export/{format}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
    Markdown,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Csv => "csv",
            Self::Markdown => "markdown",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            "markdown" | "md" => Ok(Self::Markdown),
            other => Err(format!("Unknown export format: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinates_param() {
        let query = LocationQuery::coordinates(48.8566, 2.3522);
        assert_eq!(query.to_param(), "48.8566,2.3522");
        assert!(query.is_coordinates());
    }

    #[test]
    fn test_text_param_is_verbatim() {
        let query = LocationQuery::text("  40.7,-74.0 ");
        assert_eq!(query.to_param(), "  40.7,-74.0 ");
        assert!(!query.is_coordinates());
    }

    #[test]
    fn test_position_rounded_to_four_places() {
        let query = LocationQuery::from_position(51.507351, -0.127758);
        assert_eq!(query.to_param(), "51.5074,-0.1278");
    }

    #[test]
    fn test_location_request_body() {
        let query = LocationQuery::coordinates(10.5, -3.25);
        let json = serde_json::to_string(&LocationRequest { location: &query }).unwrap();
        assert_eq!(json, r#"{"location":"10.5,-3.25"}"#);
    }

    #[test]
    fn test_range_request_body() {
        let req = WeatherRangeRequest {
            location: LocationQuery::text("Berlin"),
            start_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 3, 10).unwrap(),
        };
        let json = serde_json::to_string(&req).unwrap();
        assert_eq!(
            json,
            r#"{"location":"Berlin","start_date":"2024-03-01","end_date":"2024-03-10"}"#
        );
    }

    #[test]
    fn test_suggestion_coordinates_require_both() {
        let json = serde_json::json!({
            "name": "Paris",
            "country": "France",
            "display_name": "Paris, Ile-de-France, France",
            "latitude": 48.85341,
            "longitude": null
        });
        let suggestion: Suggestion = serde_json::from_value(json).unwrap();
        assert_eq!(suggestion.coordinates(), None);
        assert_eq!(suggestion.admin1, "");
    }

    #[test]
    fn test_forecast_day_tolerates_missing_temperatures() {
        let json = serde_json::json!({
            "location": "Tromso, Norway",
            "forecast": [
                { "date": "2024-03-01", "temp_max": null, "temp_min": -4.5 },
                { "date": "2024-03-02", "temp_max": 1.0, "temp_min": null }
            ]
        });
        let forecast: Forecast = serde_json::from_value(json).unwrap();
        assert_eq!(forecast.forecast[0].temp_max, None);
        assert_eq!(forecast.forecast[0].temp_min, Some(-4.5));
        assert_eq!(forecast.forecast[1].temp_min, None);
    }

    #[test]
    fn test_create_response_ignores_extra_fields() {
        let json = serde_json::json!({ "location": "Berlin, Germany", "id": 7 });
        let created: CreateResponse = serde_json::from_value(json).unwrap();
        assert_eq!(created.location, "Berlin, Germany");
    }

    #[test]
    fn test_maps_configured() {
        let mut config = RemoteConfig::default();
        assert!(!config.maps_configured());
        config.google_maps_api_key = Some(MAPS_KEY_PLACEHOLDER.to_string());
        assert!(!config.maps_configured());
        config.google_maps_api_key = Some("abc123".to_string());
        assert!(config.maps_configured());
    }

    #[test]
    fn test_export_format_parse() {
        assert_eq!("CSV".parse::<ExportFormat>(), Ok(ExportFormat::Csv));
        assert_eq!("md".parse::<ExportFormat>(), Ok(ExportFormat::Markdown));
        assert!("xml".parse::<ExportFormat>().is_err());
    }
}
