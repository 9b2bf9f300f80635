//! Weather history backend API client.

use std::time::Duration;

use reqwest::Response;
use serde::de::DeserializeOwned;
use skylog_core::ApiConfig;
use tracing::instrument;
use url::Url;

use crate::error::ApiError;
use crate::history::{HistoryRecord, RecordId};
use crate::types::*;

/// Thin typed wrapper over the backend's JSON endpoints.
///
/// Every call is a single attempt; failures are returned to the caller.
#[derive(Debug, Clone)]
pub struct WeatherApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl WeatherApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let parsed = Url::parse(base_url).map_err(|e| ApiError::InvalidUrl(e.to_string()))?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(ApiError::InvalidUrl(format!(
                "unsupported scheme: {}",
                parsed.scheme()
            )));
        }

        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &ApiConfig) -> Result<Self, ApiError> {
        Self::new(&config.base_url, config.timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Fetch frontend settings.
    #[instrument(skip(self), level = "info")]
    pub async fn fetch_config(&self) -> Result<RemoteConfig, ApiError> {
        let response = self.client.get(self.url("/api/config")).send().await?;
        self.handle_response(response).await
    }

    /// Search for locations matching free text. An empty list is a valid answer.
    #[instrument(skip(self), level = "info")]
    pub async fn search_locations(&self, query: &str) -> Result<Vec<Suggestion>, ApiError> {
        let url = format!(
            "{}?q={}",
            self.url("/api/locations/search"),
            urlencoding::encode(query)
        );

        let response = self.client.get(&url).send().await?;
        self.handle_response(response).await
    }

    /// Current conditions for a location.
    #[instrument(skip(self), level = "info")]
    pub async fn current_weather(&self, location: &LocationQuery) -> Result<CurrentWeather, ApiError> {
        let response = self
            .client
            .post(self.url("/api/weather/current"))
            .json(&LocationRequest { location })
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Daily forecast for a location.
    #[instrument(skip(self), level = "info")]
    pub async fn forecast(&self, location: &LocationQuery) -> Result<Forecast, ApiError> {
        let response = self
            .client
            .post(self.url("/api/weather/forecast"))
            .json(&LocationRequest { location })
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Fetch and persist historical weather for a date range.
    #[instrument(skip(self), level = "info")]
    pub async fn create_record(
        &self,
        request: &WeatherRangeRequest,
    ) -> Result<CreateResponse, ApiError> {
        let response = self
            .client
            .post(self.url("/api/weather"))
            .json(request)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// List all persisted records, in backend order.
    #[instrument(skip(self), level = "info")]
    pub async fn list_history(&self) -> Result<Vec<HistoryRecord>, ApiError> {
        let response = self
            .client
            .get(self.url("/api/weather/history"))
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Replace the location and date range of a record.
    ///
    /// Any success body without an `error` field counts as applied; the
    /// caller re-fetches the list for the new values.
    #[instrument(skip(self), level = "info")]
    pub async fn update_record(
        &self,
        id: &RecordId,
        request: &WeatherRangeRequest,
    ) -> Result<(), ApiError> {
        let url = format!(
            "{}/{}",
            self.url("/api/weather/history"),
            urlencoding::encode(id.as_str())
        );

        let response = self.client.put(&url).json(request).send().await?;
        self.handle_acknowledgement(response).await
    }

    /// Delete a record. Returns the backend's confirmation message.
    #[instrument(skip(self), level = "info")]
    pub async fn delete_record(&self, id: &RecordId) -> Result<String, ApiError> {
        let url = format!(
            "{}/{}",
            self.url("/api/weather/history"),
            urlencoding::encode(id.as_str())
        );

        let response = self.client.delete(&url).send().await?;
        let body: MessageResponse = self.handle_response(response).await?;
        Ok(body.message)
    }

    /// Delete every record. The backend requires the explicit confirm flag.
    #[instrument(skip(self), level = "info")]
    pub async fn clear_history(&self) -> Result<ClearHistoryResponse, ApiError> {
        let url = format!("{}?confirm=true", self.url("/api/weather/history"));

        let response = self.client.delete(&url).send().await?;
        self.handle_response(response).await
    }

    /// Download location for an export.
    pub fn export_url(&self, format: ExportFormat) -> Result<Url, ApiError> {
        let url = self.url(&format!("/api/export/{}", format.as_str()));
        Url::parse(&url).map_err(|e| ApiError::InvalidUrl(e.to_string()))
    }

    /// Download an export as text.
    #[instrument(skip(self), level = "info")]
    pub async fn export(&self, format: ExportFormat) -> Result<String, ApiError> {
        let url = self.export_url(format)?;
        let response = self.client.get(url).send().await?;

        let status = response.status();
        let text = response.text().await?;
        if status.is_success() {
            Ok(text)
        } else {
            Err(error_from_body(status.as_u16(), &text))
        }
    }

    /// Accept an empty or arbitrary JSON success body.
    async fn handle_acknowledgement(&self, response: Response) -> Result<(), ApiError> {
        let status = response.status();
        let text = response.text().await?;

        if status.is_success() && text.trim().is_empty() {
            return Ok(());
        }

        match serde_json::from_str::<serde_json::Value>(&text) {
            Ok(value) => {
                if let Some(message) = backend_error(&value) {
                    return Err(ApiError::Backend(message));
                }
                if status.is_success() {
                    Ok(())
                } else {
                    Err(ApiError::Status {
                        status: status.as_u16(),
                        message: text,
                    })
                }
            }
            Err(_) if status.is_success() => Ok(()),
            Err(_) => Err(error_from_body(status.as_u16(), &text)),
        }
    }

    /// Decode a JSON body; an `error` field wins regardless of status.
    async fn handle_response<T: DeserializeOwned>(&self, response: Response) -> Result<T, ApiError> {
        let status = response.status();
        let text = response.text().await?;

        let value: serde_json::Value = match serde_json::from_str(&text) {
            Ok(v) => v,
            Err(e) if status.is_success() => {
                return Err(ApiError::InvalidResponse(format!("JSON parse error: {}", e)));
            }
            Err(_) => return Err(error_from_body(status.as_u16(), &text)),
        };

        if let Some(message) = backend_error(&value) {
            tracing::debug!("Backend reported error ({}): {}", status, message);
            return Err(ApiError::Backend(message));
        }

        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                message: text,
            });
        }

        serde_json::from_value(value)
            .map_err(|e| ApiError::InvalidResponse(format!("JSON parse error: {}", e)))
    }
}

fn backend_error(value: &serde_json::Value) -> Option<String> {
    match value.get("error")? {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) if s.is_empty() => None,
        serde_json::Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn error_from_body(status: u16, text: &str) -> ApiError {
    serde_json::from_str::<serde_json::Value>(text)
        .ok()
        .and_then(|v| backend_error(&v))
        .map(ApiError::Backend)
        .unwrap_or_else(|| ApiError::Status {
            status,
            message: text.to_string(),
        })
}
