//! HTTP client for the weather history backend.
//!
//! Wraps every endpoint the client consumes: location search, current
//! weather and forecast, history CRUD, clear-all and export.

pub mod client;
pub mod error;
pub mod history;
pub mod types;

pub use client::WeatherApiClient;
pub use error::ApiError;
pub use history::{HistoryRecord, RecordId, TemperatureSeries, TemperatureSummary};
pub use types::*;
