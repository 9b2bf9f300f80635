//! Current conditions and forecast.

use std::sync::Arc;

use skylog_services::{ApiError, CurrentWeather, Forecast, LocationQuery, WeatherApiClient};
use tokio::runtime::Handle;
use tokio::sync::mpsc::UnboundedSender;

use super::{send, ServiceMessage};

#[derive(Debug)]
pub enum WeatherServiceMessage {
    /// Current weather for the lookup numbered `seq`; `query` is reused for the forecast
    CurrentDone {
        seq: u64,
        query: LocationQuery,
        result: Result<CurrentWeather, ApiError>,
    },
    ForecastDone {
        seq: u64,
        result: Result<Forecast, ApiError>,
    },
}

pub fn request_current(
    tx: &UnboundedSender<ServiceMessage>,
    runtime: &Handle,
    client: Arc<WeatherApiClient>,
    seq: u64,
    query: LocationQuery,
) {
    let tx = tx.clone();
    runtime.spawn(async move {
        let result = client.current_weather(&query).await;
        send(&tx, WeatherServiceMessage::CurrentDone { seq, query, result });
    });
}

/// Only issued once the current-weather call for the same query has succeeded.
pub fn request_forecast(
    tx: &UnboundedSender<ServiceMessage>,
    runtime: &Handle,
    client: Arc<WeatherApiClient>,
    seq: u64,
    query: LocationQuery,
) {
    let tx = tx.clone();
    runtime.spawn(async move {
        let result = client.forecast(&query).await;
        send(&tx, WeatherServiceMessage::ForecastDone { seq, result });
    });
}
