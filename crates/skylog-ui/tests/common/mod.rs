//! Shared fixtures for coordinator flow tests.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use skylog_core::SuggestionConfig;
use skylog_services::{CurrentWeather, ExportFormat, Forecast, WeatherApiClient};
use skylog_ui::{
    Dropdown, FieldId, FormCoordinator, HistoryRow, Notice, PanelState, RecordDetails, Scheduler,
    UpdateDraft, View,
};
use wiremock::MockServer;

/// Everything the coordinator asked the view to draw.
#[derive(Debug, Default)]
pub struct Recorded {
    pub dropdowns: HashMap<FieldId, Dropdown>,
    pub field_values: HashMap<FieldId, String>,
    pub results: Vec<Notice>,
    pub form_resets: usize,
    pub current: Vec<PanelState<CurrentWeather>>,
    pub forecast: Vec<PanelState<Forecast>>,
    pub history: Vec<Vec<HistoryRow>>,
    pub history_errors: Vec<String>,
    pub modal: Option<UpdateDraft>,
    pub details: Vec<RecordDetails>,
    pub exports: Vec<(ExportFormat, String)>,
    pub alerts: Vec<String>,
}

#[derive(Clone, Default)]
pub struct RecordingView {
    pub state: Arc<Mutex<Recorded>>,
}

impl View for RecordingView {
    fn render_dropdown(&mut self, field: &FieldId, dropdown: &Dropdown) {
        self.state.lock().dropdowns.insert(field.clone(), dropdown.clone());
    }

    fn set_field_value(&mut self, field: &FieldId, value: &str) {
        self.state
            .lock()
            .field_values
            .insert(field.clone(), value.to_string());
    }

    fn show_result(&mut self, notice: &Notice) {
        self.state.lock().results.push(notice.clone());
    }

    fn reset_history_form(&mut self) {
        self.state.lock().form_resets += 1;
    }

    fn render_current(&mut self, state: &PanelState<CurrentWeather>) {
        self.state.lock().current.push(state.clone());
    }

    fn render_forecast(&mut self, state: &PanelState<Forecast>) {
        self.state.lock().forecast.push(state.clone());
    }

    fn render_history(&mut self, rows: &[HistoryRow]) {
        self.state.lock().history.push(rows.to_vec());
    }

    fn history_error(&mut self, message: &str) {
        self.state.lock().history_errors.push(message.to_string());
    }

    fn open_update_modal(&mut self, draft: &UpdateDraft) {
        self.state.lock().modal = Some(draft.clone());
    }

    fn close_update_modal(&mut self) {
        self.state.lock().modal = None;
    }

    fn show_details(&mut self, details: &RecordDetails) {
        self.state.lock().details.push(details.clone());
    }

    fn export_ready(&mut self, format: ExportFormat, body: &str) {
        self.state.lock().exports.push((format, body.to_string()));
    }

    fn alert(&mut self, message: &str) {
        self.state.lock().alerts.push(message.to_string());
    }
}

pub fn coordinator(
    server: &MockServer,
    scheduler: Arc<dyn Scheduler>,
) -> (FormCoordinator, Arc<Mutex<Recorded>>) {
    coordinator_for_uri(&server.uri(), scheduler)
}

pub fn coordinator_for_uri(
    uri: &str,
    scheduler: Arc<dyn Scheduler>,
) -> (FormCoordinator, Arc<Mutex<Recorded>>) {
    let client = Arc::new(WeatherApiClient::new(uri, Duration::from_secs(5)).unwrap());
    let view = RecordingView::default();
    let state = view.state.clone();

    let coordinator = FormCoordinator::new(
        client,
        tokio::runtime::Handle::current(),
        scheduler,
        &SuggestionConfig::default(),
        Box::new(view),
    );
    (coordinator, state)
}

/// Apply the next completion, failing the test if none arrives.
pub async fn next(coordinator: &mut FormCoordinator) {
    let handled = tokio::time::timeout(Duration::from_secs(5), coordinator.process_next())
        .await
        .unwrap();
    assert!(handled);
}

pub fn suggestion(name: &str, display_name: &str, lat: f64, lon: f64) -> serde_json::Value {
    serde_json::json!({
        "name": name,
        "country": "Portugal",
        "display_name": display_name,
        "latitude": lat,
        "longitude": lon,
        "admin1": "",
        "id": 2267057
    })
}

pub fn record(id: &str, location: &str, means: &[f64]) -> serde_json::Value {
    let time: Vec<String> = (1..=means.len())
        .map(|day| format!("2024-03-{:02}", day))
        .collect();
    let series = serde_json::json!({
        "time": time,
        "temperature_2m_mean": means,
    });
    serde_json::json!({
        "id": id,
        "location": location,
        "start_date": "2024-03-01",
        "end_date": format!("2024-03-{:02}", means.len().max(1)),
        "temperatures": series.to_string(),
    })
}

pub fn current_weather(location: &str) -> serde_json::Value {
    serde_json::json!({
        "location": location,
        "latitude": 38.7167,
        "longitude": -9.1333,
        "temperature": 18.4,
        "feels_like": 17.9,
        "humidity": 64,
        "wind_speed": 12.2,
        "wind_direction": 310,
        "precipitation": 0.0,
        "cloud_cover": 25,
        "pressure": 1017.3,
        "weather_description": "Mainly clear",
        "weather_icon": "🌤️",
        "is_day": 1
    })
}

pub fn forecast(location: &str) -> serde_json::Value {
    serde_json::json!({
        "location": location,
        "latitude": 38.7167,
        "longitude": -9.1333,
        "forecast": [
            {
                "date": "2024-03-01",
                "temp_max": 19.0,
                "temp_min": 11.5,
                "precipitation": 0.2,
                "wind_speed": 14.0,
                "weather_description": "Overcast",
                "weather_icon": "☁️"
            }
        ]
    })
}
