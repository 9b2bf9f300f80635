//! Form coordinator: turns user actions into requests and request completions
//! into view updates.
//!
//! The coordinator owns every piece of client state (selection cache,
//! suggestion dropdowns, history mirror, edit modal). Requests run on the
//! tokio runtime and report back over an unbounded channel; completions are
//! only ever applied by [`FormCoordinator::handle_message`], so state is
//! touched from one logical task at a time.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use skylog_core::{AppError, SuggestionConfig};
use skylog_services::{
    ExportFormat, LocationQuery, RecordId, RemoteConfig, Suggestion, WeatherApiClient,
    WeatherRangeRequest,
};
use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use url::Url;

use crate::error_mapping::{display_message, prefixed_message};
use crate::models::{
    validate_date_range, validate_location, Dropdown, FieldId, HistoryStore, InputOutcome,
    LocationResolver, LocationSelectionCache, SuggestionFetcher, UpdateDraft,
};
use crate::scheduler::Scheduler;
use crate::services::{
    self, HistoryServiceMessage, ServiceMessage, SuggestionServiceMessage, WeatherServiceMessage,
};
use crate::view::{HistoryRow, Notice, PanelState, RecordDetails, View};

pub struct FormCoordinator {
    client: Arc<WeatherApiClient>,
    runtime: Handle,
    scheduler: Arc<dyn Scheduler>,
    debounce: Duration,

    tx: UnboundedSender<ServiceMessage>,
    rx: UnboundedReceiver<ServiceMessage>,

    selections: LocationSelectionCache,
    fetcher: SuggestionFetcher,
    history: HistoryStore,
    field_values: HashMap<FieldId, String>,
    update_modal: Option<UpdateDraft>,
    weather_seq: u64,
    remote_config: RemoteConfig,

    view: Box<dyn View + Send>,
}

impl FormCoordinator {
    pub fn new(
        client: Arc<WeatherApiClient>,
        runtime: Handle,
        scheduler: Arc<dyn Scheduler>,
        config: &SuggestionConfig,
        view: Box<dyn View + Send>,
    ) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            client,
            runtime,
            scheduler,
            debounce: config.debounce(),
            tx,
            rx,
            selections: LocationSelectionCache::new(),
            fetcher: SuggestionFetcher::new(config.min_query_len),
            history: HistoryStore::new(),
            field_values: HashMap::new(),
            update_modal: None,
            weather_seq: 0,
            remote_config: RemoteConfig::default(),
            view,
        }
    }

    // ---- Accessors ----

    pub fn selection(&self, field: &FieldId) -> Option<&Suggestion> {
        self.selections.get(field)
    }

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    pub fn update_modal(&self) -> Option<&UpdateDraft> {
        self.update_modal.as_ref()
    }

    pub fn dropdown(&self, field: &FieldId) -> Dropdown {
        self.fetcher.dropdown(field)
    }

    pub fn field_value(&self, field: &FieldId) -> &str {
        self.field_values.get(field).map_or("", String::as_str)
    }

    pub fn maps_configured(&self) -> bool {
        self.remote_config.maps_configured()
    }

    // ---- Autocomplete ----

    /// Text of a location field changed.
    pub fn on_input(&mut self, field: &FieldId, raw: &str) {
        // Drop the structured selection before anything else can happen on this field.
        self.selections.clear(field);
        self.field_values.insert(field.clone(), raw.to_string());

        let outcome = self.fetcher.on_input(field, raw);
        self.view.render_dropdown(field, &self.fetcher.dropdown(field));

        if let InputOutcome::Scheduled { seq, .. } = outcome {
            let tx = self.tx.clone();
            let elapsed_field = field.clone();
            let handle = self.scheduler.schedule(
                self.debounce,
                Box::new(move || {
                    services::send(
                        &tx,
                        ServiceMessage::DebounceElapsed {
                            field: elapsed_field,
                            seq,
                        },
                    );
                }),
            );
            self.fetcher.set_pending(field, seq, handle);
        }
    }

    pub fn on_focus(&mut self, field: &FieldId) {
        let raw = self.field_value(field).to_string();
        self.fetcher.on_focus(field, &raw);
        self.view.render_dropdown(field, &self.fetcher.dropdown(field));
    }

    pub fn on_outside_click(&mut self, field: &FieldId) {
        self.fetcher.on_outside_click(field);
        self.view.render_dropdown(field, &self.fetcher.dropdown(field));
    }

    /// Pick the suggestion at `index` in the field's dropdown.
    /// Returns `false` if there is no such suggestion.
    pub fn pick_suggestion(&mut self, field: &FieldId, index: usize) -> bool {
        let Some(suggestion) = self.fetcher.suggestion(field, index) else {
            return false;
        };

        self.field_values
            .insert(field.clone(), suggestion.display_name.clone());
        self.view.set_field_value(field, &suggestion.display_name);
        self.selections.set(field.clone(), suggestion);

        self.fetcher.hide(field);
        self.view.render_dropdown(field, &self.fetcher.dropdown(field));
        true
    }

    // ---- Current weather ----

    /// Submit the current-weather form.
    pub fn submit_current(&mut self) {
        // Sent as typed; the backend decides what text it accepts.
        let raw = self.field_value(&FieldId::CURRENT).to_string();
        let query = LocationResolver::resolve(&self.selections, &FieldId::CURRENT, &raw);
        self.start_current_lookup(query);
    }

    /// The device position is being requested. Any selection on the current
    /// field is superseded by it.
    pub fn begin_device_location(&mut self) {
        self.selections.clear(&FieldId::CURRENT);
        self.view
            .render_current(&PanelState::Loading("Getting your location...".to_string()));
    }

    /// Device position arrived, or could not be determined.
    pub fn on_device_location(&mut self, position: Result<(f64, f64), String>) {
        match position {
            Ok((latitude, longitude)) => {
                self.selections.clear(&FieldId::CURRENT);
                let query = LocationQuery::from_position(latitude, longitude);
                tracing::info!("Using device location {}", query);
                self.start_current_lookup(query);
            }
            Err(e) => {
                tracing::warn!("Geolocation failed: {}", e);
                let message = display_message(&AppError::Geolocation(e));
                self.view.render_current(&PanelState::Error(message));
            }
        }
    }

    fn start_current_lookup(&mut self, query: LocationQuery) {
        self.weather_seq += 1;
        self.view.render_current(&PanelState::Loading(
            "Loading current weather...".to_string(),
        ));
        services::request_weather_current(
            &self.tx,
            &self.runtime,
            self.client.clone(),
            self.weather_seq,
            query,
        );
    }

    // ---- History form ----

    /// Submit the historical range form with the field's current text.
    pub fn submit_history(&mut self, start_date: &str, end_date: &str) {
        let (start_date, end_date) = match validate_date_range(start_date, end_date) {
            Ok(range) => range,
            Err(e) => {
                self.view
                    .show_result(&Notice::error(prefixed_message(&e.into())));
                return;
            }
        };

        let raw = self.field_value(&FieldId::HISTORY).to_string();
        if let Err(e) = validate_location(&raw) {
            self.view
                .show_result(&Notice::error(prefixed_message(&e.into())));
            return;
        }

        let location = LocationResolver::resolve(&self.selections, &FieldId::HISTORY, &raw);
        self.view.show_result(&Notice::success("Loading..."));
        services::request_history_create(
            &self.tx,
            &self.runtime,
            self.client.clone(),
            FieldId::HISTORY,
            WeatherRangeRequest {
                location,
                start_date,
                end_date,
            },
        );
    }

    /// Re-fetch the whole history list.
    pub fn refresh_history(&mut self) {
        let seq = self.history.begin_refresh();
        services::request_history_fetch(&self.tx, &self.runtime, self.client.clone(), seq);
    }

    // ---- Edit, delete, details ----

    /// Open the edit modal for a cached record. Unknown ids are ignored.
    pub fn open_update_modal(&mut self, id: &RecordId) -> bool {
        let Some(record) = self.history.find_by_id(id) else {
            tracing::debug!("No cached record {}, edit ignored", id);
            return false;
        };

        let draft = UpdateDraft::from(record);
        self.view.open_update_modal(&draft);
        self.update_modal = Some(draft);
        true
    }

    pub fn close_update_modal(&mut self) {
        if self.update_modal.take().is_some() {
            self.view.close_update_modal();
        }
    }

    /// Submit the edit modal. The location is sent as typed.
    pub fn submit_update(&mut self, location: &str, start_date: &str, end_date: &str) -> bool {
        let Some(draft) = self.update_modal.as_mut() else {
            return false;
        };

        let (start, end) = match validate_date_range(start_date, end_date) {
            Ok(range) => range,
            Err(e) => {
                self.view.alert(&prefixed_message(&e.into()));
                return false;
            }
        };

        draft.location = location.to_string();
        draft.start_date = start_date.to_string();
        draft.end_date = end_date.to_string();
        let id = draft.id.clone();

        services::request_history_update(
            &self.tx,
            &self.runtime,
            self.client.clone(),
            id,
            WeatherRangeRequest {
                location: LocationQuery::text(location),
                start_date: start,
                end_date: end,
            },
        );
        true
    }

    pub fn delete_record(&mut self, id: &RecordId) {
        services::request_history_delete(&self.tx, &self.runtime, self.client.clone(), id.clone());
    }

    /// Show the detail view for a cached record. Unknown ids are ignored.
    pub fn show_details(&mut self, id: &RecordId) -> bool {
        let Some(record) = self.history.find_by_id(id) else {
            return false;
        };

        let entries = match record.series() {
            Ok(series) => series.entries(),
            Err(e) => {
                tracing::warn!("{}", e);
                Vec::new()
            }
        };

        let details = RecordDetails {
            id: record.id.clone(),
            location: record.location.clone(),
            entries,
            summary: record.summary(),
            maps_configured: self.remote_config.maps_configured(),
        };
        self.view.show_details(&details);
        true
    }

    /// Delete every record. Does nothing unless the user confirmed.
    pub fn clear_history(&mut self, confirmed: bool) -> bool {
        if !confirmed {
            return false;
        }
        services::request_history_clear(&self.tx, &self.runtime, self.client.clone());
        true
    }

    // ---- Export and config ----

    pub fn export_url(&self, format: ExportFormat) -> Result<Url, AppError> {
        Ok(self.client.export_url(format)?)
    }

    pub fn export(&mut self, format: ExportFormat) {
        services::request_export(&self.tx, &self.runtime, self.client.clone(), format);
    }

    pub fn load_config(&mut self) {
        services::request_config(&self.tx, &self.runtime, self.client.clone());
    }

    // ---- Message loop ----

    /// Wait for the next completion and apply it. Returns `false` once the
    /// channel is closed.
    pub async fn process_next(&mut self) -> bool {
        match self.rx.recv().await {
            Some(msg) => {
                self.handle_message(msg);
                true
            }
            None => false,
        }
    }

    /// Apply every completion already queued. Returns how many were handled.
    pub fn process_pending(&mut self) -> usize {
        let mut handled = 0;
        while let Ok(msg) = self.rx.try_recv() {
            self.handle_message(msg);
            handled += 1;
        }
        handled
    }

    pub fn handle_message(&mut self, msg: ServiceMessage) {
        match msg {
            ServiceMessage::DebounceElapsed { field, seq } => self.on_debounce_elapsed(field, seq),
            ServiceMessage::Suggestion(msg) => self.handle_suggestion(msg),
            ServiceMessage::Weather(msg) => self.handle_weather(msg),
            ServiceMessage::History(msg) => self.handle_history(msg),
        }
    }

    fn on_debounce_elapsed(&mut self, field: FieldId, seq: u64) {
        let Some(query) = self.fetcher.on_timer_elapsed(&field, seq) else {
            return;
        };

        self.view.render_dropdown(&field, &self.fetcher.dropdown(&field));
        services::request_search(&self.tx, &self.runtime, self.client.clone(), field, seq, query);
    }

    fn handle_suggestion(&mut self, msg: SuggestionServiceMessage) {
        match msg {
            SuggestionServiceMessage::SearchDone { field, seq, result } => {
                let result = result.map_err(|e| e.to_string());
                if self.fetcher.apply_results(&field, seq, result) {
                    self.view.render_dropdown(&field, &self.fetcher.dropdown(&field));
                }
            }
        }
    }

    fn handle_weather(&mut self, msg: WeatherServiceMessage) {
        match msg {
            WeatherServiceMessage::CurrentDone { seq, query, result } => {
                if seq != self.weather_seq {
                    tracing::debug!(seq, latest = self.weather_seq, "stale current weather discarded");
                    return;
                }

                match result {
                    Ok(current) => {
                        tracing::info!("Current weather loaded for {}", current.location);
                        self.view.render_current(&PanelState::Ready(current));
                        self.view
                            .render_forecast(&PanelState::Loading("Loading forecast...".to_string()));
                        services::request_weather_forecast(
                            &self.tx,
                            &self.runtime,
                            self.client.clone(),
                            seq,
                            query,
                        );
                    }
                    Err(e) => {
                        tracing::warn!("Current weather failed: {}", e);
                        let message = display_message(&e.into());
                        self.view.render_current(&PanelState::Error(message));
                    }
                }
            }
            WeatherServiceMessage::ForecastDone { seq, result } => {
                if seq != self.weather_seq {
                    tracing::debug!(seq, latest = self.weather_seq, "stale forecast discarded");
                    return;
                }

                let state = match result {
                    Ok(forecast) => PanelState::Ready(forecast),
                    Err(e) => {
                        tracing::warn!("Forecast failed: {}", e);
                        PanelState::Error(display_message(&e.into()))
                    }
                };
                self.view.render_forecast(&state);
            }
        }
    }

    fn handle_history(&mut self, msg: HistoryServiceMessage) {
        match msg {
            HistoryServiceMessage::FetchDone { seq, result } => match result {
                Ok(records) => {
                    if self.history.apply_refresh(seq, records) {
                        let rows: Vec<HistoryRow> =
                            self.history.records().iter().map(HistoryRow::from).collect();
                        self.view.render_history(&rows);
                    }
                }
                Err(e) => {
                    tracing::error!("Failed to fetch history: {}", e);
                    self.view.history_error(&prefixed_message(&e.into()));
                }
            },

            HistoryServiceMessage::CreateDone { field, result } => match result {
                Ok(created) => {
                    tracing::info!("Saved weather for {}", created.location);
                    self.view.show_result(&Notice::success(format!(
                        "✓ Successfully saved weather for {}!",
                        created.location
                    )));
                    self.view.reset_history_form();
                    self.field_values.remove(&field);
                    self.fetcher.hide(&field);
                    self.selections.clear(&field);
                    self.refresh_history();
                }
                Err(e) => {
                    tracing::warn!("Create failed: {}", e);
                    self.view
                        .show_result(&Notice::error(prefixed_message(&e.into())));
                }
            },

            HistoryServiceMessage::UpdateDone { id, result } => match result {
                Ok(()) => {
                    tracing::info!("Updated record {}", id);
                    self.view.alert("✓ Record updated successfully!");
                    if self.update_modal.as_ref().is_some_and(|d| d.id == id) {
                        self.close_update_modal();
                    }
                    self.refresh_history();
                }
                Err(e) => {
                    tracing::warn!("Update of {} failed: {}", id, e);
                    self.view.alert(&prefixed_message(&e.into()));
                }
            },

            HistoryServiceMessage::DeleteDone { id, result } => match result {
                Ok(message) => {
                    tracing::info!("Deleted record {}", id);
                    self.view.alert(&format!("✓ {}", message));
                    if self.update_modal.as_ref().is_some_and(|d| d.id == id) {
                        self.close_update_modal();
                    }
                    self.refresh_history();
                }
                Err(e) => {
                    tracing::warn!("Delete of {} failed: {}", id, e);
                    self.view.alert(&prefixed_message(&e.into()));
                }
            },

            HistoryServiceMessage::ClearDone(result) => match result {
                Ok(response) => {
                    tracing::info!("Cleared history: {} records", response.deleted_count);
                    self.view.alert(&format!("✓ {}", response.message));
                    self.close_update_modal();
                    self.refresh_history();
                }
                Err(e) => {
                    tracing::warn!("Clear history failed: {}", e);
                    self.view.alert(&prefixed_message(&e.into()));
                }
            },

            HistoryServiceMessage::ExportDone { format, result } => match result {
                Ok(body) => self.view.export_ready(format, &body),
                Err(e) => {
                    tracing::warn!("Export {} failed: {}", format.as_str(), e);
                    self.view.alert(&prefixed_message(&e.into()));
                }
            },

            HistoryServiceMessage::ConfigDone(result) => match result {
                Ok(config) => {
                    self.remote_config = config;
                    if !self.remote_config.maps_configured() {
                        tracing::info!("Maps key not configured");
                    }
                }
                Err(e) => tracing::warn!("Failed to load frontend config: {}", e),
            },
        }
    }
}
