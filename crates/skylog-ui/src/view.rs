//! Presentation seam between the coordinator and whatever draws the client.

use chrono::NaiveDate;
use skylog_services::{CurrentWeather, ExportFormat, Forecast, HistoryRecord, RecordId, TemperatureSummary};

use crate::models::{Dropdown, DropdownContent, FieldId, UpdateDraft};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

/// Message for the history form's result area.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
}

impl Notice {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            text: text.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.kind == NoticeKind::Error
    }
}

/// State of a display area fed by a single request.
#[derive(Debug, Clone, PartialEq)]
pub enum PanelState<T> {
    Loading(String),
    Ready(T),
    Error(String),
}

/// One line of the history list.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryRow {
    pub id: RecordId,
    pub location: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub summary: Option<TemperatureSummary>,
}

impl From<&HistoryRecord> for HistoryRow {
    fn from(record: &HistoryRecord) -> Self {
        Self {
            id: record.id.clone(),
            location: record.location.clone(),
            start_date: record.start_date,
            end_date: record.end_date,
            summary: record.summary(),
        }
    }
}

impl HistoryRow {
    pub fn summary_text(&self) -> String {
        match self.summary {
            Some(s) => format!("Avg {:.1}°C, Min {:.1}°C, Max {:.1}°C", s.average, s.min, s.max),
            None => "n/a".to_string(),
        }
    }
}

/// Content of the detail view for one record.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordDetails {
    pub id: RecordId,
    pub location: String,
    pub entries: Vec<(NaiveDate, Option<f64>)>,
    pub summary: Option<TemperatureSummary>,
    pub maps_configured: bool,
}

/// Status line shown in place of a result list, if any.
pub fn dropdown_status(content: &DropdownContent) -> Option<&'static str> {
    match content {
        DropdownContent::Loading => Some("Searching..."),
        DropdownContent::NoResults => Some("No locations found"),
        DropdownContent::Error(_) => Some("Error searching locations"),
        DropdownContent::Empty | DropdownContent::Results(_) => None,
    }
}

/// Rendering callbacks. Implementations only draw; they never call back into the coordinator.
pub trait View {
    fn render_dropdown(&mut self, field: &FieldId, dropdown: &Dropdown);
    fn set_field_value(&mut self, field: &FieldId, value: &str);
    /// History form result area
    fn show_result(&mut self, notice: &Notice);
    fn reset_history_form(&mut self);
    fn render_current(&mut self, state: &PanelState<CurrentWeather>);
    fn render_forecast(&mut self, state: &PanelState<Forecast>);
    fn render_history(&mut self, rows: &[HistoryRow]);
    fn history_error(&mut self, message: &str);
    fn open_update_modal(&mut self, draft: &UpdateDraft);
    fn close_update_modal(&mut self);
    fn show_details(&mut self, details: &RecordDetails);
    fn export_ready(&mut self, format: ExportFormat, body: &str);
    /// Blocking message box
    fn alert(&mut self, message: &str);
}
