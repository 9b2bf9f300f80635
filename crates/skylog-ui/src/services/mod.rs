//! Async request services.
//!
//! Each `request_*` function spawns its network call onto the runtime and
//! reports the outcome as a [`ServiceMessage`] on the coordinator's channel.
//! Nothing here touches coordinator state.

pub mod history_service;
pub mod suggestion_service;
pub mod weather_service;

pub use history_service::{
    request_clear as request_history_clear, request_config, request_create as request_history_create,
    request_delete as request_history_delete, request_export,
    request_fetch as request_history_fetch, request_update as request_history_update,
    HistoryServiceMessage,
};
pub use suggestion_service::{request_search, SuggestionServiceMessage};
pub use weather_service::{
    request_current as request_weather_current, request_forecast as request_weather_forecast,
    WeatherServiceMessage,
};

use tokio::sync::mpsc::UnboundedSender;

use crate::models::FieldId;

/// Everything the coordinator can be woken up by besides direct user calls.
#[derive(Debug)]
pub enum ServiceMessage {
    Suggestion(SuggestionServiceMessage),
    Weather(WeatherServiceMessage),
    History(HistoryServiceMessage),
    /// Debounce quiet period ended for a field
    DebounceElapsed { field: FieldId, seq: u64 },
}

impl From<SuggestionServiceMessage> for ServiceMessage {
    fn from(msg: SuggestionServiceMessage) -> Self {
        Self::Suggestion(msg)
    }
}

impl From<WeatherServiceMessage> for ServiceMessage {
    fn from(msg: WeatherServiceMessage) -> Self {
        Self::Weather(msg)
    }
}

impl From<HistoryServiceMessage> for ServiceMessage {
    fn from(msg: HistoryServiceMessage) -> Self {
        Self::History(msg)
    }
}

/// Send a completion, logging if the coordinator is gone.
pub(crate) fn send(tx: &UnboundedSender<ServiceMessage>, msg: impl Into<ServiceMessage>) {
    if tx.send(msg.into()).is_err() {
        tracing::debug!("coordinator channel closed, dropping completion");
    }
}
