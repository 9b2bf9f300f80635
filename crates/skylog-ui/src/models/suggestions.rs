//! Debounced location suggestions, one dropdown per input field.

use std::collections::HashMap;

use skylog_services::Suggestion;

use super::FieldId;
use crate::scheduler::TaskHandle;

/// What a field's dropdown currently shows.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum DropdownContent {
    #[default]
    Empty,
    Loading,
    Results(Vec<Suggestion>),
    NoResults,
    /// Search failed; carries the underlying error text
    Error(String),
}

impl DropdownContent {
    pub fn has_content(&self) -> bool {
        !matches!(self, Self::Empty)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dropdown {
    pub content: DropdownContent,
    pub visible: bool,
}

/// Result of feeding a keystroke to the fetcher.
#[derive(Debug, Clone, PartialEq)]
pub enum InputOutcome {
    /// Query too short; dropdown cleared and hidden, nothing scheduled
    Cleared,
    /// A debounce timer should be started for this sequence number
    Scheduled { seq: u64, query: String },
}

#[derive(Debug, Default)]
struct FieldState {
    latest_seq: u64,
    pending: Option<TaskHandle>,
    query: Option<String>,
    dropdown: Dropdown,
}

/// Tracks the debounce timer, the latest issued request and the dropdown of
/// every location field.
///
/// A sequence number is issued per keystroke. Timers and search results that
/// carry an older number are dropped, so only the last scheduled search can
/// ever reach the dropdown.
#[derive(Debug)]
pub struct SuggestionFetcher {
    min_query_len: usize,
    fields: HashMap<FieldId, FieldState>,
}

impl SuggestionFetcher {
    pub fn new(min_query_len: usize) -> Self {
        Self {
            min_query_len,
            fields: HashMap::new(),
        }
    }

    fn state_mut(&mut self, field: &FieldId) -> &mut FieldState {
        self.fields.entry(field.clone()).or_default()
    }

    /// Register a keystroke. Any pending timer for the field is cancelled.
    pub fn on_input(&mut self, field: &FieldId, raw: &str) -> InputOutcome {
        let min_len = self.min_query_len;
        let state = self.state_mut(field);

        if let Some(pending) = state.pending.take() {
            pending.cancel();
            tracing::debug!(field = %field, seq = state.latest_seq, "debounce timer superseded");
        }

        // Bumped on every keystroke so in-flight searches for older text are discarded.
        state.latest_seq += 1;

        let query = raw.trim();
        if query.chars().count() < min_len {
            state.query = None;
            state.dropdown = Dropdown::default();
            return InputOutcome::Cleared;
        }

        // Results for earlier text must not stay pickable while the new search waits.
        state.query = Some(query.to_string());
        state.dropdown = Dropdown {
            content: DropdownContent::Loading,
            visible: true,
        };
        InputOutcome::Scheduled {
            seq: state.latest_seq,
            query: query.to_string(),
        }
    }

    /// Remember the timer started for the latest keystroke.
    pub fn set_pending(&mut self, field: &FieldId, seq: u64, handle: TaskHandle) {
        let state = self.state_mut(field);
        if state.latest_seq == seq {
            state.pending = Some(handle);
        } else {
            handle.cancel();
        }
    }

    /// Debounce period elapsed. Returns the query to search for, or `None`
    /// if the timer belongs to an older keystroke.
    pub fn on_timer_elapsed(&mut self, field: &FieldId, seq: u64) -> Option<String> {
        let state = self.state_mut(field);
        if state.latest_seq != seq {
            tracing::debug!(field = %field, seq, latest = state.latest_seq, "stale debounce timer ignored");
            return None;
        }

        state.pending = None;
        let query = state.query.clone()?;
        state.dropdown = Dropdown {
            content: DropdownContent::Loading,
            visible: true,
        };
        Some(query)
    }

    /// Apply a finished search. Returns `false` when the result was stale and dropped.
    pub fn apply_results(
        &mut self,
        field: &FieldId,
        seq: u64,
        result: Result<Vec<Suggestion>, String>,
    ) -> bool {
        let state = self.state_mut(field);
        if state.latest_seq != seq {
            tracing::debug!(field = %field, seq, latest = state.latest_seq, "stale suggestions discarded");
            return false;
        }

        let content = match result {
            Ok(results) if results.is_empty() => DropdownContent::NoResults,
            Ok(results) => DropdownContent::Results(results),
            Err(e) => {
                tracing::warn!(field = %field, "location search failed: {}", e);
                DropdownContent::Error(e)
            }
        };
        state.dropdown = Dropdown {
            content,
            visible: true,
        };
        true
    }

    /// Click outside the field and its dropdown.
    pub fn on_outside_click(&mut self, field: &FieldId) {
        self.hide(field);
    }

    /// Focus re-opens a dropdown that still has content.
    pub fn on_focus(&mut self, field: &FieldId, raw: &str) -> bool {
        let min_len = self.min_query_len;
        let state = self.state_mut(field);
        if state.dropdown.content.has_content() && raw.chars().count() >= min_len {
            state.dropdown.visible = true;
        }
        state.dropdown.visible
    }

    pub fn hide(&mut self, field: &FieldId) {
        if let Some(state) = self.fields.get_mut(field) {
            state.dropdown.visible = false;
        }
    }

    pub fn dropdown(&self, field: &FieldId) -> Dropdown {
        self.fields
            .get(field)
            .map(|s| s.dropdown.clone())
            .unwrap_or_default()
    }

    /// Suggestion at `index` in the rendered result list.
    pub fn suggestion(&self, field: &FieldId, index: usize) -> Option<Suggestion> {
        match &self.fields.get(field)?.dropdown.content {
            DropdownContent::Results(results) => results.get(index).cloned(),
            _ => None,
        }
    }

    pub fn latest_seq(&self, field: &FieldId) -> u64 {
        self.fields.get(field).map_or(0, |s| s.latest_seq)
    }

    pub fn has_pending(&self, field: &FieldId) -> bool {
        self.fields
            .get(field)
            .and_then(|s| s.pending.as_ref())
            .is_some_and(|h| !h.is_cancelled())
    }
}
