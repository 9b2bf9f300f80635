//! Location resolution and form coordination for the Skylog client.
//!
//! All state is owned by a [`FormCoordinator`]; network work is spawned onto
//! tokio and reported back as [`ServiceMessage`]s that the coordinator applies
//! one at a time.

pub mod coordinator;
pub mod error_mapping;
pub mod models;
pub mod scheduler;
pub mod services;
pub mod view;

pub use coordinator::FormCoordinator;
pub use models::{
    validate_date_range, validate_location, Dropdown, DropdownContent, FieldId, HistoryStore,
    InputOutcome, LocationResolver, LocationSelectionCache, SuggestionFetcher, UpdateDraft,
};
pub use scheduler::{ManualScheduler, Scheduler, TaskHandle, TokioScheduler};
pub use services::ServiceMessage;
pub use view::{dropdown_status, HistoryRow, Notice, NoticeKind, PanelState, RecordDetails, View};
