pub mod field;
pub mod form;
pub mod history_store;
pub mod resolver;
pub mod selection_cache;
pub mod suggestions;

pub use field::FieldId;
pub use form::{validate_date_range, validate_location, UpdateDraft};
pub use history_store::HistoryStore;
pub use resolver::LocationResolver;
pub use selection_cache::LocationSelectionCache;
pub use suggestions::{Dropdown, DropdownContent, InputOutcome, SuggestionFetcher};
