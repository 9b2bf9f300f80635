use skylog_services::LocationQuery;

use super::{FieldId, LocationSelectionCache};

/// Chooses between a cached structured selection and the raw field text.
pub struct LocationResolver;

impl LocationResolver {
    /// Coordinates when the field holds a selection with both halves present,
    /// otherwise the raw text untouched. Does not mutate the cache.
    pub fn resolve(cache: &LocationSelectionCache, field: &FieldId, raw: &str) -> LocationQuery {
        match cache.get(field).and_then(|s| s.coordinates()) {
            Some((latitude, longitude)) => LocationQuery::coordinates(latitude, longitude),
            None => LocationQuery::text(raw),
        }
    }
}
