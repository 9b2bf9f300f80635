//! Last explicitly picked suggestion per input field.

use std::collections::HashMap;

use skylog_services::Suggestion;

use super::FieldId;

/// Per-field store of structured selections.
///
/// An entry exists only between a pick and the next keystroke (or a
/// successful submit) on the same field.
#[derive(Debug, Default)]
pub struct LocationSelectionCache {
    selections: HashMap<FieldId, Suggestion>,
}

impl LocationSelectionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a user pick. Never called from a fetch completion.
    pub fn set(&mut self, field: FieldId, suggestion: Suggestion) {
        tracing::debug!("Selected '{}' for {}", suggestion.display_name, field);
        self.selections.insert(field, suggestion);
    }

    pub fn clear(&mut self, field: &FieldId) -> Option<Suggestion> {
        self.selections.remove(field)
    }

    pub fn get(&self, field: &FieldId) -> Option<&Suggestion> {
        self.selections.get(field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn suggestion(name: &str, lat: Option<f64>, lon: Option<f64>) -> Suggestion {
        Suggestion {
            name: name.to_string(),
            country: "Testland".to_string(),
            display_name: format!("{}, Testland", name),
            latitude: lat,
            longitude: lon,
            admin1: String::new(),
            id: None,
        }
    }

    #[test]
    fn set_get_clear() {
        let mut cache = LocationSelectionCache::new();
        cache.set(FieldId::CURRENT, suggestion("Paris", Some(48.85), Some(2.35)));

        assert_eq!(cache.get(&FieldId::CURRENT).unwrap().name, "Paris");
        assert!(cache.get(&FieldId::HISTORY).is_none());

        let removed = cache.clear(&FieldId::CURRENT);
        assert!(removed.is_some());
        assert!(cache.get(&FieldId::CURRENT).is_none());
    }

    #[test]
    fn fields_are_independent() {
        let mut cache = LocationSelectionCache::new();
        cache.set(FieldId::CURRENT, suggestion("Paris", Some(48.85), Some(2.35)));
        cache.set(FieldId::HISTORY, suggestion("Rome", Some(41.9), Some(12.5)));

        cache.clear(&FieldId::HISTORY);

        assert!(cache.get(&FieldId::CURRENT).is_some());
        assert!(cache.get(&FieldId::HISTORY).is_none());
    }

    #[test]
    fn later_pick_replaces_earlier() {
        let mut cache = LocationSelectionCache::new();
        cache.set(FieldId::CURRENT, suggestion("Paris", Some(48.85), Some(2.35)));
        cache.set(FieldId::CURRENT, suggestion("Lyon", Some(45.76), Some(4.83)));

        assert_eq!(cache.get(&FieldId::CURRENT).unwrap().name, "Lyon");
    }
}
