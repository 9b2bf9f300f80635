use std::borrow::Cow;
use std::fmt;

/// Identifier of a location input field.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldId(Cow<'static, str>);

impl FieldId {
    /// Location input of the historical range form
    pub const HISTORY: FieldId = FieldId(Cow::Borrowed("location"));

    /// Location input of the current weather form
    pub const CURRENT: FieldId = FieldId(Cow::Borrowed("current-location"));

    pub fn new(id: impl Into<String>) -> Self {
        Self(Cow::Owned(id.into()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Resolve a field name typed by the user, accepting a few short aliases.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "location" | "history" => Some(Self::HISTORY),
            "current-location" | "current" => Some(Self::CURRENT),
            _ => None,
        }
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
