//! Text shown for failed actions.
//!
//! Backend client errors convert into [`AppError`] via `From`; this module
//! decides how each kind is worded in the result areas.

use skylog_core::AppError;

/// Backend messages verbatim, anything else prefixed with `Error: ` and the
/// underlying failure.
pub fn display_message(e: &AppError) -> String {
    match e {
        AppError::Backend(msg) => msg.clone(),
        AppError::Validation(v) => v.to_string(),
        AppError::Geolocation(_) => e.to_string(),
        other => format!("Error: {}", other),
    }
}

/// Every message gets the `Error: ` prefix. Used by the history form and the edit modal.
pub fn prefixed_message(e: &AppError) -> String {
    match e {
        AppError::Backend(msg) => format!("Error: {}", msg),
        AppError::Validation(v) => format!("Error: {}", v),
        other => display_message(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skylog_core::{NetworkError, ValidationError};
    use skylog_services::ApiError;

    #[test]
    fn backend_error_keeps_message() {
        let app: AppError = ApiError::Backend("Invalid location".into()).into();
        assert!(matches!(app, AppError::Backend(ref m) if m == "Invalid location"));
        assert_eq!(display_message(&app), "Invalid location");
        assert_eq!(prefixed_message(&app), "Error: Invalid location");
    }

    #[test]
    fn transport_error_is_prefixed() {
        let app: AppError = ApiError::Network(NetworkError::Timeout).into();
        assert_eq!(display_message(&app), "Error: Network error: Request timed out");
    }

    #[test]
    fn validation_and_geolocation_are_not_prefixed() {
        let app = AppError::Validation(ValidationError::StartAfterEnd);
        assert_eq!(display_message(&app), "Start date cannot be after end date.");
        assert_eq!(
            prefixed_message(&app),
            "Error: Start date cannot be after end date."
        );

        let app = AppError::Geolocation("User denied Geolocation".into());
        assert_eq!(
            display_message(&app),
            "Error getting location: User denied Geolocation"
        );
    }
}
