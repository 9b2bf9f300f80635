//! Centralized error types for the Skylog client.
//!
//! Local validation failures, backend rejections and transport failures are
//! kept apart so each can be worded differently where it is shown.

use thiserror::Error;

/// Top-level application error type. `Display` carries the underlying
/// failure text.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// Error message reported by the backend in an `{"error": ...}` payload.
    #[error("{0}")]
    Backend(String),

    #[error("Error getting location: {0}")]
    Geolocation(String),
}

/// Network-related errors (HTTP, connectivity).
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Server error: {status} - {message}")]
    ServerError { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Form input rejected before any network call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Start date cannot be after end date.")]
    StartAfterEnd,

    #[error("Invalid date: {0}. Use YYYY-MM-DD.")]
    InvalidDate(String),

    #[error("Location is required.")]
    EmptyLocation,
}

/// Extension trait for converting reqwest errors to our error types.
pub trait ReqwestErrorExt {
    fn into_network_error(self) -> NetworkError;
}

impl ReqwestErrorExt for reqwest::Error {
    fn into_network_error(self) -> NetworkError {
        if self.is_timeout() {
            NetworkError::Timeout
        } else if self.is_connect() {
            NetworkError::ConnectionFailed(self.to_string())
        } else if let Some(status) = self.status() {
            NetworkError::ServerError {
                status: status.as_u16(),
                message: self.to_string(),
            }
        } else if self.is_decode() {
            NetworkError::InvalidResponse(self.to_string())
        } else {
            NetworkError::ConnectionFailed(self.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_displays_bare() {
        let app_err: AppError = ValidationError::StartAfterEnd.into();
        assert_eq!(app_err.to_string(), "Start date cannot be after end date.");
    }

    #[test]
    fn test_backend_error_displays_verbatim() {
        let app_err = AppError::Backend("Could not find location: Atlantis".into());
        assert_eq!(app_err.to_string(), "Could not find location: Atlantis");
    }

    #[test]
    fn test_network_error_conversion() {
        let app_err: AppError = NetworkError::Timeout.into();
        assert!(matches!(app_err, AppError::Network(NetworkError::Timeout)));
        assert_eq!(app_err.to_string(), "Network error: Request timed out");
    }

    #[test]
    fn test_server_error_display() {
        let err = NetworkError::ServerError {
            status: 503,
            message: "unavailable".into(),
        };
        assert_eq!(err.to_string(), "Server error: 503 - unavailable");
    }

    #[test]
    fn test_geolocation_error_message() {
        let app_err = AppError::Geolocation("User denied Geolocation".into());
        assert_eq!(
            app_err.to_string(),
            "Error getting location: User denied Geolocation"
        );
    }
}
