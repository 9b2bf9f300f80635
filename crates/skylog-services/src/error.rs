//! Backend client error types.

use skylog_core::{AppError, ConfigError, NetworkError, ReqwestErrorExt};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    /// The backend answered with an `{"error": ...}` payload.
    #[error("{0}")]
    Backend(String),

    #[error(transparent)]
    Network(#[from] NetworkError),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Non-success status without an error payload.
    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        Self::Network(e.into_network_error())
    }
}

impl From<ApiError> for AppError {
    fn from(e: ApiError) -> Self {
        match e {
            ApiError::Backend(msg) => AppError::Backend(msg),
            ApiError::Network(e) => AppError::Network(e),
            ApiError::InvalidResponse(msg) => AppError::Network(NetworkError::InvalidResponse(msg)),
            ApiError::Status { status, message } => {
                AppError::Network(NetworkError::ServerError { status, message })
            }
            ApiError::InvalidUrl(msg) => AppError::Config(ConfigError::Invalid(msg)),
        }
    }
}
