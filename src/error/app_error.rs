//! Unified error type for ratewatch.
//!
//! `AppError` is what flows through every rate and favorites stream. Screens
//! classify it into an auto-retry or a blocking retry state; nothing below
//! the screen layer inspects it beyond propagating it.

use std::fmt;

use super::category::ErrorCategory;
use super::network::NetworkError;
use super::storage::StorageError;

/// Unified error type for ratewatch.
#[derive(Debug, Clone, PartialEq)]
pub enum AppError {
    /// Network-related errors (connections, HTTP, decoding).
    Network(NetworkError),

    /// Favorites/settings persistence errors.
    Storage(StorageError),

    /// Invalid configuration value.
    Configuration { variable: String, message: String },
}

impl AppError {
    /// Get the category of this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            AppError::Network(err) if err.is_server_side() => ErrorCategory::Server,
            AppError::Network(NetworkError::HttpStatus { .. }) => ErrorCategory::Client,
            AppError::Network(_) => ErrorCategory::Network,
            AppError::Storage(_) => ErrorCategory::Storage,
            AppError::Configuration { .. } => ErrorCategory::Configuration,
        }
    }

    /// Check if the underlying operation can be retried as-is.
    pub fn is_retryable(&self) -> bool {
        match self {
            AppError::Network(err) => err.is_retryable(),
            AppError::Storage(_) | AppError::Configuration { .. } => false,
        }
    }

    /// Whether a poll tick that failed with this error should be retried
    /// automatically. Broader than [`AppError::is_retryable`]: a payload that
    /// failed to decode is treated as a transient glitch of the remote source.
    pub fn is_transient(&self) -> bool {
        match self {
            AppError::Network(NetworkError::InvalidResponse { .. }) => true,
            other => other.is_retryable(),
        }
    }

    /// Get a user-friendly error message.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Network(err) => err.user_message(),
            AppError::Storage(err) => err.user_message(),
            AppError::Configuration { variable, message } => {
                format!("Invalid value for {}: {}", variable, message)
            }
        }
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::Network(err) => err.error_code(),
            AppError::Storage(err) => err.error_code(),
            AppError::Configuration { .. } => "E_CONFIG",
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Network(err) => write!(f, "{}", err),
            AppError::Storage(err) => write!(f, "{}", err),
            AppError::Configuration { variable, message } => {
                write!(f, "Configuration error in {}: {}", variable, message)
            }
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Network(err) => Some(err),
            AppError::Storage(err) => Some(err),
            AppError::Configuration { .. } => None,
        }
    }
}

impl From<NetworkError> for AppError {
    fn from(err: NetworkError) -> Self {
        AppError::Network(err)
    }
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        AppError::Storage(err)
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        let url = err
            .url()
            .map(|u| u.to_string())
            .unwrap_or_else(|| "unknown".to_string());
        AppError::Network(super::network::classify_reqwest_error(&err, &url))
    }
}
