//! Local persistence errors.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the favorites and settings stores.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum StorageError {
    /// Could not determine a home directory for the default data dir.
    #[error("Could not determine home directory for the data directory")]
    NoDataDirectory,

    /// Reading or writing a store file failed.
    #[error("I/O error during {operation} on '{}': {message}", path.display())]
    Io {
        operation: String,
        path: PathBuf,
        message: String,
    },

    /// A store file holds content that does not deserialize.
    #[error("Corrupt store file '{}': {message}", path.display())]
    Corrupt { path: PathBuf, message: String },

    /// A stored value is not one the application understands.
    #[error("Invalid stored value for '{key}': {value}")]
    InvalidValue { key: String, value: String },
}

impl StorageError {
    /// Build an I/O error for the given operation and file.
    pub fn io(operation: &str, path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        StorageError::Io {
            operation: operation.to_string(),
            path: path.into(),
            message: err.to_string(),
        }
    }

    /// Get a user-friendly error message.
    pub fn user_message(&self) -> String {
        match self {
            StorageError::NoDataDirectory => {
                "Could not find a place to store favorites. Set RATEWATCH_DATA_DIR.".to_string()
            }
            StorageError::Io { path, .. } => {
                format!("Could not access '{}'.", path.display())
            }
            StorageError::Corrupt { path, .. } => {
                format!(
                    "The file '{}' is damaged. Remove it to start fresh.",
                    path.display()
                )
            }
            StorageError::InvalidValue { key, .. } => {
                format!("The stored '{}' setting is not recognised.", key)
            }
        }
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            StorageError::NoDataDirectory => "E_STORE_NODIR",
            StorageError::Io { .. } => "E_STORE_IO",
            StorageError::Corrupt { .. } => "E_STORE_CORRUPT",
            StorageError::InvalidValue { .. } => "E_STORE_VALUE",
        }
    }
}
