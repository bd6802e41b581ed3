//! Error types for Scoutline

use std::{error::Error as StdError, fmt};

/// Error shared by the store, the API server and configuration loading
#[derive(Debug)]
pub enum Error {
    /// Filesystem failure, e.g. writing an uploaded media file
    Io(std::io::Error),

    /// Invalid or unreadable configuration
    Configuration {
        /// What is wrong
        message: String,
    },

    /// A single field was rejected
    Validation {
        /// Field name as sent by the client
        field: String,
        /// Human-readable reason
        message: String,
    },

    /// The store failed or returned unusable data
    Database(String),

    /// Media could not be stored
    Storage(String),

    /// Credentials were missing or not accepted
    Authentication(String),

    /// A profile, order or other record does not exist
    NotFound {
        /// Name of the missing record, e.g. `Profile 42`
        resource: String,
    },

    /// JSON could not be encoded or decoded
    Serialization(serde_json::Error),

    /// Anything else
    Other(String),
}

/// Result alias over [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Missing record
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    /// Rejected field
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Whether the error means the record does not exist
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "I/O error: {err}"),
            Self::Configuration { message } => write!(f, "Configuration error: {message}"),
            Self::Validation { field, message } => write!(f, "Invalid {field}: {message}"),
            Self::Database(msg) => write!(f, "Database error: {msg}"),
            Self::Storage(msg) => write!(f, "Media storage error: {msg}"),
            Self::Authentication(msg) => write!(f, "Authentication failed: {msg}"),
            Self::NotFound { resource } => write!(f, "{resource} not found"),
            Self::Serialization(err) => write!(f, "Serialization error: {err}"),
            Self::Other(msg) => f.write_str(msg),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Serialization(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err)
    }
}
