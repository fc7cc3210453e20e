//! Error types for the Lantern client.

use serde::Serialize;
use thiserror::Error;

/// A shared error type for the entire Lantern client.
///
/// This provides typed, structured error variants with automatic conversion
/// from common error types via the `From` trait. Errors cross the IPC
/// boundary to the presentation shell, hence `Serialize`. User cancellation
/// of a chat turn is intentionally NOT an error; it is modeled as a turn
/// outcome.
#[derive(Error, Debug, Clone, Serialize)]
pub enum LanternError {
    /// The backend answered with a non-success status
    #[error("Backend error ({status}): {message}")]
    Gateway { status: u16, message: String },

    /// The request never produced a response (connection refused, timeout, ...)
    #[error("Network error: {0}")]
    Network(String),

    /// A wire body could not be decoded
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    /// Entity not found with type information
    #[error("Entity not found: {entity_type} '{id}'")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// Blank chat input or rename text, rejected before any backend call
    #[error("Input is empty")]
    EmptyInput,

    /// A chat turn is already in flight; concurrent sends are not queued
    #[error("A chat turn is already in flight")]
    TurnInFlight,

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl LanternError {
    /// Creates a Gateway error
    pub fn gateway(status: u16, message: impl Into<String>) -> Self {
        Self::Gateway {
            status,
            message: message.into(),
        }
    }

    /// Creates a Network error
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Creates a NotFound error
    pub fn not_found(entity_type: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity_type,
            id: id.to_string(),
        }
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Check if this is a NotFound error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this error was rejected locally, before any backend call.
    ///
    /// Local rejections (blank input, a turn already in flight) carry no
    /// user-visible notice; the UI only disables the action.
    pub fn is_local_rejection(&self) -> bool {
        matches!(self, Self::EmptyInput | Self::TurnInFlight)
    }
}

impl From<reqwest::Error> for LanternError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Serialization {
                message: err.to_string(),
            }
        } else {
            Self::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for LanternError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, LanternError>`.
pub type Result<T> = std::result::Result<T, LanternError>;
