//! Unified error type definition

use serde::Serialize;
use thiserror::Error;

// Re-export transport error types
pub use staffdesk_transport::{FailureClass, TransportError};

use crate::types::FieldError;

/// Core layer error type
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "code", content = "details")]
pub enum CoreError {
    /// Local validation rejected the form; nothing was sent
    #[error("{0}")]
    Validation(FieldError),

    /// A save is already in flight
    #[error("A save is already in progress")]
    AlreadySubmitting,

    /// A delete is already in flight
    #[error("A delete is already in progress")]
    AlreadyDeleting,

    /// Save was requested while the form is idle
    #[error("No create or edit in progress")]
    NothingToSave,

    /// A request body could not be encoded, or a response could not be decoded
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Invalid controller configuration
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    /// Transport error (converting from library)
    #[error("{0}")]
    Transport(#[from] TransportError),
}

impl CoreError {
    /// Whether it is expected behavior (user input, expired session, guard rejection),
    /// used for log classification.
    ///
    /// Level `warn` should be used when returning `true` and level `error` when returning `false`.
    /// **Please update this method simultaneously when new variants are added.**
    #[must_use]
    pub fn is_expected(&self) -> bool {
        match self {
            Self::Validation(_)
            | Self::AlreadySubmitting
            | Self::AlreadyDeleting
            | Self::NothingToSave => true,
            Self::Transport(e) => e.is_expected(),
            _ => false,
        }
    }

    /// Whether the page should treat this as an expired session (e.g. prompt to sign in).
    #[must_use]
    pub fn is_session_expired(&self) -> bool {
        matches!(
            self,
            Self::Transport(e) if e.classify() == FailureClass::Unauthorized
        )
    }
}

/// Core layer Result type alias
pub type CoreResult<T> = std::result::Result<T, CoreError>;
