//! User-facing error and notice types

use serde::{Deserialize, Serialize};
use staffdesk_transport::TransportError;

use crate::error::CoreError;

/// The controller operation an error came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Operation {
    Load,
    Save,
    Delete,
    ResolveTargets,
}

impl Operation {
    /// Generic message used when the backend gave nothing more specific
    pub fn fallback_message(self) -> &'static str {
        match self {
            Self::Load => "Failed to load records",
            Self::Save => "Failed to save record",
            Self::Delete => "Failed to delete records",
            Self::ResolveTargets => "Failed to collect the records to delete",
        }
    }
}

/// Error taxonomy the presentation layer branches on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorKind {
    /// Local validation; never reached the transport
    Validation,
    /// Network or timeout; retryable
    Connectivity,
    /// HTTP 401; the page may escalate to a sign-in prompt
    SessionExpired,
    /// HTTP 403
    Forbidden,
    /// Any other backend or decoding failure
    Backend,
    /// A bulk delete stopped part-way
    PartialBatch,
}

/// The primary error slot of a page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageError {
    pub operation: Operation,
    pub kind: ErrorKind,
    /// Message shown verbatim
    pub message: String,
}

impl PageError {
    /// Convert an operation failure into the message a user sees.
    ///
    /// The backend's own message wins when it sent one; otherwise the message is the
    /// operation's fallback plus whatever the transport knows (e.g. `HTTP error 500`).
    pub fn from_error(operation: Operation, error: &CoreError) -> Self {
        let fallback = operation.fallback_message();
        let (kind, message) = match error {
            CoreError::Validation(field_error) => (ErrorKind::Validation, field_error.to_string()),
            CoreError::Transport(e) => match e {
                TransportError::Unauthorized { .. } => (
                    ErrorKind::SessionExpired,
                    "Your session has expired. Please sign in again.".to_string(),
                ),
                TransportError::Forbidden { message } => (
                    ErrorKind::Forbidden,
                    message.clone().unwrap_or_else(|| {
                        format!("{fallback}: you do not have permission")
                    }),
                ),
                e if e.is_connectivity() => (
                    ErrorKind::Connectivity,
                    format!(
                        "{fallback}: could not reach the server. Check your connection and try again."
                    ),
                ),
                e => (
                    ErrorKind::Backend,
                    e.backend_message()
                        .map_or_else(|| format!("{fallback}: {e}"), str::to_string),
                ),
            },
            other => (ErrorKind::Backend, format!("{fallback}: {other}")),
        };
        Self {
            operation,
            kind,
            message,
        }
    }

    pub fn is_session_expired(&self) -> bool {
        self.kind == ErrorKind::SessionExpired
    }
}

/// Severity of a side-channel notice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Warning,
}

/// A message on the side channel, independent of the primary error slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub severity: Severity,
    pub message: String,
}

/// Result of an optional follow-up request chained after a successful save
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "message", rename_all = "lowercase")]
pub enum SideEffectOutcome {
    /// The hook decided there was nothing to do
    Skipped,
    Succeeded(String),
    Failed(String),
}

impl SideEffectOutcome {
    /// Side-channel notice for this outcome, if any
    pub fn to_notice(&self) -> Option<Notice> {
        match self {
            Self::Skipped => None,
            Self::Succeeded(message) => Some(Notice {
                severity: Severity::Success,
                message: message.clone(),
            }),
            Self::Failed(message) => Some(Notice {
                severity: Severity::Warning,
                message: message.clone(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FieldError;

    #[test]
    fn backend_message_is_verbatim() {
        let err = CoreError::Transport(TransportError::Http {
            status: 409,
            message: Some("Professional already belongs to this hospital".to_string()),
        });
        let page_error = PageError::from_error(Operation::Save, &err);
        assert_eq!(page_error.kind, ErrorKind::Backend);
        assert_eq!(
            page_error.message,
            "Professional already belongs to this hospital"
        );
    }

    #[test]
    fn status_fallback_is_keyed_to_operation() {
        let err = CoreError::Transport(TransportError::Http {
            status: 500,
            message: None,
        });
        let page_error = PageError::from_error(Operation::Load, &err);
        assert_eq!(page_error.message, "Failed to load records: HTTP error 500");
    }

    #[test]
    fn unauthorized_is_session_expired() {
        let err = CoreError::Transport(TransportError::Unauthorized { message: None });
        let page_error = PageError::from_error(Operation::Delete, &err);
        assert!(page_error.is_session_expired());
    }

    #[test]
    fn forbidden_prefers_backend_message() {
        let err = CoreError::Transport(TransportError::Forbidden {
            message: Some("Only coordinators can remove memberships".to_string()),
        });
        let page_error = PageError::from_error(Operation::Delete, &err);
        assert_eq!(page_error.kind, ErrorKind::Forbidden);
        assert_eq!(page_error.message, "Only coordinators can remove memberships");

        let err = CoreError::Transport(TransportError::Forbidden { message: None });
        let page_error = PageError::from_error(Operation::Save, &err);
        assert_eq!(page_error.kind, ErrorKind::Forbidden);
        assert_eq!(
            page_error.message,
            "Failed to save record: you do not have permission"
        );
        assert!(!page_error.is_session_expired());
    }

    #[test]
    fn network_is_connectivity() {
        let err = CoreError::Transport(TransportError::Timeout {
            detail: "30s elapsed".to_string(),
        });
        let page_error = PageError::from_error(Operation::Save, &err);
        assert_eq!(page_error.kind, ErrorKind::Connectivity);
        assert!(page_error.message.starts_with("Failed to save record"));
    }

    #[test]
    fn validation_keeps_field() {
        let err = CoreError::Validation(FieldError::new("email", "is required"));
        let page_error = PageError::from_error(Operation::Save, &err);
        assert_eq!(page_error.kind, ErrorKind::Validation);
        assert_eq!(page_error.message, "email: is required");
    }

    #[test]
    fn side_effect_notices() {
        assert_eq!(SideEffectOutcome::Skipped.to_notice(), None);
        let failed = SideEffectOutcome::Failed("Invite could not be sent".to_string());
        assert_eq!(
            failed.to_notice().map(|n| n.severity),
            Some(Severity::Warning)
        );
    }
}
