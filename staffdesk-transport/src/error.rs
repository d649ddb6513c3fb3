use serde::{Deserialize, Serialize};

/// Unified error type for every transport round trip.
///
/// All variants are serializable for structured error reporting.
///
/// # Retryable Errors
///
/// The following represent transient failures that may succeed on retry:
/// - [`Network`](Self::Network): connection refused, DNS failure, reset
/// - [`Timeout`](Self::Timeout): request timed out
/// - [`Http`](Self::Http) with status 429, 502, 503 or 504
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "code")]
pub enum TransportError {
    /// The request never produced an HTTP response.
    Network {
        /// Error details.
        detail: String,
    },

    /// The request timed out.
    Timeout {
        /// Error details.
        detail: String,
    },

    /// HTTP 401: the session or token is no longer accepted.
    Unauthorized {
        /// Message from the response body, if any.
        message: Option<String>,
    },

    /// HTTP 403: authenticated but not allowed.
    Forbidden {
        /// Message from the response body, if any.
        message: Option<String>,
    },

    /// Any other non-2xx response.
    Http {
        /// HTTP status code.
        status: u16,
        /// Message extracted from the response body, if the backend supplied one.
        message: Option<String>,
    },

    /// A 2xx response whose body could not be decoded.
    Parse {
        /// Details about the parse failure.
        detail: String,
    },

    /// The transport itself is misconfigured (bad base URL, unusable header value).
    InvalidConfig {
        /// What is wrong.
        detail: String,
    },
}

impl std::fmt::Display for TransportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Network { detail } => write!(f, "Network error: {detail}"),
            Self::Timeout { detail } => write!(f, "Request timeout: {detail}"),
            Self::Unauthorized { message } => {
                write!(f, "{}", message.as_deref().unwrap_or("Session expired"))
            }
            Self::Forbidden { message } => {
                write!(f, "{}", message.as_deref().unwrap_or("Permission denied"))
            }
            Self::Http { status, message } => {
                if let Some(msg) = message {
                    write!(f, "{msg}")
                } else {
                    write!(f, "HTTP error {status}")
                }
            }
            Self::Parse { detail } => write!(f, "Parse error: {detail}"),
            Self::InvalidConfig { detail } => write!(f, "Invalid transport config: {detail}"),
        }
    }
}

impl std::error::Error for TransportError {}

/// Coarse classification of a failure, which is all the controller branches on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "message")]
pub enum FailureClass {
    /// Session expired; the page may prompt for a new sign-in.
    Unauthorized,
    /// Permission denied.
    Forbidden,
    /// Everything else, with the most specific message available.
    Other(String),
}

impl TransportError {
    /// Collapse into the three-way classification the controller consumes.
    pub fn classify(&self) -> FailureClass {
        match self {
            Self::Unauthorized { .. } => FailureClass::Unauthorized,
            Self::Forbidden { .. } => FailureClass::Forbidden,
            other => FailureClass::Other(other.to_string()),
        }
    }

    /// Message supplied by the backend itself, if any.
    pub fn backend_message(&self) -> Option<&str> {
        match self {
            Self::Unauthorized { message }
            | Self::Forbidden { message }
            | Self::Http { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    /// HTTP status carried by the error, if the request got that far.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized { .. } => Some(401),
            Self::Forbidden { .. } => Some(403),
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the failure never reached (or never heard back from) the backend.
    pub fn is_connectivity(&self) -> bool {
        matches!(self, Self::Network { .. } | Self::Timeout { .. })
    }

    /// Network errors, timeouts, rate limiting and gateway errors are worth retrying.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network { .. } | Self::Timeout { .. } => true,
            Self::Http { status, .. } => matches!(status, 429 | 502..=504),
            _ => false,
        }
    }

    /// Whether this is expected behavior (bad input, expired session, missing record),
    /// used to pick the log level.
    ///
    /// Level `warn` should be used when returning `true` and level `error` otherwise.
    /// **Please update this method when new variants are added.**
    pub fn is_expected(&self) -> bool {
        match self {
            Self::Unauthorized { .. } | Self::Forbidden { .. } => true,
            Self::Http { status, .. } => (400..500).contains(status),
            _ => false,
        }
    }
}

/// Convenience type alias for `Result<T, TransportError>`.
pub type Result<T> = std::result::Result<T, TransportError>;
