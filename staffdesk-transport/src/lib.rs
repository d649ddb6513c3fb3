//! # staffdesk-transport
//!
//! The authenticated round trip behind every staffdesk entity page.
//!
//! The [`Transport`] trait is the only thing the controller core depends on: list a
//! filtered window, create, update and delete records by integer id. Every failure is a
//! [`TransportError`], which callers collapse into a [`FailureClass`] to decide between
//! a session-expired prompt, a permission message and everything else.
//!
//! [`HttpTransport`] is the production implementation:
//!
//! ```rust,no_run
//! use staffdesk_transport::{HttpTransport, HttpTransportConfig, ListQuery, Transport};
//!
//! # async fn example() -> staffdesk_transport::Result<()> {
//! let mut config = HttpTransportConfig::new("https://api.example.com/v1/");
//! config.bearer_token = Some("session-token".to_string());
//! config.tenant = Some("north-clinic".to_string());
//!
//! let transport = HttpTransport::new(&config)?;
//! let page = transport.list("hospitals", &ListQuery::default()).await?;
//! println!("{} of {} hospitals", page.items.len(), page.total);
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! - [`TransportError::Unauthorized`]: HTTP 401, classified as session expired
//! - [`TransportError::Forbidden`]: HTTP 403
//! - [`TransportError::Http`]: any other non-2xx, carrying the backend's message when
//!   the body has one and displaying as `HTTP error <status>` otherwise
//! - [`TransportError::Network`] / [`TransportError::Timeout`]: connectivity
//!
//! Idempotent calls (list, delete) retry transient failures with exponential backoff.

mod error;
mod http_client;
mod http_transport;
mod traits;
mod types;

pub use error::{FailureClass, Result, TransportError};
pub use http_client::HttpUtils;
pub use http_transport::{HttpTransport, HttpTransportConfig, TENANT_HEADER};
pub use traits::Transport;
pub use types::{Filters, ListQuery, PaginatedResponse, RecordId};
