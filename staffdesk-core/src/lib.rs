//! Staffdesk Core Library
//!
//! The generic entity-page controller shared by every list-of-records page:
//! - Pagination, selection and form state (pure state managers)
//! - List loading with a staleness guard
//! - Create/update and chunked bulk delete, including "every record matching the
//!   filters"
//! - The derived action bar
//!
//! Each backend collection plugs in through [`EntityResource`]; the network is
//! abstracted behind [`Transport`](staffdesk_transport::Transport).
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use staffdesk_core::resources::ProfessionalResource;
//! use staffdesk_core::{ControllerConfig, EntityPageController};
//! use staffdesk_transport::{HttpTransport, HttpTransportConfig};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let transport = HttpTransport::new(&HttpTransportConfig::new("https://api.example.com"))?;
//! let page = EntityPageController::new(
//!     ProfessionalResource,
//!     Arc::new(transport),
//!     ControllerConfig::default(),
//! )?;
//!
//! page.reload().await;
//! page.toggle_all().await;
//! let report = page.delete_selected().await?;
//! println!("deleted {} records", report.deleted_count());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod resources;
pub mod services;
pub mod state;
pub mod traits;
pub mod types;

#[cfg(test)]
mod test_utils;

// Re-export common types
pub use config::ControllerConfig;
pub use error::{CoreError, CoreResult};
pub use services::{EntityPageController, LoadOutcome};
pub use state::{ActionKind, ActionSurface, Pagination, Selection, SelectionTarget};
pub use traits::{EntityResource, PostSaveHook, Record};
pub use types::{BatchDeleteReport, Notice, PageError, PageView};
