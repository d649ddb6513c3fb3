//! Type definitions module

mod batch;
mod form;
mod notice;
mod view;

pub use batch::{BatchDeleteFailure, BatchDeleteReport};
pub use form::{FieldError, FormMode, SaveKind};
pub use notice::{ErrorKind, Notice, Operation, PageError, Severity, SideEffectOutcome};
pub use view::PageView;

// Re-export transport types used throughout the controller
pub use staffdesk_transport::{Filters, ListQuery, PaginatedResponse, RecordId};
