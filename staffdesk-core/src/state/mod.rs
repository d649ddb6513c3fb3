//! Pure page state managers
//!
//! None of these perform I/O; the controller owns them and drives the transport.

mod actions;
mod form;
mod pagination;
mod selection;

pub use actions::{Action, ActionInputs, ActionKind, ActionSurface};
pub use form::FormState;
pub use pagination::Pagination;
pub use selection::{Selection, SelectionTarget};
