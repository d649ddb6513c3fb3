//! Service layer module
//!
//! The loader and executor talk to the transport; the controller composes them with
//! the pure state managers into one entity page.

mod controller;
mod list_loader;
mod mutation_executor;

pub use controller::EntityPageController;
pub use list_loader::{ListLoader, ListState, LoadOutcome, LoadTicket};
pub use mutation_executor::MutationExecutor;
