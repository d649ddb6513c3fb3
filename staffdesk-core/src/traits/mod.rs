//! Resource and collaborator abstraction traits

mod post_save_hook;
mod record;
mod resource;

pub use post_save_hook::PostSaveHook;
pub use record::Record;
pub use resource::EntityResource;

pub use staffdesk_transport::Transport;
