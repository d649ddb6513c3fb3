//! Follow-up work after a successful save

use async_trait::async_trait;

use crate::types::{SaveKind, SideEffectOutcome};

/// Optional secondary request chained after a save succeeded.
///
/// The outcome goes to the page's notice channel. It never turns the save into a
/// failure and never touches the primary error slot, so implementations report
/// their own failures as [`SideEffectOutcome::Failed`] instead of returning errors.
#[async_trait]
pub trait PostSaveHook<E>: Send + Sync
where
    E: Send + Sync,
{
    /// # Arguments
    /// * `saved` - Record as returned by the backend
    /// * `kind` - Whether the save created or updated the record
    async fn after_save(&self, saved: &E, kind: SaveKind) -> SideEffectOutcome;
}
