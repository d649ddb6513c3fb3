//! Per-resource mapping trait

use std::fmt::Debug;

use serde::Serialize;

use super::Record;
use crate::types::FieldError;

/// Everything the generic controller needs to know about one resource type.
///
/// Implementations are plain mappings with no I/O. The controller is generic over
/// this trait, so each page keeps compile-time shapes for its entity, form and
/// request bodies.
///
/// Implementations:
/// - `HospitalResource`, `ProfessionalResource`, `MembershipResource`, `AccountResource`
pub trait EntityResource: Send + Sync + 'static {
    /// Record as returned by the list/create/update endpoints
    type Entity: Record;
    /// Values the create/edit form works on
    type FormData: Clone + PartialEq + Debug + Send + Sync + 'static;
    /// Body of the create request
    type CreateRequest: Serialize + Send;
    /// Body of the update request
    type UpdateRequest: Serialize + Send;

    /// Path of the list endpoint relative to the API base, e.g. `hospitals`
    fn endpoint(&self) -> &str;

    /// Blank form used for every new record
    fn initial_form(&self) -> Self::FormData;

    /// Map a record to form values when editing starts
    fn to_form(&self, entity: &Self::Entity) -> Self::FormData;

    fn to_create_request(&self, form: &Self::FormData) -> Self::CreateRequest;

    /// # Arguments
    /// * `target` - The record being edited
    /// * `form` - Current form values
    fn to_update_request(
        &self,
        target: &Self::Entity,
        form: &Self::FormData,
    ) -> Self::UpdateRequest;

    /// Reject the form before anything is sent. Accepts everything by default.
    fn validate(&self, _form: &Self::FormData) -> Result<(), FieldError> {
        Ok(())
    }

    /// Blank-form override for dirty checks while creating.
    ///
    /// `Some(true)` means nothing recognizable has been entered. The default `None`
    /// falls back to comparing against the initial values.
    fn is_blank(&self, _form: &Self::FormData) -> Option<bool> {
        None
    }
}
