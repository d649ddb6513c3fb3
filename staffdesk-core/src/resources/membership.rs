//! Hospital memberships and the invite sent after one is created

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::traits::{EntityResource, PostSaveHook, Record, Transport};
use crate::types::{FieldError, RecordId, SaveKind, SideEffectOutcome};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MembershipRole {
    #[default]
    Staff,
    Coordinator,
    Admin,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MembershipStatus {
    #[default]
    Pending,
    Active,
    Revoked,
}

/// A professional's link to one hospital
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Membership {
    pub id: RecordId,
    pub hospital_id: RecordId,
    pub professional_id: RecordId,
    #[serde(default)]
    pub role: MembershipRole,
    #[serde(default)]
    pub status: MembershipStatus,
}

impl Record for Membership {
    fn id(&self) -> RecordId {
        self.id
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MembershipForm {
    pub hospital_id: Option<RecordId>,
    pub professional_id: Option<RecordId>,
    pub role: MembershipRole,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMembershipRequest {
    pub hospital_id: RecordId,
    pub professional_id: RecordId,
    pub role: MembershipRole,
}

/// Only the role of an existing membership may change
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdateMembershipRequest {
    pub role: MembershipRole,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MembershipResource;

impl EntityResource for MembershipResource {
    type Entity = Membership;
    type FormData = MembershipForm;
    type CreateRequest = CreateMembershipRequest;
    type UpdateRequest = UpdateMembershipRequest;

    fn endpoint(&self) -> &str {
        "memberships"
    }

    fn initial_form(&self) -> MembershipForm {
        MembershipForm::default()
    }

    fn to_form(&self, membership: &Membership) -> MembershipForm {
        MembershipForm {
            hospital_id: Some(membership.hospital_id),
            professional_id: Some(membership.professional_id),
            role: membership.role,
        }
    }

    /// Call [`validate`](EntityResource::validate) first; missing ids become 0.
    fn to_create_request(&self, form: &MembershipForm) -> CreateMembershipRequest {
        CreateMembershipRequest {
            hospital_id: form.hospital_id.unwrap_or_default(),
            professional_id: form.professional_id.unwrap_or_default(),
            role: form.role,
        }
    }

    fn to_update_request(
        &self,
        _target: &Membership,
        form: &MembershipForm,
    ) -> UpdateMembershipRequest {
        UpdateMembershipRequest { role: form.role }
    }

    fn validate(&self, form: &MembershipForm) -> Result<(), FieldError> {
        if form.hospital_id.is_none() {
            return Err(FieldError::new("hospitalId", "Select a hospital"));
        }
        if form.professional_id.is_none() {
            return Err(FieldError::new("professionalId", "Select a professional"));
        }
        Ok(())
    }

    fn is_blank(&self, form: &MembershipForm) -> Option<bool> {
        Some(form.hospital_id.is_none() && form.professional_id.is_none())
    }
}

/// Sends the membership invite once a membership has been created.
///
/// Updates are skipped. A failed invite leaves the membership in place and is
/// reported as a warning.
pub struct MembershipInviteHook {
    transport: Arc<dyn Transport>,
}

impl MembershipInviteHook {
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    fn invite_endpoint(membership_id: RecordId) -> String {
        format!("memberships/{membership_id}/invite")
    }
}

#[async_trait]
impl PostSaveHook<Membership> for MembershipInviteHook {
    async fn after_save(&self, saved: &Membership, kind: SaveKind) -> SideEffectOutcome {
        if kind != SaveKind::Create {
            return SideEffectOutcome::Skipped;
        }
        let endpoint = Self::invite_endpoint(saved.id);
        match self
            .transport
            .create(&endpoint, Value::Object(serde_json::Map::new()))
            .await
        {
            Ok(_) => {
                log::info!("Invite sent for membership {}", saved.id);
                SideEffectOutcome::Succeeded("Invite sent".to_string())
            }
            Err(e) => {
                log::warn!("Invite for membership {} failed: {e}", saved.id);
                SideEffectOutcome::Failed(format!(
                    "Membership saved, but the invite could not be sent: {e}"
                ))
            }
        }
    }
}
