//! Access profiles: named permission sets assigned to accounts

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::traits::{EntityResource, Record};
use crate::types::{FieldError, RecordId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: RecordId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub permissions: Vec<String>,
}

impl Record for Profile {
    fn id(&self) -> RecordId {
        self.id
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileForm {
    pub name: String,
    pub description: String,
    pub permissions: Vec<String>,
}

/// Body of both create and update. Permissions are sent sorted and de-duplicated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub permissions: Vec<String>,
}

impl From<&ProfileForm> for ProfileRequest {
    fn from(form: &ProfileForm) -> Self {
        let description = form.description.trim();
        let permissions: BTreeSet<String> = form
            .permissions
            .iter()
            .map(|p| p.trim())
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .collect();
        Self {
            name: form.name.trim().to_string(),
            description: (!description.is_empty()).then(|| description.to_string()),
            permissions: permissions.into_iter().collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ProfileResource;

impl EntityResource for ProfileResource {
    type Entity = Profile;
    type FormData = ProfileForm;
    type CreateRequest = ProfileRequest;
    type UpdateRequest = ProfileRequest;

    fn endpoint(&self) -> &str {
        "profiles"
    }

    fn initial_form(&self) -> ProfileForm {
        ProfileForm::default()
    }

    fn to_form(&self, profile: &Profile) -> ProfileForm {
        ProfileForm {
            name: profile.name.clone(),
            description: profile.description.clone().unwrap_or_default(),
            permissions: profile.permissions.clone(),
        }
    }

    fn to_create_request(&self, form: &ProfileForm) -> ProfileRequest {
        form.into()
    }

    fn to_update_request(&self, _target: &Profile, form: &ProfileForm) -> ProfileRequest {
        form.into()
    }

    fn validate(&self, form: &ProfileForm) -> Result<(), FieldError> {
        if form.name.trim().is_empty() {
            return Err(FieldError::new("name", "Profile name is required"));
        }
        if form.permissions.iter().all(|p| p.trim().is_empty()) {
            return Err(FieldError::new(
                "permissions",
                "Select at least one permission",
            ));
        }
        Ok(())
    }

    fn is_blank(&self, form: &ProfileForm) -> Option<bool> {
        Some(
            form.name.trim().is_empty()
                && form.description.trim().is_empty()
                && form.permissions.is_empty(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(permissions: &[&str]) -> ProfileForm {
        ProfileForm {
            name: " Scheduler ".to_string(),
            description: String::new(),
            permissions: permissions.iter().map(|p| (*p).to_string()).collect(),
        }
    }

    #[test]
    fn permissions_are_sorted_and_unique() {
        let request = ProfileResource.to_create_request(&form(&[
            "schedules.write",
            " schedules.read",
            "schedules.write",
            "",
        ]));
        assert_eq!(request.name, "Scheduler");
        assert_eq!(request.description, None);
        assert_eq!(
            request.permissions,
            vec!["schedules.read".to_string(), "schedules.write".to_string()]
        );
    }

    #[test]
    fn needs_a_permission() {
        let err = ProfileResource.validate(&form(&["  "])).unwrap_err();
        assert_eq!(err.field, "permissions");
        assert!(ProfileResource.validate(&form(&["demands.read"])).is_ok());
    }

    #[test]
    fn decodes_without_optional_fields() {
        let profile: Profile =
            serde_json::from_value(serde_json::json!({ "id": 9, "name": "Viewer" })).unwrap();
        assert!(profile.permissions.is_empty());
        assert_eq!(ProfileResource.to_form(&profile).description, "");
    }
}
