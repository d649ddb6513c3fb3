//! Hospitals

use serde::{Deserialize, Serialize};

use crate::traits::{EntityResource, Record};
use crate::types::{FieldError, RecordId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hospital {
    pub id: RecordId,
    pub name: String,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl Record for Hospital {
    fn id(&self) -> RecordId {
        self.id
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HospitalForm {
    pub name: String,
    pub city: String,
    pub active: bool,
}

impl Default for HospitalForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            city: String::new(),
            active: true,
        }
    }
}

/// Body of both create and update; the backend replaces every field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HospitalRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    pub active: bool,
}

impl From<&HospitalForm> for HospitalRequest {
    fn from(form: &HospitalForm) -> Self {
        let city = form.city.trim();
        Self {
            name: form.name.trim().to_string(),
            city: (!city.is_empty()).then(|| city.to_string()),
            active: form.active,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct HospitalResource;

impl EntityResource for HospitalResource {
    type Entity = Hospital;
    type FormData = HospitalForm;
    type CreateRequest = HospitalRequest;
    type UpdateRequest = HospitalRequest;

    fn endpoint(&self) -> &str {
        "hospitals"
    }

    fn initial_form(&self) -> HospitalForm {
        HospitalForm::default()
    }

    fn to_form(&self, hospital: &Hospital) -> HospitalForm {
        HospitalForm {
            name: hospital.name.clone(),
            city: hospital.city.clone().unwrap_or_default(),
            active: hospital.active,
        }
    }

    fn to_create_request(&self, form: &HospitalForm) -> HospitalRequest {
        form.into()
    }

    fn to_update_request(&self, _target: &Hospital, form: &HospitalForm) -> HospitalRequest {
        form.into()
    }

    fn validate(&self, form: &HospitalForm) -> Result<(), FieldError> {
        if form.name.trim().is_empty() {
            return Err(FieldError::new("name", "Hospital name is required"));
        }
        Ok(())
    }

    fn is_blank(&self, form: &HospitalForm) -> Option<bool> {
        Some(form.name.trim().is_empty() && form.city.trim().is_empty())
    }
}
