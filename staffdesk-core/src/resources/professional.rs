//! Professionals

use serde::{Deserialize, Serialize};

use crate::traits::{EntityResource, Record};
use crate::types::{FieldError, RecordId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Professional {
    pub id: RecordId,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub specialty: Option<String>,
    #[serde(default)]
    pub license_number: Option<String>,
}

impl Record for Professional {
    fn id(&self) -> RecordId {
        self.id
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfessionalForm {
    pub name: String,
    pub email: String,
    pub specialty: String,
    pub license_number: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfessionalRequest {
    pub name: String,
    pub email: String,
    pub specialty: Option<String>,
    pub license_number: Option<String>,
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

impl From<&ProfessionalForm> for ProfessionalRequest {
    fn from(form: &ProfessionalForm) -> Self {
        Self {
            name: form.name.trim().to_string(),
            email: form.email.trim().to_lowercase(),
            specialty: non_empty(&form.specialty),
            license_number: non_empty(&form.license_number),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ProfessionalResource;

impl EntityResource for ProfessionalResource {
    type Entity = Professional;
    type FormData = ProfessionalForm;
    type CreateRequest = ProfessionalRequest;
    type UpdateRequest = ProfessionalRequest;

    fn endpoint(&self) -> &str {
        "professionals"
    }

    fn initial_form(&self) -> ProfessionalForm {
        ProfessionalForm::default()
    }

    fn to_form(&self, professional: &Professional) -> ProfessionalForm {
        ProfessionalForm {
            name: professional.name.clone(),
            email: professional.email.clone(),
            specialty: professional.specialty.clone().unwrap_or_default(),
            license_number: professional.license_number.clone().unwrap_or_default(),
        }
    }

    fn to_create_request(&self, form: &ProfessionalForm) -> ProfessionalRequest {
        form.into()
    }

    fn to_update_request(
        &self,
        _target: &Professional,
        form: &ProfessionalForm,
    ) -> ProfessionalRequest {
        form.into()
    }

    fn validate(&self, form: &ProfessionalForm) -> Result<(), FieldError> {
        if form.name.trim().is_empty() {
            return Err(FieldError::new("name", "Name is required"));
        }
        let email = form.email.trim();
        if email.is_empty() {
            return Err(FieldError::new("email", "Email is required"));
        }
        if !email.contains('@') {
            return Err(FieldError::new("email", "Email address is not valid"));
        }
        Ok(())
    }

    fn is_blank(&self, form: &ProfessionalForm) -> Option<bool> {
        Some(
            [
                &form.name,
                &form.email,
                &form.specialty,
                &form.license_number,
            ]
            .iter()
            .all(|field| field.trim().is_empty()),
        )
    }
}
