//! Staff accounts

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::traits::{EntityResource, Record};
use crate::types::{FieldError, RecordId};

const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountRole {
    Admin,
    Manager,
    #[default]
    Viewer,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: RecordId,
    pub email: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub role: AccountRole,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Record for Account {
    fn id(&self) -> RecordId {
        self.id
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccountForm {
    pub email: String,
    pub display_name: String,
    pub role: AccountRole,
    /// Empty while editing means "keep the current password"
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAccountRequest {
    pub email: String,
    pub display_name: String,
    pub role: AccountRole,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAccountRequest {
    pub display_name: String,
    pub role: AccountRole,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AccountResource;

impl EntityResource for AccountResource {
    type Entity = Account;
    type FormData = AccountForm;
    type CreateRequest = CreateAccountRequest;
    type UpdateRequest = UpdateAccountRequest;

    fn endpoint(&self) -> &str {
        "accounts"
    }

    fn initial_form(&self) -> AccountForm {
        AccountForm::default()
    }

    fn to_form(&self, account: &Account) -> AccountForm {
        AccountForm {
            email: account.email.clone(),
            display_name: account.display_name.clone(),
            role: account.role,
            password: String::new(),
        }
    }

    fn to_create_request(&self, form: &AccountForm) -> CreateAccountRequest {
        CreateAccountRequest {
            email: form.email.trim().to_lowercase(),
            display_name: form.display_name.trim().to_string(),
            role: form.role,
            password: form.password.clone(),
        }
    }

    /// The email is the login and is never changed through an update.
    fn to_update_request(&self, _target: &Account, form: &AccountForm) -> UpdateAccountRequest {
        UpdateAccountRequest {
            display_name: form.display_name.trim().to_string(),
            role: form.role,
            password: (!form.password.is_empty()).then(|| form.password.clone()),
        }
    }

    fn validate(&self, form: &AccountForm) -> Result<(), FieldError> {
        if !form.email.contains('@') {
            return Err(FieldError::new("email", "Email address is not valid"));
        }
        if !form.password.is_empty() && form.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(FieldError::new(
                "password",
                format!("Password must be at least {MIN_PASSWORD_LEN} characters"),
            ));
        }
        Ok(())
    }

    fn is_blank(&self, form: &AccountForm) -> Option<bool> {
        Some(
            form.email.trim().is_empty()
                && form.display_name.trim().is_empty()
                && form.password.is_empty(),
        )
    }
}
