//! Form related type definitions

use std::fmt;

use serde::{Deserialize, Serialize};

/// Where the form is in its lifecycle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormMode {
    /// No create or edit in progress
    #[default]
    Idle,
    /// Filling in a brand-new record
    Creating,
    /// Editing an existing record
    Editing,
}

impl FormMode {
    pub fn is_idle(self) -> bool {
        self == Self::Idle
    }
}

/// Which kind of save a form submission performs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SaveKind {
    Create,
    Update,
}

/// A validation failure attached to one form field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Field name as the form knows it
    pub field: String,
    /// Message to show next to the field
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}
