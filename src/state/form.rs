//! Add-timer form draft and validation

use serde::{Deserialize, Serialize};

pub const NAME_REQUIRED: &str = "Please enter a timer name.";
pub const DURATION_REQUIRED: &str = "Please enter the duration in seconds.";
pub const DURATION_INVALID: &str = "Duration must be a positive whole number of seconds.";
pub const CATEGORY_REQUIRED: &str = "Please enter a category.";

/// Pending input of the add-timer form. Duration is kept as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerForm {
    pub name: String,
    pub duration: String,
    pub category: String,
    /// Set after a refused submit so the front end can highlight fields
    pub attempted_submit: bool,
}

/// A validated add-timer request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTimer {
    pub name: String,
    pub category: String,
    pub duration: u64,
}

/// Field-level validation messages; `None` means the field is fine
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("invalid timer input")]
pub struct FormErrors {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl FormErrors {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.duration.is_none() && self.category.is_none()
    }
}

impl TimerForm {
    pub fn new(name: impl Into<String>, duration: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            duration: duration.into(),
            category: category.into(),
            attempted_submit: false,
        }
    }

    /// Check every field and either produce a request or the per-field errors
    pub fn validate(&self) -> Result<NewTimer, FormErrors> {
        let mut errors = FormErrors::default();

        let name = self.name.trim();
        if name.is_empty() {
            errors.name = Some(NAME_REQUIRED.to_string());
        }

        let category = self.category.trim();
        if category.is_empty() {
            errors.category = Some(CATEGORY_REQUIRED.to_string());
        }

        let duration = match parse_duration(&self.duration) {
            Ok(seconds) => seconds,
            Err(message) => {
                errors.duration = Some(message.to_string());
                0
            }
        };

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(NewTimer {
            name: name.to_string(),
            category: category.to_string(),
            duration,
        })
    }

    pub(crate) fn clear(&mut self) {
        *self = Self::default();
    }
}

fn parse_duration(raw: &str) -> Result<u64, &'static str> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(DURATION_REQUIRED);
    }
    match raw.parse::<u64>() {
        Ok(0) | Err(_) => Err(DURATION_INVALID),
        Ok(seconds) => Ok(seconds),
    }
}
