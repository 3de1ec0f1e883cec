//! Field validation for submitted forms

use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;

pub const REQUIRED: &str = "This field is required.";

/// A single rejected form field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Errors collected while validating one form, in field order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.push(FieldError {
            field,
            message: message.into(),
        });
    }

    /// Record the error of a field check, if any
    pub fn check(&mut self, field: &'static str, result: Result<(), String>) {
        if let Err(message) = result {
            self.push(field, message);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn has(&self, field: &str) -> bool {
        self.0.iter().any(|e| e.field == field)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }
}

/// Validate a mandatory text field with a length cap in characters
pub fn validate_required(value: &str, max_chars: usize) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(REQUIRED.to_string());
    }
    validate_max_length(value, max_chars)
}

/// Validate an optional text field's length in characters
pub fn validate_max_length(value: &str, max_chars: usize) -> Result<(), String> {
    let count = value.chars().count();
    if count > max_chars {
        return Err(format!(
            "Ensure this value has at most {} characters (it has {}).",
            max_chars, count
        ));
    }
    Ok(())
}

/// Validate username
pub fn validate_username(username: &str) -> Result<(), String> {
    validate_required(username, 150)?;

    static USERNAME_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = USERNAME_REGEX
        .get_or_init(|| Regex::new(r"^[\w.@+-]+$").expect("Failed to compile username regex"));

    if !regex.is_match(username) {
        return Err("Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters.".to_string());
    }

    Ok(())
}

/// Validate an optional email address
pub fn validate_email(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Ok(());
    }

    validate_max_length(email, 254)?;

    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
            .expect("Failed to compile email regex")
    });

    if !regex.is_match(email) {
        return Err("Enter a valid email address.".to_string());
    }

    Ok(())
}

/// Validate a password field: present and storable
pub fn validate_password(password: &str) -> Result<(), String> {
    if password.is_empty() {
        return Err(REQUIRED.to_string());
    }
    validate_max_length(password, 128)
}
