//! # User Model
//!
//! Minimal user schema kept for future auth work. Creation validates
//! and normalizes the payload; no hashing or auth logic lives here.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::ValidationError;

/// Serialized field holding the password inside stored documents.
/// Stripped from every response.
pub const PASSWORD_FIELD: &str = "password";

const MIN_PASSWORD_LEN: usize = 8;

fn email_regex() -> &'static Regex {
    static EMAIL_RE: OnceLock<Regex> = OnceLock::new();
    EMAIL_RE.get_or_init(|| {
        Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern is valid")
    })
}

/// A user creation payload. `password_confirm` is consumed by
/// validation and never stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub name: String,

    pub email: String,

    #[serde(default)]
    pub photo: Option<String>,

    pub password: String,

    pub password_confirm: String,
}

impl NewUser {
    /// Deserialize a JSON body.
    pub fn parse(value: &Value) -> Result<Self, ValidationError> {
        serde_json::from_value(value.clone())
            .map_err(|e| ValidationError::new("body", e.to_string()))
    }

    /// Validate, normalize the email to lowercase, and produce the
    /// document to store. The confirmation field is dropped.
    pub fn into_document(mut self) -> Result<Value, ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::new("name", "Please tell us your name"));
        }

        self.email = self.email.trim().to_lowercase();
        if !email_regex().is_match(&self.email) {
            return Err(ValidationError::new(
                "email",
                "Please provide a valid email",
            ));
        }

        if self.password.len() < MIN_PASSWORD_LEN {
            return Err(ValidationError::new(
                "password",
                format!("Password must be at least {} characters", MIN_PASSWORD_LEN),
            ));
        }

        if self.password_confirm != self.password {
            return Err(ValidationError::new(
                "passwordConfirm",
                "Passwords do not match",
            ));
        }

        let mut doc = json!({
            "name": self.name,
            "email": self.email,
            "password": self.password,
        });
        if let Some(photo) = self.photo {
            doc["photo"] = Value::String(photo);
        }

        Ok(doc)
    }
}

/// Remove fields that must never leave the process in a response.
pub fn strip_private_fields(doc: &mut Value) {
    if let Some(obj) = doc.as_object_mut() {
        obj.remove(PASSWORD_FIELD);
    }
}
