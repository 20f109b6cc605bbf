//! # Document Models
//!
//! Schema validation for the documents the API writes. Validation
//! happens before any store write; the store itself is schemaless.

mod tour;
mod user;

pub use tour::{Difficulty, Tour};
pub use user::{strip_private_fields, NewUser, PASSWORD_FIELD};

use thiserror::Error;

/// A field-level validation failure.
#[derive(Debug, Clone, Error)]
#[error("Invalid field '{field}': {message}")]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}
