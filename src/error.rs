//! # Error Types
//!
//! This module defines error types used throughout the insertprint library.
//!
//! Rendering errors are caught at each asynchronous boundary and turned into
//! visual fallbacks (no logo, QR placeholder). Only export-time failures reach
//! the caller as an `Err`.

use std::fmt;

use thiserror::Error;

/// Main error type for insertprint operations
#[derive(Debug, Error)]
pub enum InsertError {
    /// A bitmap (logo or QR) could not be fetched or decoded
    #[error("Image load error: {0}")]
    ImageLoad(String),

    /// The QR target was missing or could not be encoded
    #[error("QR generation error: {0}")]
    QrGeneration(String),

    /// Field-level validation failures
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    /// Raster encoding error
    #[error("Image error: {0}")]
    Image(String),

    /// Server bind/serve errors
    #[error("Server error: {0}")]
    Server(String),

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error wrapper
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct FieldError {
    /// Wire name of the offending field (e.g. `background_color`).
    pub field: &'static str,
    pub message: String,
}

/// Every validation failure found in a design, in field order.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(pub Vec<FieldError>);

impl ValidationErrors {
    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.push(FieldError {
            field,
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Look up the message reported for a field, if any.
    pub fn for_field(&self, field: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, err) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{}: {}", err.field, err.message)?;
        }
        Ok(())
    }
}

impl From<ValidationErrors> for InsertError {
    fn from(errors: ValidationErrors) -> Self {
        InsertError::Validation(errors)
    }
}
