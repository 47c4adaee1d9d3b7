//! Error types for submission validation.

use thiserror::Error;

/// Per-submission validation failures, always naming the offending
/// parameter. These are recoverable "bad request" errors, kept distinct
/// from registration-time schema errors and from failures of the wrapped
/// function itself.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("parameter '{param}': required value is missing")]
    MissingRequired { param: String },

    #[error("parameter '{param}': value '{value}' is not one of [{options}]")]
    NotInOptions {
        param: String,
        value: String,
        options: String,
    },

    #[error("parameter '{param}': value '{value}' {constraint}")]
    ConstraintViolation {
        param: String,
        value: String,
        constraint: String,
    },

    #[error("parameter '{param}': file '{filename}' has an unsupported extension (allowed: {allowed})")]
    UnsupportedFileType {
        param: String,
        filename: String,
        allowed: String,
    },
}

impl ValidationError {
    /// The name of the offending parameter.
    pub fn param(&self) -> &str {
        match self {
            ValidationError::MissingRequired { param }
            | ValidationError::NotInOptions { param, .. }
            | ValidationError::ConstraintViolation { param, .. }
            | ValidationError::UnsupportedFileType { param, .. } => param,
        }
    }
}
