//! Error types for schema extraction.

use thiserror::Error;

/// Errors raised while extracting a schema from parameter declarations.
///
/// These are registration-time errors: a function that fails extraction is
/// never exposed, and the failure surfaces at startup rather than on a
/// submission.
#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("parameter '{param}' has no type annotation")]
    MissingTypeAnnotation { param: String },

    #[error("duplicate parameter name '{param}'")]
    DuplicateParam { param: String },

    #[error("parameter '{param}': unsupported type: {detail}")]
    UnsupportedType { param: String, detail: String },

    #[error("parameter '{param}': invalid choice default: {reason}")]
    InvalidChoiceDefault { param: String, reason: String },

    #[error("parameter '{param}': invalid default value: {reason}")]
    InvalidDefault { param: String, reason: String },

    #[error("parameter '{param}': invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        param: String,
        pattern: String,
        source: regex::Error,
    },
}
