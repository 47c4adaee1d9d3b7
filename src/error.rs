//! Unified error type for the funcweb library.
//!
//! This module provides a single [`Error`] type that encompasses all
//! errors that can occur in the library, making it easier to handle
//! errors in application code.

use thiserror::Error;

use crate::files::FileError;
use crate::form::ValidationError;
use crate::registry::InvokeError;
use crate::render::RenderError;
use crate::schema::SchemaError;

/// Unified error type for all funcweb operations.
///
/// This enum wraps all module-specific error types, allowing callers to
/// use a single error type throughout their application.
///
/// # Example
///
/// ```ignore
/// use funcweb::{Result, prelude::*};
///
/// fn run_submission(func: &WebFunction, raw: &RawMap) -> Result<RenderedResult> {
///     let args = coerce(func.schema(), raw)?;
///     let value = func.invoke(&args)?;
///     Ok(render(value, &files)?)
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// Registration-time schema extraction error.
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// Per-submission validation error.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Return-value classification error.
    #[error(transparent)]
    Render(#[from] RenderError),

    /// File lifecycle error.
    #[error(transparent)]
    File(#[from] FileError),

    /// Failure of the wrapped function itself.
    #[error(transparent)]
    Invoke(#[from] InvokeError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A [`Result`] type alias using the unified [`Error`] type.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Returns `true` if this is a per-submission validation error.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Returns `true` if this is a registration-time schema error.
    pub fn is_schema(&self) -> bool {
        matches!(self, Self::Schema(_))
    }

    /// Returns `true` if this is a missing-file error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::File(FileError::NotFound(_)))
    }
}
