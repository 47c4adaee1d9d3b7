//! Error types for the file lifecycle store.

use thiserror::Error;

/// Errors that can occur during file lifecycle operations.
///
/// Reclamation callers (the sweep loop, cleanup endpoints) typically log
/// and ignore these; the store itself never swallows them.
#[derive(Error, Debug)]
pub enum FileError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("no file found for handle '{0}'")]
    NotFound(String),

    #[error("failed to keep uploaded temp file: {0}")]
    Persist(#[from] tempfile::PathPersistError),
}
