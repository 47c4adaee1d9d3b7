//! Shared application state.

use std::sync::Arc;

use crate::files::FileStore;
use crate::registry::{Registry, WebFunction};

use super::error::ApiError;

/// Shared server state: the registered functions and the returned-file
/// store. Cheap to clone, handed to every request handler.
#[derive(Clone)]
pub struct AppState {
    registry: Arc<Registry>,
    files: Arc<FileStore>,
}

impl AppState {
    pub fn new(registry: Arc<Registry>, files: Arc<FileStore>) -> Self {
        Self { registry, files }
    }

    /// Look up a registered function, mapping a miss to a 404.
    pub fn function(&self, name: &str) -> Result<&WebFunction, ApiError> {
        self.registry
            .get(name)
            .ok_or_else(|| ApiError::function_not_found(name))
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn files(&self) -> &FileStore {
        &self.files
    }
}
