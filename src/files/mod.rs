//! File lifecycle: upload staging, handle-based persistence of returned
//! files, resolution, idempotent cleanup, and age-based sweeping.

mod error;
mod store;

pub use error::FileError;
pub use store::{CHUNK_SIZE, FileStore, ResolvedFile, UploadSink};
