//! Handle-based file store for uploads and returned downloads.
//!
//! Uploads are staged to temp files scoped to one submission. Returned
//! files are persisted under a single store directory with all metadata
//! encoded in the filename (`{handle}-{created_secs}-{original_name}`),
//! so the directory itself is the index: resolution is a scan + decode,
//! and no durable side registry is needed.

use std::collections::HashMap;
use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use uuid::Uuid;

use crate::logging::{debug, info, warn};

use super::error::FileError;

/// Upload streaming chunk size.
pub const CHUNK_SIZE: usize = 8 * 1024 * 1024;

/// A resolved persisted file.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedFile {
    pub handle: String,
    pub path: PathBuf,
    /// Original filename, for the download response.
    pub filename: String,
    /// Unix timestamp of persistence.
    pub created_at: u64,
}

/// An in-progress upload being streamed to a staging temp file.
pub struct UploadSink {
    file: fs::File,
    path: tempfile::TempPath,
}

impl UploadSink {
    pub fn write_chunk(&mut self, chunk: &[u8]) -> std::io::Result<()> {
        self.file.write_all(chunk)
    }

    /// Flush and keep the staged file, returning its path.
    pub fn finish(mut self) -> Result<PathBuf, FileError> {
        self.file.flush()?;
        drop(self.file);
        Ok(self.path.keep()?)
    }
}

/// The file lifecycle store.
///
/// Handles are random 128-bit identifiers (uuid v4, 32 hex chars): they
/// gate access to potentially sensitive payloads, so they must not be
/// guessable from sequential allocation.
pub struct FileStore {
    dir: PathBuf,
    /// Short-lived per-handle cleanup locks, keyed under a map-level lock
    /// so entries never accumulate past the cleanup that used them.
    cleanup_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl FileStore {
    /// Open (creating if needed) a store rooted at the given directory.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, FileError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        info!(dir = %dir.display(), "file store opened");
        Ok(Self {
            dir,
            cleanup_locks: Mutex::new(HashMap::new()),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Begin streaming an upload into a staging temp file.
    pub fn begin_upload(&self, suffix: &str) -> Result<UploadSink, FileError> {
        let named = tempfile::Builder::new()
            .prefix("funcweb-upload-")
            .suffix(suffix)
            .tempfile()?;
        let (file, path) = named.into_parts();
        Ok(UploadSink { file, path })
    }

    /// Stream an upload to a staging temp file in bounded chunks. The
    /// payload is never held in memory at once. The returned path is only
    /// meaningful within the current submission's lifetime.
    pub fn save_upload(
        &self,
        reader: &mut dyn Read,
        suffix: &str,
    ) -> Result<PathBuf, FileError> {
        let mut sink = self.begin_upload(suffix)?;
        let mut buf = vec![0u8; CHUNK_SIZE];
        loop {
            let n = reader.read(&mut buf)?;
            if n == 0 {
                break;
            }
            if let Some(chunk) = buf.get(..n) {
                sink.write_chunk(chunk)?;
            }
        }
        sink.finish()
    }

    /// Persist returned file content and issue an opaque handle for it.
    pub fn persist_returned(
        &self,
        data: &[u8],
        original_filename: &str,
    ) -> Result<String, FileError> {
        let handle = Uuid::new_v4().simple().to_string();
        let created_at = unix_now();
        let name = encode_name(&handle, created_at, original_filename);
        fs::write(self.dir.join(&name), data)?;
        debug!(handle = %handle, filename = %original_filename, "persisted returned file");
        Ok(handle)
    }

    /// Reverse a handle to its storage path and original filename.
    ///
    /// A syntactically invalid handle is reported as not-found; handles
    /// are the only accepted lookup key, so no path component from the
    /// caller ever reaches the filesystem.
    pub fn resolve(&self, handle: &str) -> Result<ResolvedFile, FileError> {
        if !valid_handle(handle) {
            return Err(FileError::NotFound(handle.to_string()));
        }
        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            if let Some((h, created_at, filename)) = decode_name(name) {
                if h == handle {
                    return Ok(ResolvedFile {
                        handle: handle.to_string(),
                        path: entry.path(),
                        filename,
                        created_at,
                    });
                }
            }
        }
        Err(FileError::NotFound(handle.to_string()))
    }

    /// Delete the file behind a handle.
    ///
    /// Idempotent: a second call, or a concurrent one, is a no-op rather
    /// than an error. A per-handle lock serializes racing callers so
    /// exactly one physical delete happens.
    pub fn cleanup(&self, handle: &str) -> Result<(), FileError> {
        let lock = self.handle_lock(handle);
        let guard = lock.lock().unwrap_or_else(PoisonError::into_inner);

        let result = match self.resolve(handle) {
            Ok(resolved) => match fs::remove_file(&resolved.path) {
                Ok(()) => {
                    debug!(handle = %handle, "cleaned up file");
                    Ok(())
                }
                // Lost the race to another deleter; that is fine.
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
                Err(e) => Err(FileError::Io(e)),
            },
            Err(FileError::NotFound(_)) => Ok(()),
            Err(e) => Err(e),
        };

        drop(guard);
        self.release_handle_lock(handle);
        result
    }

    /// Reclaim every persisted file older than the threshold. Failures on
    /// individual files are logged and skipped; the sweep always visits
    /// the rest. Returns the number of files reclaimed.
    pub fn sweep_older_than(&self, max_age: Duration) -> usize {
        let cutoff = unix_now().saturating_sub(max_age.as_secs());
        // The binding feeds the log macro, which compiles to a no-op
        // without the logging feature.
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(_e) => {
                warn!(error = %_e, "sweep could not read store directory");
                return 0;
            }
        };

        let mut reclaimed = 0;
        for entry in entries.flatten() {
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            let Some((handle, created_at, _)) = decode_name(name) else {
                continue;
            };
            if created_at >= cutoff {
                continue;
            }
            match self.cleanup(&handle) {
                Ok(()) => reclaimed += 1,
                Err(_e) => {
                    warn!(handle = %handle, error = %_e, "sweep failed to reclaim file");
                }
            }
        }
        if reclaimed > 0 {
            info!(reclaimed, "sweep reclaimed old files");
        }
        reclaimed
    }

    fn handle_lock(&self, handle: &str) -> Arc<Mutex<()>> {
        let mut locks = self
            .cleanup_locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        locks
            .entry(handle.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    fn release_handle_lock(&self, handle: &str) {
        let mut locks = self
            .cleanup_locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        locks.remove(handle);
    }
}

fn unix_now() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

fn valid_handle(handle: &str) -> bool {
    handle.len() == 32 && handle.chars().all(|c| c.is_ascii_hexdigit())
}

/// Strip path components and control characters so the original filename
/// is safe to embed in the stored name and in a download header.
fn sanitize_filename(filename: &str) -> String {
    let base = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(filename);
    let cleaned: String = base
        .chars()
        .map(|c| if c.is_control() || c == '"' { '_' } else { c })
        .collect();
    if cleaned.is_empty() {
        "file".to_string()
    } else {
        cleaned
    }
}

fn encode_name(handle: &str, created_at: u64, original_filename: &str) -> String {
    format!("{}-{}-{}", handle, created_at, sanitize_filename(original_filename))
}

/// Decode a stored name back into `(handle, created_at, filename)`.
/// Returns `None` for anything that is not a store entry.
fn decode_name(name: &str) -> Option<(String, u64, String)> {
    let mut parts = name.splitn(3, '-');
    let handle = parts.next()?;
    let created_at = parts.next()?.parse::<u64>().ok()?;
    let filename = parts.next()?;
    if !valid_handle(handle) || filename.is_empty() {
        return None;
    }
    Some((handle.to_string(), created_at, filename.to_string()))
}
