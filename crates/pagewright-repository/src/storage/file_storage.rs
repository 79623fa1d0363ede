//! Filesystem blob storage
//!
//! Keys map to relative paths under a base directory. Writes are staged in
//! a dot-prefixed sibling and renamed into place, so a reader never
//! observes a half-written blob. Valid keys never start a segment with a
//! dot, so a staging file cannot shadow a stored blob.

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::fs;

use super::blob_storage::{BlobStorage, StorageError, validate_key};

static STAGING_COUNTER: AtomicU64 = AtomicU64::new(0);

/// File-based blob storage
#[derive(Debug, Clone)]
pub struct FileStorage {
    base_path: PathBuf,
}

impl FileStorage {
    /// Create a file storage rooted at `base_path`, creating it if needed
    pub async fn new(base_path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let base_path = base_path.as_ref().to_path_buf();
        fs::create_dir_all(&base_path)
            .await
            .map_err(|e| io_error(&base_path.display().to_string(), e))?;
        Ok(Self { base_path })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Resolve a key to a path under the base directory
    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        validate_key(key)?;
        Ok(key.split('/').fold(self.base_path.clone(), |mut path, segment| {
            path.push(segment);
            path
        }))
    }
}

/// Staging path next to `path`, unique per write within this process
fn staging_path(path: &Path, key: &str) -> Result<PathBuf, StorageError> {
    let name = path
        .file_name()
        .ok_or_else(|| StorageError::InvalidKey(key.to_string()))?;
    let mut staged = std::ffi::OsString::from(".");
    staged.push(name);
    staged.push(format!(
        ".{}-{}.tmp",
        std::process::id(),
        STAGING_COUNTER.fetch_add(1, Ordering::Relaxed)
    ));
    Ok(path.with_file_name(staged))
}

fn io_error(key: &str, error: std::io::Error) -> StorageError {
    match error.kind() {
        // A path through an existing blob cannot name a stored blob
        ErrorKind::NotFound | ErrorKind::NotADirectory => StorageError::NotFound(key.to_string()),
        ErrorKind::PermissionDenied => StorageError::AccessDenied(key.to_string()),
        _ => StorageError::Backend(format!("{}: {}", key, error)),
    }
}

#[async_trait]
impl BlobStorage for FileStorage {
    async fn put(&self, key: &str, data: Vec<u8>) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| io_error(key, e))?;
        }

        let staged = staging_path(&path, key)?;
        if let Err(e) = fs::write(&staged, data).await {
            let _ = fs::remove_file(&staged).await;
            return Err(io_error(key, e));
        }
        if let Err(e) = fs::rename(&staged, &path).await {
            let _ = fs::remove_file(&staged).await;
            return Err(io_error(key, e));
        }
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Vec<u8>, StorageError> {
        let path = self.path_for(key)?;
        fs::read(&path).await.map_err(|e| io_error(key, e))
    }
}
