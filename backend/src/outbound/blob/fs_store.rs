//! Filesystem blob store rooted in a capability directory.
//!
//! Attachments are written once under a deterministic relative path. The root
//! is opened via `cap-std`, so writes cannot escape it even if a malformed
//! path slips past validation.

use std::io::Write;
use std::path::{Component, Path};
use std::sync::Arc;

use async_trait::async_trait;
use cap_std::ambient_authority;
use cap_std::fs::Dir;

use crate::domain::ports::{BlobStoreError, DocumentBlobStore};

/// `DocumentBlobStore` implementation writing under one root directory.
#[derive(Clone)]
pub struct FsBlobStore {
    root: Arc<Dir>,
}

impl FsBlobStore {
    /// Open (creating if necessary) the store root.
    ///
    /// # Errors
    ///
    /// Returns the underlying IO error when the root cannot be created or
    /// opened.
    pub fn open(root: impl AsRef<Path>) -> std::io::Result<Self> {
        Dir::create_ambient_dir_all(root.as_ref(), ambient_authority())?;
        let dir = Dir::open_ambient_dir(root.as_ref(), ambient_authority())?;
        Ok(Self {
            root: Arc::new(dir),
        })
    }
}

fn validate_relative_path(path: &str) -> Result<(), BlobStoreError> {
    let rel = Path::new(path);
    if path.is_empty() || rel.is_absolute() {
        return Err(BlobStoreError::invalid_path(format!(
            "blob path {path:?} must be relative and non-empty"
        )));
    }
    if !rel.components().all(|c| matches!(c, Component::Normal(_))) {
        return Err(BlobStoreError::invalid_path(format!(
            "blob path {path:?} must not contain traversal components"
        )));
    }
    Ok(())
}

fn write_blob(root: &Dir, path: &str, bytes: &[u8]) -> Result<(), BlobStoreError> {
    let rel = Path::new(path);
    if let Some(parent) = rel.parent() {
        if !parent.as_os_str().is_empty() {
            root.create_dir_all(parent)
                .map_err(|error| BlobStoreError::io(error.to_string()))?;
        }
    }

    let mut options = cap_std::fs::OpenOptions::new();
    options.write(true).create_new(true);
    let mut file = root.open_with(rel, &options).map_err(|error| {
        if error.kind() == std::io::ErrorKind::AlreadyExists {
            BlobStoreError::already_exists(path)
        } else {
            BlobStoreError::io(error.to_string())
        }
    })?;
    file.write_all(bytes)
        .map_err(|error| BlobStoreError::io(error.to_string()))
}

#[async_trait]
impl DocumentBlobStore for FsBlobStore {
    async fn put(&self, path: &str, bytes: &[u8]) -> Result<String, BlobStoreError> {
        validate_relative_path(path)?;

        let root = Arc::clone(&self.root);
        let owned_path = path.to_owned();
        let owned_bytes = bytes.to_vec();
        tokio::task::spawn_blocking(move || write_blob(&root, &owned_path, &owned_bytes))
            .await
            .map_err(|error| BlobStoreError::io(format!("blob write task failed: {error}")))??;

        Ok(path.to_owned())
    }
}
