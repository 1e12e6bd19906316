//! Driven port for claim attachment blob storage.

use async_trait::async_trait;

use super::define_port_error;

define_port_error! {
    /// Errors raised by blob store adapters.
    pub enum BlobStoreError {
        /// Underlying storage failed.
        Io { message: String } =>
            "blob store io failed: {message}",
        /// The supplied path escaped the store root or was malformed.
        InvalidPath { message: String } =>
            "blob path invalid: {message}",
        /// Write-once violation: a blob already exists at this path.
        AlreadyExists { path: String } =>
            "blob already exists at {path}",
    }
}

/// Write-once blob storage addressed by a deterministic relative path.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentBlobStore: Send + Sync {
    /// Store one blob and return its retrievable reference.
    async fn put(&self, path: &str, bytes: &[u8]) -> Result<String, BlobStoreError>;
}

/// Fixture implementation that discards blobs and echoes the path.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureDocumentBlobStore;

#[async_trait]
impl DocumentBlobStore for FixtureDocumentBlobStore {
    async fn put(&self, path: &str, _bytes: &[u8]) -> Result<String, BlobStoreError> {
        Ok(path.to_owned())
    }
}
