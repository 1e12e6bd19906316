//! Port for disaster update persistence and the natural-key merge.

use async_trait::async_trait;

use crate::domain::disaster_update::{DisasterUpdate, DisasterUpdateDraft};

use super::define_port_error;

define_port_error! {
    /// Errors raised by disaster update repository adapters.
    pub enum DisasterUpdateRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "disaster update repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "disaster update repository query failed: {message}",
    }
}

/// Port for disaster update storage.
///
/// The merge is keyed by `(title, location)`: rows matching an incoming draft
/// are overwritten in place, new keys are inserted, and rows absent from the
/// batch are left untouched. The whole batch lands atomically.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DisasterUpdateRepository: Send + Sync {
    /// Merge a batch of mapped feed records into the store.
    async fn merge_batch(
        &self,
        drafts: &[DisasterUpdateDraft],
    ) -> Result<(), DisasterUpdateRepositoryError>;

    /// List stored updates, newest first, bounded by `limit`.
    async fn list_recent(
        &self,
        limit: i64,
    ) -> Result<Vec<DisasterUpdate>, DisasterUpdateRepositoryError>;
}

/// Fixture implementation that stores nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureDisasterUpdateRepository;

#[async_trait]
impl DisasterUpdateRepository for FixtureDisasterUpdateRepository {
    async fn merge_batch(
        &self,
        _drafts: &[DisasterUpdateDraft],
    ) -> Result<(), DisasterUpdateRepositoryError> {
        Ok(())
    }

    async fn list_recent(
        &self,
        _limit: i64,
    ) -> Result<Vec<DisasterUpdate>, DisasterUpdateRepositoryError> {
        Ok(Vec::new())
    }
}
