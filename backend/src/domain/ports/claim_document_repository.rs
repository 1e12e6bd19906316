//! Port for claim attachment persistence.

use async_trait::async_trait;

use crate::domain::claim::ClaimId;
use crate::domain::document::{ClaimDocument, NewClaimDocument};

use super::define_port_error;

define_port_error! {
    /// Errors raised by claim document repository adapters.
    pub enum ClaimDocumentRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "document repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "document repository query failed: {message}",
    }
}

/// Port for persisting attachment rows against a parent claim.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClaimDocumentRepository: Send + Sync {
    /// Insert one row per attachment, all referencing the parent claim.
    async fn insert_many(
        &self,
        claim_id: ClaimId,
        documents: &[NewClaimDocument],
    ) -> Result<Vec<ClaimDocument>, ClaimDocumentRepositoryError>;

    /// List attachments of one claim, oldest first.
    async fn list_for_claim(
        &self,
        claim_id: ClaimId,
    ) -> Result<Vec<ClaimDocument>, ClaimDocumentRepositoryError>;
}

/// Fixture implementation that stores nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureClaimDocumentRepository;

#[async_trait]
impl ClaimDocumentRepository for FixtureClaimDocumentRepository {
    async fn insert_many(
        &self,
        _claim_id: ClaimId,
        _documents: &[NewClaimDocument],
    ) -> Result<Vec<ClaimDocument>, ClaimDocumentRepositoryError> {
        Ok(Vec::new())
    }

    async fn list_for_claim(
        &self,
        _claim_id: ClaimId,
    ) -> Result<Vec<ClaimDocument>, ClaimDocumentRepositoryError> {
        Ok(Vec::new())
    }
}
