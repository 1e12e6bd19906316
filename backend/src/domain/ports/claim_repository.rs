//! Port for claim persistence.

use async_trait::async_trait;

use crate::domain::claim::{Claim, ClaimAmendment, ClaimId, ClaimIdentifiers, ClaimReview, NewClaim};
use crate::domain::principal::UserId;

use super::define_port_error;

define_port_error! {
    /// Errors raised by claim repository adapters.
    pub enum ClaimRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "claim repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "claim repository query failed: {message}",
        /// A unique constraint on a display identifier was violated.
        DuplicateIdentifier { message: String } =>
            "claim identifier already exists: {message}",
    }
}

/// Port for claim storage and retrieval.
///
/// The store assigns the numeric identity on insert; display identifiers are
/// written back afterwards via [`ClaimRepository::assign_identifiers`], so a
/// crash between the two writes leaves a claim with null identifiers. That
/// state is re-derivable, not corrupt.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClaimRepository: Send + Sync {
    /// Insert a pending claim and return it with its store-assigned identity.
    async fn insert(&self, claim: &NewClaim) -> Result<Claim, ClaimRepositoryError>;

    /// Write the derived display identifiers back onto an existing claim.
    async fn assign_identifiers(
        &self,
        id: ClaimId,
        identifiers: &ClaimIdentifiers,
    ) -> Result<Claim, ClaimRepositoryError>;

    /// Fetch one claim by identity.
    async fn find_by_id(&self, id: ClaimId) -> Result<Option<Claim>, ClaimRepositoryError>;

    /// List claims owned by one principal, newest first.
    async fn list_for_owner(&self, owner: &UserId) -> Result<Vec<Claim>, ClaimRepositoryError>;

    /// List every claim, newest first.
    async fn list_all(&self) -> Result<Vec<Claim>, ClaimRepositoryError>;

    /// Apply owner-editable amendments to a claim.
    async fn apply_amendment(
        &self,
        id: ClaimId,
        amendment: &ClaimAmendment,
    ) -> Result<Claim, ClaimRepositoryError>;

    /// Record an adjudication outcome (status plus predicted fields).
    async fn record_review(
        &self,
        id: ClaimId,
        review: &ClaimReview,
    ) -> Result<Claim, ClaimRepositoryError>;

    /// Delete a claim; attached documents cascade at the storage layer.
    async fn delete(&self, id: ClaimId) -> Result<(), ClaimRepositoryError>;
}

/// Fixture implementation for tests that do not exercise claim persistence.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureClaimRepository;

#[async_trait]
impl ClaimRepository for FixtureClaimRepository {
    async fn insert(&self, _claim: &NewClaim) -> Result<Claim, ClaimRepositoryError> {
        Err(ClaimRepositoryError::query("fixture repository is empty"))
    }

    async fn assign_identifiers(
        &self,
        _id: ClaimId,
        _identifiers: &ClaimIdentifiers,
    ) -> Result<Claim, ClaimRepositoryError> {
        Err(ClaimRepositoryError::query("fixture repository is empty"))
    }

    async fn find_by_id(&self, _id: ClaimId) -> Result<Option<Claim>, ClaimRepositoryError> {
        Ok(None)
    }

    async fn list_for_owner(&self, _owner: &UserId) -> Result<Vec<Claim>, ClaimRepositoryError> {
        Ok(Vec::new())
    }

    async fn list_all(&self) -> Result<Vec<Claim>, ClaimRepositoryError> {
        Ok(Vec::new())
    }

    async fn apply_amendment(
        &self,
        _id: ClaimId,
        _amendment: &ClaimAmendment,
    ) -> Result<Claim, ClaimRepositoryError> {
        Err(ClaimRepositoryError::query("fixture repository is empty"))
    }

    async fn record_review(
        &self,
        _id: ClaimId,
        _review: &ClaimReview,
    ) -> Result<Claim, ClaimRepositoryError> {
        Err(ClaimRepositoryError::query("fixture repository is empty"))
    }

    async fn delete(&self, _id: ClaimId) -> Result<(), ClaimRepositoryError> {
        Ok(())
    }
}
