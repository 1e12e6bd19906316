//! Driving port for the claim workflow use-cases.

use async_trait::async_trait;

use crate::domain::claim::{Claim, ClaimAmendment, ClaimId, ClaimReview, DisasterType, PropertyType};
use crate::domain::document::{ClaimDocument, DocumentUpload};
use crate::domain::money::Money;
use crate::domain::principal::Principal;
use crate::domain::Error;

/// A claim submission as accepted from the presentation layer.
///
/// Status, predictions, identifiers, and timestamps are server-assigned and
/// have no representation here.
#[derive(Debug, Clone, PartialEq)]
pub struct ClaimSubmission {
    pub disaster_type: DisasterType,
    pub property_type: PropertyType,
    pub description: String,
    pub estimated_loss: Money,
    pub uploads: Vec<DocumentUpload>,
}

/// Result of a successful submission.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmittedClaim {
    pub claim: Claim,
    pub documents: Vec<ClaimDocument>,
}

/// Use-cases over claims, all scoped by the access guard.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClaimWorkflow: Send + Sync {
    /// Submit a claim with zero or more attachments, atomically.
    async fn submit(
        &self,
        principal: &Principal,
        submission: ClaimSubmission,
    ) -> Result<SubmittedClaim, Error>;

    /// Fetch one claim the principal may access.
    async fn fetch(&self, principal: &Principal, id: ClaimId) -> Result<Claim, Error>;

    /// List accessible claims, newest first.
    async fn list(&self, principal: &Principal) -> Result<Vec<Claim>, Error>;

    /// List attachments of one accessible claim.
    async fn list_documents(
        &self,
        principal: &Principal,
        id: ClaimId,
    ) -> Result<Vec<ClaimDocument>, Error>;

    /// Amend owner-editable fields of a pending claim.
    async fn amend(
        &self,
        principal: &Principal,
        id: ClaimId,
        amendment: ClaimAmendment,
    ) -> Result<Claim, Error>;

    /// Record an adjudication outcome (administrative workflow only).
    async fn review(
        &self,
        principal: &Principal,
        id: ClaimId,
        review: ClaimReview,
    ) -> Result<Claim, Error>;

    /// Delete one accessible claim; attachments cascade.
    async fn remove(&self, principal: &Principal, id: ClaimId) -> Result<(), Error>;
}
