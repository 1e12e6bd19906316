//! Claim workflow domain service.
//!
//! Submission order matters: attachments are validated before anything is
//! persisted (a rejected file must leave zero rows behind), the claim insert
//! yields the store-assigned identity, display identifiers are derived from
//! that identity and written back, and only then are blobs stored and
//! attachment rows created.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Datelike, Utc};
use serde_json::json;

use crate::domain::claim::{
    derive_identifiers, Claim, ClaimAmendment, ClaimId, ClaimReview, ClaimStatus, NewClaim,
};
use crate::domain::document::{
    blob_path, validate_upload, ClaimDocument, DocumentRejection, DocumentUpload, NewClaimDocument,
};
use crate::domain::ports::{
    BlobStoreError, ClaimDocumentRepository, ClaimDocumentRepositoryError, ClaimRepository,
    ClaimRepositoryError, ClaimSubmission, ClaimWorkflow, DocumentBlobStore, SubmittedClaim,
};
use crate::domain::principal::Principal;
use crate::domain::Error;

/// Claim workflow service implementing the driving port.
#[derive(Clone)]
pub struct ClaimsService<R, D, B> {
    claims: Arc<R>,
    documents: Arc<D>,
    blobs: Arc<B>,
}

impl<R, D, B> ClaimsService<R, D, B> {
    /// Create a new service over the given collaborators.
    pub fn new(claims: Arc<R>, documents: Arc<D>, blobs: Arc<B>) -> Self {
        Self {
            claims,
            documents,
            blobs,
        }
    }
}

fn map_claim_error(error: ClaimRepositoryError) -> Error {
    match error {
        ClaimRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("claim repository unavailable: {message}"))
        }
        ClaimRepositoryError::Query { message } => {
            Error::internal(format!("claim repository error: {message}"))
        }
        ClaimRepositoryError::DuplicateIdentifier { message } => {
            Error::internal(format!("claim identifier collision: {message}"))
        }
    }
}

fn map_document_error(error: ClaimDocumentRepositoryError) -> Error {
    match error {
        ClaimDocumentRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("document repository unavailable: {message}"))
        }
        ClaimDocumentRepositoryError::Query { message } => {
            Error::internal(format!("document repository error: {message}"))
        }
    }
}

fn map_blob_error(error: BlobStoreError) -> Error {
    match error {
        BlobStoreError::Io { message } => {
            Error::internal(format!("blob store error: {message}"))
        }
        BlobStoreError::InvalidPath { message } => {
            Error::internal(format!("blob path rejected by store: {message}"))
        }
        BlobStoreError::AlreadyExists { path } => {
            Error::conflict(format!("attachment already stored at {path}"))
        }
    }
}

fn rejection_to_error(rejection: &DocumentRejection) -> Error {
    let reason = match rejection {
        DocumentRejection::Oversize { .. } => "oversize",
        DocumentRejection::DisallowedType { .. } => "disallowed_type",
        DocumentRejection::InvalidFilename { .. } => "invalid_filename",
    };
    Error::document_rejected(rejection.to_string()).with_details(json!({
        "file": rejection.filename(),
        "reason": reason,
    }))
}

impl<R, D, B> ClaimsService<R, D, B>
where
    R: ClaimRepository,
    D: ClaimDocumentRepository,
    B: DocumentBlobStore,
{
    async fn fetch_guarded(&self, principal: &Principal, id: ClaimId) -> Result<Claim, Error> {
        let claim = self
            .claims
            .find_by_id(id)
            .await
            .map_err(map_claim_error)?
            .ok_or_else(|| Error::not_found("claim not found"))?;
        principal.authorize_owner(&claim.owner, "claim")?;
        Ok(claim)
    }

    async fn store_attachments(
        &self,
        principal: &Principal,
        claim_id: ClaimId,
        uploads: &[DocumentUpload],
    ) -> Result<Vec<ClaimDocument>, Error> {
        let mut rows = Vec::with_capacity(uploads.len());
        for upload in uploads {
            let path = blob_path(principal.id(), claim_id, &upload.filename)
                .map_err(|rejection| rejection_to_error(&rejection))?;
            let blob_ref = self
                .blobs
                .put(&path, &upload.bytes)
                .await
                .map_err(map_blob_error)?;
            rows.push(NewClaimDocument {
                filename: upload.filename.clone(),
                content_type: upload.content_type.clone(),
                size_bytes: upload.bytes.len() as i64,
                blob_ref,
            });
        }
        if rows.is_empty() {
            return Ok(Vec::new());
        }
        self.documents
            .insert_many(claim_id, &rows)
            .await
            .map_err(map_document_error)
    }
}

#[async_trait]
impl<R, D, B> ClaimWorkflow for ClaimsService<R, D, B>
where
    R: ClaimRepository,
    D: ClaimDocumentRepository,
    B: DocumentBlobStore,
{
    async fn submit(
        &self,
        principal: &Principal,
        submission: ClaimSubmission,
    ) -> Result<SubmittedClaim, Error> {
        // All-or-nothing: every attachment must pass before the claim row exists.
        for upload in &submission.uploads {
            validate_upload(upload).map_err(|rejection| rejection_to_error(&rejection))?;
        }

        let new_claim = NewClaim::try_new(
            *principal.id(),
            submission.disaster_type,
            submission.property_type,
            submission.description,
            submission.estimated_loss,
        )?;
        let inserted = self.claims.insert(&new_claim).await.map_err(map_claim_error)?;

        let identifiers = derive_identifiers(inserted.id, Utc::now().year());
        let claim = self
            .claims
            .assign_identifiers(inserted.id, &identifiers)
            .await
            .map_err(map_claim_error)?;

        let documents = self
            .store_attachments(principal, claim.id, &submission.uploads)
            .await?;

        Ok(SubmittedClaim { claim, documents })
    }

    async fn fetch(&self, principal: &Principal, id: ClaimId) -> Result<Claim, Error> {
        self.fetch_guarded(principal, id).await
    }

    async fn list(&self, principal: &Principal) -> Result<Vec<Claim>, Error> {
        let claims = if principal.is_admin() {
            self.claims.list_all().await
        } else {
            self.claims.list_for_owner(principal.id()).await
        };
        claims.map_err(map_claim_error)
    }

    async fn list_documents(
        &self,
        principal: &Principal,
        id: ClaimId,
    ) -> Result<Vec<ClaimDocument>, Error> {
        self.fetch_guarded(principal, id).await?;
        self.documents
            .list_for_claim(id)
            .await
            .map_err(map_document_error)
    }

    async fn amend(
        &self,
        principal: &Principal,
        id: ClaimId,
        amendment: ClaimAmendment,
    ) -> Result<Claim, Error> {
        let claim = self.fetch_guarded(principal, id).await?;
        if claim.status != ClaimStatus::Pending {
            return Err(Error::conflict(format!(
                "claim in status {} is no longer editable",
                claim.status
            )));
        }
        if let Some(description) = &amendment.description {
            if description.trim().is_empty() {
                return Err(Error::invalid_request("description must not be empty"));
            }
        }
        self.claims
            .apply_amendment(id, &amendment)
            .await
            .map_err(map_claim_error)
    }

    async fn review(
        &self,
        principal: &Principal,
        id: ClaimId,
        review: ClaimReview,
    ) -> Result<Claim, Error> {
        principal.require_admin()?;
        let claim = self
            .claims
            .find_by_id(id)
            .await
            .map_err(map_claim_error)?
            .ok_or_else(|| Error::not_found("claim not found"))?;
        if !claim.status.can_transition_to(review.status) {
            return Err(Error::invalid_transition(format!(
                "claim may not move from {} to {}",
                claim.status, review.status
            ))
            .with_details(json!({
                "from": claim.status.as_str(),
                "to": review.status.as_str(),
            })));
        }
        self.claims
            .record_review(id, &review)
            .await
            .map_err(map_claim_error)
    }

    async fn remove(&self, principal: &Principal, id: ClaimId) -> Result<(), Error> {
        self.fetch_guarded(principal, id).await?;
        self.claims.delete(id).await.map_err(map_claim_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::claim::{DisasterType, PropertyType};
    use crate::domain::money::Money;
    use crate::domain::ports::{
        MockClaimDocumentRepository, MockClaimRepository, MockDocumentBlobStore,
    };
    use crate::domain::principal::UserId;
    use crate::domain::ErrorCode;

    fn sample_claim(id: i64, owner: UserId, status: ClaimStatus) -> Claim {
        Claim {
            id: ClaimId::new(id),
            owner,
            disaster_type: DisasterType::Flood,
            property_type: PropertyType::House,
            description: "water damage in the basement".to_owned(),
            estimated_loss: Money::from_cents(1_250_000).expect("non-negative"),
            status,
            predicted_approval: None,
            predicted_limit: None,
            claim_number: None,
            insurance_policy_number: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn upload(filename: &str, size: usize) -> DocumentUpload {
        DocumentUpload {
            filename: filename.to_owned(),
            content_type: "application/pdf".to_owned(),
            bytes: vec![0; size],
        }
    }

    fn submission(uploads: Vec<DocumentUpload>) -> ClaimSubmission {
        ClaimSubmission {
            disaster_type: DisasterType::Flood,
            property_type: PropertyType::House,
            description: "water damage in the basement".to_owned(),
            estimated_loss: Money::from_cents(1_250_000).expect("non-negative"),
            uploads,
        }
    }

    fn service(
        claims: MockClaimRepository,
        documents: MockClaimDocumentRepository,
        blobs: MockDocumentBlobStore,
    ) -> ClaimsService<MockClaimRepository, MockClaimDocumentRepository, MockDocumentBlobStore>
    {
        ClaimsService::new(Arc::new(claims), Arc::new(documents), Arc::new(blobs))
    }

    #[tokio::test]
    async fn submit_assigns_identifiers_after_insert() {
        let owner = UserId::random();
        let principal = Principal::new(owner, false);
        let year = Utc::now().year();

        let mut claims = MockClaimRepository::new();
        claims
            .expect_insert()
            .times(1)
            .return_once(move |new| Ok(sample_claim(17, new.owner, ClaimStatus::Pending)));
        claims
            .expect_assign_identifiers()
            .withf(move |id, identifiers| {
                id.value() == 17
                    && identifiers.claim_number == format!("CLM-{year}17")
                    && identifiers.insurance_policy_number == format!("POL{year}17")
            })
            .times(1)
            .return_once(move |_, identifiers| {
                let mut claim = sample_claim(17, owner, ClaimStatus::Pending);
                claim.claim_number = Some(identifiers.claim_number.clone());
                claim.insurance_policy_number = Some(identifiers.insurance_policy_number.clone());
                Ok(claim)
            });

        let mut documents = MockClaimDocumentRepository::new();
        documents.expect_insert_many().times(0);

        let service = service(claims, documents, MockDocumentBlobStore::new());
        let result = service
            .submit(&principal, submission(Vec::new()))
            .await
            .expect("submission succeeds");

        assert_eq!(
            result.claim.claim_number.as_deref(),
            Some(format!("CLM-{year}17").as_str())
        );
        assert!(result.documents.is_empty());
    }

    #[tokio::test]
    async fn submit_stores_blobs_at_deterministic_paths() {
        let owner = UserId::random();
        let principal = Principal::new(owner, false);
        let expected_path = format!("{owner}/claims/17/proof.pdf");

        let mut claims = MockClaimRepository::new();
        claims
            .expect_insert()
            .times(1)
            .return_once(move |new| Ok(sample_claim(17, new.owner, ClaimStatus::Pending)));
        claims
            .expect_assign_identifiers()
            .times(1)
            .return_once(move |_, _| Ok(sample_claim(17, owner, ClaimStatus::Pending)));

        let mut blobs = MockDocumentBlobStore::new();
        let path_check = expected_path.clone();
        blobs
            .expect_put()
            .withf(move |path, bytes| path == path_check && bytes.len() == 64)
            .times(1)
            .return_once(|path, _| Ok(path.to_owned()));

        let mut documents = MockClaimDocumentRepository::new();
        documents
            .expect_insert_many()
            .withf(move |claim_id, rows| {
                claim_id.value() == 17
                    && rows.len() == 1
                    && rows.iter().all(|row| row.blob_ref == expected_path)
            })
            .times(1)
            .return_once(|claim_id, rows| {
                Ok(rows
                    .iter()
                    .map(|row| ClaimDocument {
                        id: 1,
                        claim_id,
                        filename: row.filename.clone(),
                        content_type: row.content_type.clone(),
                        size_bytes: row.size_bytes,
                        blob_ref: row.blob_ref.clone(),
                        uploaded_at: Utc::now(),
                    })
                    .collect())
            });

        let service = service(claims, documents, blobs);
        let result = service
            .submit(&principal, submission(vec![upload("proof.pdf", 64)]))
            .await
            .expect("submission succeeds");

        assert_eq!(result.documents.len(), 1);
    }

    #[tokio::test]
    async fn submit_rejects_bad_attachment_before_any_insert() {
        let principal = Principal::new(UserId::random(), false);

        let mut claims = MockClaimRepository::new();
        claims.expect_insert().times(0);
        let mut documents = MockClaimDocumentRepository::new();
        documents.expect_insert_many().times(0);

        let service = service(claims, documents, MockDocumentBlobStore::new());
        let err = service
            .submit(
                &principal,
                submission(vec![upload("a.pdf", 64), upload("b.exe", 8)]),
            )
            .await
            .expect_err("disallowed type must fail");

        assert_eq!(err.code(), ErrorCode::DocumentRejected);
        let details = err.details().expect("rejection details");
        assert_eq!(details.get("file").and_then(|v| v.as_str()), Some("b.exe"));
        assert_eq!(
            details.get("reason").and_then(|v| v.as_str()),
            Some("disallowed_type")
        );
    }

    #[tokio::test]
    async fn fetch_hides_foreign_claims() {
        let principal = Principal::new(UserId::random(), false);
        let foreign_owner = UserId::random();

        let mut claims = MockClaimRepository::new();
        claims
            .expect_find_by_id()
            .times(1)
            .return_once(move |_| Ok(Some(sample_claim(5, foreign_owner, ClaimStatus::Pending))));

        let service = service(
            claims,
            MockClaimDocumentRepository::new(),
            MockDocumentBlobStore::new(),
        );
        let err = service
            .fetch(&principal, ClaimId::new(5))
            .await
            .expect_err("foreign claim must be hidden");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn list_scopes_to_owner_unless_admin() {
        let owner = UserId::random();
        let principal = Principal::new(owner, false);

        let mut claims = MockClaimRepository::new();
        claims.expect_list_all().times(0);
        claims
            .expect_list_for_owner()
            .withf(move |candidate| *candidate == owner)
            .times(1)
            .return_once(|_| Ok(Vec::new()));

        let service = service(
            claims,
            MockClaimDocumentRepository::new(),
            MockDocumentBlobStore::new(),
        );
        let listed = service.list(&principal).await.expect("list succeeds");
        assert!(listed.is_empty());
    }

    #[tokio::test]
    async fn amend_refuses_non_pending_claims() {
        let owner = UserId::random();
        let principal = Principal::new(owner, false);

        let mut claims = MockClaimRepository::new();
        claims
            .expect_find_by_id()
            .times(1)
            .return_once(move |_| Ok(Some(sample_claim(5, owner, ClaimStatus::UnderReview))));
        claims.expect_apply_amendment().times(0);

        let service = service(
            claims,
            MockClaimDocumentRepository::new(),
            MockDocumentBlobStore::new(),
        );
        let err = service
            .amend(
                &principal,
                ClaimId::new(5),
                ClaimAmendment {
                    description: Some("updated".to_owned()),
                    estimated_loss: None,
                },
            )
            .await
            .expect_err("non-pending claims are frozen");
        assert_eq!(err.code(), ErrorCode::Conflict);
    }

    #[tokio::test]
    async fn review_requires_admin() {
        let principal = Principal::new(UserId::random(), false);
        let service = service(
            MockClaimRepository::new(),
            MockClaimDocumentRepository::new(),
            MockDocumentBlobStore::new(),
        );
        let err = service
            .review(
                &principal,
                ClaimId::new(1),
                ClaimReview {
                    status: ClaimStatus::UnderReview,
                    predicted_approval: None,
                    predicted_limit: None,
                },
            )
            .await
            .expect_err("review is an administrative operation");
        assert_eq!(err.code(), ErrorCode::Forbidden);
    }

    #[tokio::test]
    async fn review_rejects_illegal_transitions() {
        let admin = Principal::new(UserId::random(), true);
        let owner = UserId::random();

        let mut claims = MockClaimRepository::new();
        claims
            .expect_find_by_id()
            .times(1)
            .return_once(move |_| Ok(Some(sample_claim(9, owner, ClaimStatus::Pending))));
        claims.expect_record_review().times(0);

        let service = service(
            claims,
            MockClaimDocumentRepository::new(),
            MockDocumentBlobStore::new(),
        );
        let err = service
            .review(
                &admin,
                ClaimId::new(9),
                ClaimReview {
                    status: ClaimStatus::Settled,
                    predicted_approval: None,
                    predicted_limit: None,
                },
            )
            .await
            .expect_err("pending cannot settle directly");
        assert_eq!(err.code(), ErrorCode::InvalidTransition);
        let details = err.details().expect("transition details");
        assert_eq!(details.get("from").and_then(|v| v.as_str()), Some("pending"));
        assert_eq!(details.get("to").and_then(|v| v.as_str()), Some("settled"));
    }

    #[tokio::test]
    async fn review_records_legal_transitions() {
        let admin = Principal::new(UserId::random(), true);
        let owner = UserId::random();

        let mut claims = MockClaimRepository::new();
        claims
            .expect_find_by_id()
            .times(1)
            .return_once(move |_| Ok(Some(sample_claim(9, owner, ClaimStatus::UnderReview))));
        claims
            .expect_record_review()
            .withf(|id, review| id.value() == 9 && review.status == ClaimStatus::Approved)
            .times(1)
            .return_once(move |_, review| {
                let mut claim = sample_claim(9, owner, review.status);
                claim.predicted_approval = review.predicted_approval;
                Ok(claim)
            });

        let service = service(
            claims,
            MockClaimDocumentRepository::new(),
            MockDocumentBlobStore::new(),
        );
        let claim = service
            .review(
                &admin,
                ClaimId::new(9),
                ClaimReview {
                    status: ClaimStatus::Approved,
                    predicted_approval: None,
                    predicted_limit: None,
                },
            )
            .await
            .expect("legal transition succeeds");
        assert_eq!(claim.status, ClaimStatus::Approved);
    }
}
