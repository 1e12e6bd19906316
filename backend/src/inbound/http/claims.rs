//! Claim HTTP handlers.
//!
//! ```text
//! POST   /api/v1/claims
//! GET    /api/v1/claims
//! GET    /api/v1/claims/{id}
//! PATCH  /api/v1/claims/{id}
//! POST   /api/v1/claims/{id}/review
//! DELETE /api/v1/claims/{id}
//! GET    /api/v1/claims/{id}/documents
//! ```

use actix_web::{delete, get, patch, post, web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::domain::claim::{Claim, ClaimAmendment, ClaimId, ClaimReview};
use crate::domain::document::{ClaimDocument, DocumentUpload};
use crate::domain::ports::ClaimSubmission;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    decode_base64_field, missing_field_error, parse_enum_field, parse_money_field,
    parse_probability_field,
};
use crate::inbound::http::ApiResult;

const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// One attachment carried base64-encoded in the submission body.
#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentPayload {
    pub filename: Option<String>,
    pub content_type: Option<String>,
    pub data: Option<String>,
}

/// Request body for `POST /api/v1/claims`.
#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitClaimRequest {
    pub disaster_type: Option<String>,
    pub property_type: Option<String>,
    pub description: Option<String>,
    pub estimated_loss: Option<String>,
    #[serde(default)]
    pub documents: Vec<DocumentPayload>,
}

fn parse_upload(payload: DocumentPayload) -> ApiResult<DocumentUpload> {
    let filename = payload
        .filename
        .ok_or_else(|| missing_field_error("documents.filename"))?;
    let data = payload
        .data
        .ok_or_else(|| missing_field_error("documents.data"))?;
    Ok(DocumentUpload {
        bytes: decode_base64_field("documents.data", &data)?,
        content_type: payload
            .content_type
            .unwrap_or_else(|| FALLBACK_CONTENT_TYPE.to_owned()),
        filename,
    })
}

fn parse_submission(payload: SubmitClaimRequest) -> ApiResult<ClaimSubmission> {
    let disaster_type = payload
        .disaster_type
        .ok_or_else(|| missing_field_error("disasterType"))?;
    let property_type = payload
        .property_type
        .ok_or_else(|| missing_field_error("propertyType"))?;
    let description = payload
        .description
        .ok_or_else(|| missing_field_error("description"))?;
    let estimated_loss = payload
        .estimated_loss
        .ok_or_else(|| missing_field_error("estimatedLoss"))?;

    Ok(ClaimSubmission {
        disaster_type: parse_enum_field(
            "disasterType",
            &disaster_type,
            "wildfire, flood, earthquake, hurricane, tornado, other",
        )?,
        property_type: parse_enum_field(
            "propertyType",
            &property_type,
            "automobile, house, business, other",
        )?,
        description,
        estimated_loss: parse_money_field("estimatedLoss", &estimated_loss)?,
        uploads: payload
            .documents
            .into_iter()
            .map(parse_upload)
            .collect::<ApiResult<Vec<_>>>()?,
    })
}

/// Request body for `PATCH /api/v1/claims/{id}`.
#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AmendClaimRequest {
    pub description: Option<String>,
    pub estimated_loss: Option<String>,
}

fn parse_amendment(payload: AmendClaimRequest) -> ApiResult<ClaimAmendment> {
    Ok(ClaimAmendment {
        description: payload.description,
        estimated_loss: payload
            .estimated_loss
            .as_deref()
            .map(|raw| parse_money_field("estimatedLoss", raw))
            .transpose()?,
    })
}

/// Request body for `POST /api/v1/claims/{id}/review`.
#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewClaimRequest {
    pub status: Option<String>,
    pub predicted_approval: Option<String>,
    pub predicted_limit: Option<String>,
}

fn parse_review(payload: ReviewClaimRequest) -> ApiResult<ClaimReview> {
    let status = payload.status.ok_or_else(|| missing_field_error("status"))?;
    Ok(ClaimReview {
        status: parse_enum_field(
            "status",
            &status,
            "pending, under_review, approved, rejected, settled",
        )?,
        predicted_approval: payload
            .predicted_approval
            .as_deref()
            .map(|raw| parse_probability_field("predictedApproval", raw))
            .transpose()?,
        predicted_limit: payload
            .predicted_limit
            .as_deref()
            .map(|raw| parse_money_field("predictedLimit", raw))
            .transpose()?,
    })
}

/// Response payload for one claim.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimResponse {
    pub id: i64,
    pub owner: String,
    pub disaster_type: String,
    pub property_type: String,
    pub description: String,
    pub estimated_loss: String,
    pub status: String,
    pub predicted_approval: Option<String>,
    pub predicted_limit: Option<String>,
    pub claim_number: Option<String>,
    pub insurance_policy_number: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Claim> for ClaimResponse {
    fn from(claim: Claim) -> Self {
        Self {
            id: claim.id.value(),
            owner: claim.owner.to_string(),
            disaster_type: claim.disaster_type.to_string(),
            property_type: claim.property_type.to_string(),
            description: claim.description,
            estimated_loss: claim.estimated_loss.to_string(),
            status: claim.status.to_string(),
            predicted_approval: claim.predicted_approval.map(|p| p.to_string()),
            predicted_limit: claim.predicted_limit.map(|limit| limit.to_string()),
            claim_number: claim.claim_number,
            insurance_policy_number: claim.insurance_policy_number,
            created_at: claim.created_at.to_rfc3339(),
            updated_at: claim.updated_at.to_rfc3339(),
        }
    }
}

/// Response payload for one attachment.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimDocumentResponse {
    pub id: i64,
    pub claim_id: i64,
    pub filename: String,
    pub content_type: String,
    pub size_bytes: i64,
    pub blob_ref: String,
    pub uploaded_at: String,
}

impl From<ClaimDocument> for ClaimDocumentResponse {
    fn from(document: ClaimDocument) -> Self {
        Self {
            id: document.id,
            claim_id: document.claim_id.value(),
            filename: document.filename,
            content_type: document.content_type,
            size_bytes: document.size_bytes,
            blob_ref: document.blob_ref,
            uploaded_at: document.uploaded_at.to_rfc3339(),
        }
    }
}

/// Response payload for a successful submission.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmittedClaimResponse {
    pub claim: ClaimResponse,
    pub documents: Vec<ClaimDocumentResponse>,
}

/// Submit a claim with zero or more attachments.
#[post("/claims")]
pub async fn submit_claim(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<SubmitClaimRequest>,
) -> ApiResult<HttpResponse> {
    let principal = session.require_principal()?;
    let submission = parse_submission(payload.into_inner())?;
    let submitted = state.claims.submit(&principal, submission).await?;
    Ok(HttpResponse::Created().json(SubmittedClaimResponse {
        claim: ClaimResponse::from(submitted.claim),
        documents: submitted
            .documents
            .into_iter()
            .map(ClaimDocumentResponse::from)
            .collect(),
    }))
}

/// List accessible claims, newest first.
#[get("/claims")]
pub async fn list_claims(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<ClaimResponse>>> {
    let principal = session.require_principal()?;
    let claims = state.claims.list(&principal).await?;
    Ok(web::Json(
        claims.into_iter().map(ClaimResponse::from).collect(),
    ))
}

/// Fetch one accessible claim.
#[get("/claims/{id}")]
pub async fn get_claim(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
) -> ApiResult<web::Json<ClaimResponse>> {
    let principal = session.require_principal()?;
    let claim = state
        .claims
        .fetch(&principal, ClaimId::new(path.into_inner()))
        .await?;
    Ok(web::Json(ClaimResponse::from(claim)))
}

/// Amend owner-editable fields of a pending claim.
#[patch("/claims/{id}")]
pub async fn amend_claim(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
    payload: web::Json<AmendClaimRequest>,
) -> ApiResult<web::Json<ClaimResponse>> {
    let principal = session.require_principal()?;
    let amendment = parse_amendment(payload.into_inner())?;
    let claim = state
        .claims
        .amend(&principal, ClaimId::new(path.into_inner()), amendment)
        .await?;
    Ok(web::Json(ClaimResponse::from(claim)))
}

/// Record an adjudication outcome (administrative workflow).
#[post("/claims/{id}/review")]
pub async fn review_claim(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
    payload: web::Json<ReviewClaimRequest>,
) -> ApiResult<web::Json<ClaimResponse>> {
    let principal = session.require_principal()?;
    let review = parse_review(payload.into_inner())?;
    let claim = state
        .claims
        .review(&principal, ClaimId::new(path.into_inner()), review)
        .await?;
    Ok(web::Json(ClaimResponse::from(claim)))
}

/// Delete one accessible claim; attachments cascade.
#[delete("/claims/{id}")]
pub async fn delete_claim(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    let principal = session.require_principal()?;
    state
        .claims
        .remove(&principal, ClaimId::new(path.into_inner()))
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

/// List attachments of one accessible claim.
#[get("/claims/{id}/documents")]
pub async fn list_claim_documents(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
) -> ApiResult<web::Json<Vec<ClaimDocumentResponse>>> {
    let principal = session.require_principal()?;
    let documents = state
        .claims
        .list_documents(&principal, ClaimId::new(path.into_inner()))
        .await?;
    Ok(web::Json(
        documents
            .into_iter()
            .map(ClaimDocumentResponse::from)
            .collect(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DisasterType, ErrorCode, PropertyType};
    use rstest::rstest;

    fn request() -> SubmitClaimRequest {
        SubmitClaimRequest {
            disaster_type: Some("flood".to_owned()),
            property_type: Some("house".to_owned()),
            description: Some("water damage".to_owned()),
            estimated_loss: Some("12500.75".to_owned()),
            documents: Vec::new(),
        }
    }

    #[test]
    fn parses_a_complete_submission() {
        let mut payload = request();
        payload.documents.push(DocumentPayload {
            filename: Some("proof.pdf".to_owned()),
            content_type: None,
            data: Some("aGVsbG8=".to_owned()),
        });

        let submission = parse_submission(payload).expect("valid payload");
        assert_eq!(submission.disaster_type, DisasterType::Flood);
        assert_eq!(submission.property_type, PropertyType::House);
        assert_eq!(submission.estimated_loss.cents(), 1_250_075);
        assert_eq!(submission.uploads.len(), 1);
        let upload = submission.uploads.first().expect("one upload");
        assert_eq!(upload.bytes, b"hello");
        assert_eq!(upload.content_type, FALLBACK_CONTENT_TYPE);
    }

    #[rstest]
    #[case(SubmitClaimRequest { disaster_type: None, ..request() }, "disasterType")]
    #[case(SubmitClaimRequest { property_type: None, ..request() }, "propertyType")]
    #[case(SubmitClaimRequest { description: None, ..request() }, "description")]
    #[case(SubmitClaimRequest { estimated_loss: None, ..request() }, "estimatedLoss")]
    fn rejects_missing_fields(#[case] payload: SubmitClaimRequest, #[case] field: &str) {
        let err = parse_submission(payload).expect_err("missing field");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
        assert_eq!(
            err.details().and_then(|d| d.get("field")).and_then(|v| v.as_str()),
            Some(field)
        );
    }

    #[test]
    fn rejects_unknown_taxonomy_values() {
        let mut payload = request();
        payload.disaster_type = Some("volcano".to_owned());
        let err = parse_submission(payload).expect_err("unknown disaster type");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
    }

    #[test]
    fn review_requires_a_status() {
        let err = parse_review(ReviewClaimRequest {
            status: None,
            predicted_approval: None,
            predicted_limit: None,
        })
        .expect_err("status is required");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
    }

    #[test]
    fn review_parses_predictions() {
        let review = parse_review(ReviewClaimRequest {
            status: Some("approved".to_owned()),
            predicted_approval: Some("0.85".to_owned()),
            predicted_limit: Some("20000.00".to_owned()),
        })
        .expect("valid review");
        assert_eq!(review.predicted_approval.map(|p| p.hundredths()), Some(85));
        assert_eq!(review.predicted_limit.map(|m| m.cents()), Some(2_000_000));
    }

    #[test]
    fn amendment_parses_partial_payloads() {
        let amendment = parse_amendment(AmendClaimRequest {
            description: None,
            estimated_loss: Some("99.90".to_owned()),
        })
        .expect("valid amendment");
        assert!(amendment.description.is_none());
        assert_eq!(amendment.estimated_loss.map(|m| m.cents()), Some(9990));
    }
}
