//! PostgreSQL-backed `ClaimDocumentRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::claim::ClaimId;
use crate::domain::document::{ClaimDocument, NewClaimDocument};
use crate::domain::ports::{ClaimDocumentRepository, ClaimDocumentRepositoryError};

use super::error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{ClaimDocumentRow, NewClaimDocumentRow};
use super::pool::{DbPool, PoolError};
use super::schema::claim_documents;

/// Diesel-backed implementation of the `ClaimDocumentRepository` port.
#[derive(Clone)]
pub struct DieselClaimDocumentRepository {
    pool: DbPool,
}

impl DieselClaimDocumentRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ClaimDocumentRepositoryError {
    map_basic_pool_error(error, ClaimDocumentRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> ClaimDocumentRepositoryError {
    map_basic_diesel_error(
        error,
        ClaimDocumentRepositoryError::query,
        ClaimDocumentRepositoryError::connection,
    )
}

fn row_to_document(row: ClaimDocumentRow) -> ClaimDocument {
    ClaimDocument {
        id: row.id,
        claim_id: ClaimId::new(row.claim_id),
        filename: row.filename,
        content_type: row.content_type,
        size_bytes: row.size_bytes,
        blob_ref: row.blob_ref,
        uploaded_at: row.uploaded_at,
    }
}

#[async_trait]
impl ClaimDocumentRepository for DieselClaimDocumentRepository {
    async fn insert_many(
        &self,
        claim_id: ClaimId,
        documents: &[NewClaimDocument],
    ) -> Result<Vec<ClaimDocument>, ClaimDocumentRepositoryError> {
        if documents.is_empty() {
            return Ok(Vec::new());
        }
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<NewClaimDocumentRow<'_>> = documents
            .iter()
            .map(|document| NewClaimDocumentRow {
                claim_id: claim_id.value(),
                filename: document.filename.as_str(),
                content_type: document.content_type.as_str(),
                size_bytes: document.size_bytes,
                blob_ref: document.blob_ref.as_str(),
            })
            .collect();

        let inserted: Vec<ClaimDocumentRow> = diesel::insert_into(claim_documents::table)
            .values(&rows)
            .returning(ClaimDocumentRow::as_returning())
            .get_results(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(inserted.into_iter().map(row_to_document).collect())
    }

    async fn list_for_claim(
        &self,
        claim_id: ClaimId,
    ) -> Result<Vec<ClaimDocument>, ClaimDocumentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<ClaimDocumentRow> = claim_documents::table
            .filter(claim_documents::claim_id.eq(claim_id.value()))
            .order(claim_documents::uploaded_at.asc())
            .select(ClaimDocumentRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(rows.into_iter().map(row_to_document).collect())
    }
}
