//! PostgreSQL-backed `ClaimRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::claim::{
    Claim, ClaimAmendment, ClaimId, ClaimIdentifiers, ClaimReview, ClaimStatus, NewClaim,
};
use crate::domain::money::{Money, Probability};
use crate::domain::ports::{ClaimRepository, ClaimRepositoryError};
use crate::domain::principal::UserId;

use super::error_mapping::{is_unique_violation, map_basic_diesel_error, map_basic_pool_error};
use super::models::{
    ClaimAmendmentChangeset, ClaimIdentifierChangeset, ClaimReviewChangeset, ClaimRow, NewClaimRow,
};
use super::pool::{DbPool, PoolError};
use super::schema::claims;

/// Diesel-backed implementation of the `ClaimRepository` port.
#[derive(Clone)]
pub struct DieselClaimRepository {
    pool: DbPool,
}

impl DieselClaimRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ClaimRepositoryError {
    map_basic_pool_error(error, ClaimRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> ClaimRepositoryError {
    map_basic_diesel_error(
        error,
        ClaimRepositoryError::query,
        ClaimRepositoryError::connection,
    )
}

/// Convert a database row to a domain claim.
///
/// Taxonomy values in storage come from domain enums, so a parse failure means
/// the row was written outside this application; it surfaces as a query error
/// rather than a silent default.
fn row_to_claim(row: ClaimRow) -> Result<Claim, ClaimRepositoryError> {
    let disaster_type = row
        .disaster_type
        .parse()
        .map_err(|()| ClaimRepositoryError::query("unrecognised disaster type in storage"))?;
    let property_type = row
        .property_type
        .parse()
        .map_err(|()| ClaimRepositoryError::query("unrecognised property type in storage"))?;
    let status: ClaimStatus = row
        .status
        .parse()
        .map_err(|()| ClaimRepositoryError::query("unrecognised claim status in storage"))?;
    let estimated_loss = Money::from_cents(row.estimated_loss_cents)
        .map_err(|err| ClaimRepositoryError::query(err.to_string()))?;
    let predicted_approval = row
        .predicted_approval_hundredths
        .map(Probability::from_hundredths)
        .transpose()
        .map_err(|err| ClaimRepositoryError::query(err.to_string()))?;
    let predicted_limit = row
        .predicted_limit_cents
        .map(Money::from_cents)
        .transpose()
        .map_err(|err| ClaimRepositoryError::query(err.to_string()))?;

    Ok(Claim {
        id: ClaimId::new(row.id),
        owner: UserId::from_uuid(row.user_id),
        disaster_type,
        property_type,
        description: row.description,
        estimated_loss,
        status,
        predicted_approval,
        predicted_limit,
        claim_number: row.claim_number,
        insurance_policy_number: row.insurance_policy_number,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

#[async_trait]
impl ClaimRepository for DieselClaimRepository {
    async fn insert(&self, claim: &NewClaim) -> Result<Claim, ClaimRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let new_row = NewClaimRow {
            user_id: *claim.owner.as_uuid(),
            disaster_type: claim.disaster_type.as_str(),
            property_type: claim.property_type.as_str(),
            description: claim.description.as_str(),
            estimated_loss_cents: claim.estimated_loss.cents(),
            status: ClaimStatus::Pending.as_str(),
        };

        let row: ClaimRow = diesel::insert_into(claims::table)
            .values(&new_row)
            .returning(ClaimRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        row_to_claim(row)
    }

    async fn assign_identifiers(
        &self,
        id: ClaimId,
        identifiers: &ClaimIdentifiers,
    ) -> Result<Claim, ClaimRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let changeset = ClaimIdentifierChangeset {
            claim_number: identifiers.claim_number.as_str(),
            insurance_policy_number: identifiers.insurance_policy_number.as_str(),
            updated_at: Utc::now(),
        };

        let row: ClaimRow = diesel::update(claims::table.filter(claims::id.eq(id.value())))
            .set(&changeset)
            .returning(ClaimRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|error| {
                if is_unique_violation(&error) {
                    ClaimRepositoryError::duplicate_identifier(identifiers.claim_number.clone())
                } else {
                    map_diesel_error(error)
                }
            })?;

        row_to_claim(row)
    }

    async fn find_by_id(&self, id: ClaimId) -> Result<Option<Claim>, ClaimRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<ClaimRow> = claims::table
            .filter(claims::id.eq(id.value()))
            .select(ClaimRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_claim).transpose()
    }

    async fn list_for_owner(&self, owner: &UserId) -> Result<Vec<Claim>, ClaimRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<ClaimRow> = claims::table
            .filter(claims::user_id.eq(owner.as_uuid()))
            .order(claims::created_at.desc())
            .select(ClaimRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_claim).collect()
    }

    async fn list_all(&self) -> Result<Vec<Claim>, ClaimRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<ClaimRow> = claims::table
            .order(claims::created_at.desc())
            .select(ClaimRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_claim).collect()
    }

    async fn apply_amendment(
        &self,
        id: ClaimId,
        amendment: &ClaimAmendment,
    ) -> Result<Claim, ClaimRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let changeset = ClaimAmendmentChangeset {
            description: amendment.description.as_deref(),
            estimated_loss_cents: amendment.estimated_loss.map(|loss| loss.cents()),
            updated_at: Utc::now(),
        };

        let row: ClaimRow = diesel::update(claims::table.filter(claims::id.eq(id.value())))
            .set(&changeset)
            .returning(ClaimRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        row_to_claim(row)
    }

    async fn record_review(
        &self,
        id: ClaimId,
        review: &ClaimReview,
    ) -> Result<Claim, ClaimRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let changeset = ClaimReviewChangeset {
            status: review.status.as_str(),
            predicted_approval_hundredths: review
                .predicted_approval
                .map(|probability| probability.hundredths()),
            predicted_limit_cents: review.predicted_limit.map(|limit| limit.cents()),
            updated_at: Utc::now(),
        };

        let row: ClaimRow = diesel::update(claims::table.filter(claims::id.eq(id.value())))
            .set(&changeset)
            .returning(ClaimRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        row_to_claim(row)
    }

    async fn delete(&self, id: ClaimId) -> Result<(), ClaimRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::delete(claims::table.filter(claims::id.eq(id.value())))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for the row conversion and error mapping.
    use super::*;
    use crate::domain::claim::{DisasterType, PropertyType};
    use rstest::rstest;

    fn row(status: &str) -> ClaimRow {
        ClaimRow {
            id: 17,
            user_id: uuid::Uuid::new_v4(),
            disaster_type: "flood".to_owned(),
            property_type: "house".to_owned(),
            description: "basement flooding".to_owned(),
            estimated_loss_cents: 1_250_075,
            status: status.to_owned(),
            predicted_approval_hundredths: Some(85),
            predicted_limit_cents: Some(2_000_000),
            claim_number: Some("CLM-202417".to_owned()),
            insurance_policy_number: Some("POL202417".to_owned()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn rows_convert_to_domain_claims() {
        let claim = row_to_claim(row("under_review")).expect("row converts");

        assert_eq!(claim.id.value(), 17);
        assert_eq!(claim.disaster_type, DisasterType::Flood);
        assert_eq!(claim.property_type, PropertyType::House);
        assert_eq!(claim.status, ClaimStatus::UnderReview);
        assert_eq!(claim.estimated_loss.cents(), 1_250_075);
        assert_eq!(
            claim.predicted_approval.map(|p| p.hundredths()),
            Some(85)
        );
        assert_eq!(claim.claim_number.as_deref(), Some("CLM-202417"));
    }

    #[rstest]
    #[case("open")]
    #[case("")]
    fn unrecognised_status_values_are_query_errors(#[case] status: &str) {
        let err = row_to_claim(row(status)).expect_err("corrupt rows must not default");
        assert!(matches!(err, ClaimRepositoryError::Query { .. }));
    }

    #[test]
    fn pool_errors_map_to_connection_errors() {
        let err = map_pool_error(PoolError::checkout("refused"));
        assert!(matches!(err, ClaimRepositoryError::Connection { .. }));
    }
}
