//! PostgreSQL-backed `UserProfileRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{UserProfileRepository, UserProfileRepositoryError};
use crate::domain::principal::UserId;
use crate::domain::profile::{PostalAddress, ProfileUpdate, UserProfile};

use super::error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{UserProfileChangeset, UserProfileRow};
use super::pool::{DbPool, PoolError};
use super::schema::user_profiles;

/// Diesel-backed implementation of the `UserProfileRepository` port.
#[derive(Clone)]
pub struct DieselUserProfileRepository {
    pool: DbPool,
}

impl DieselUserProfileRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserProfileRepositoryError {
    map_basic_pool_error(error, UserProfileRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> UserProfileRepositoryError {
    map_basic_diesel_error(
        error,
        UserProfileRepositoryError::query,
        UserProfileRepositoryError::connection,
    )
}

/// Convert a database row to a domain profile.
///
/// The structured address is surfaced only when every component is present;
/// partially filled address columns read back as no address.
fn row_to_profile(row: UserProfileRow) -> UserProfile {
    let address = match (row.street, row.city, row.region, row.country, row.postal_code) {
        (Some(street), Some(city), Some(region), Some(country), Some(postal_code)) => {
            Some(PostalAddress {
                street,
                city,
                region,
                country,
                postal_code,
            })
        }
        _ => None,
    };

    UserProfile {
        user_id: UserId::from_uuid(row.user_id),
        phone: row.phone,
        emergency_contact: row.emergency_contact,
        address,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }
}

#[async_trait]
impl UserProfileRepository for DieselUserProfileRepository {
    async fn find_by_user(
        &self,
        user_id: &UserId,
    ) -> Result<Option<UserProfile>, UserProfileRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<UserProfileRow> = user_profiles::table
            .filter(user_profiles::user_id.eq(user_id.as_uuid()))
            .select(UserProfileRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        Ok(row.map(row_to_profile))
    }

    async fn update(
        &self,
        user_id: &UserId,
        update: &ProfileUpdate,
    ) -> Result<Option<UserProfile>, UserProfileRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let changeset = UserProfileChangeset {
            phone: update.phone.as_deref(),
            emergency_contact: update.emergency_contact.as_deref(),
            street: update.address.as_ref().map(|a| a.street.as_str()),
            city: update.address.as_ref().map(|a| a.city.as_str()),
            region: update.address.as_ref().map(|a| a.region.as_str()),
            country: update.address.as_ref().map(|a| a.country.as_str()),
            postal_code: update.address.as_ref().map(|a| a.postal_code.as_str()),
            updated_at: Utc::now(),
        };

        let row: Option<UserProfileRow> =
            diesel::update(user_profiles::table.filter(user_profiles::user_id.eq(user_id.as_uuid())))
                .set(&changeset)
                .returning(UserProfileRow::as_returning())
                .get_result(&mut conn)
                .await
                .optional()
                .map_err(map_diesel_error)?;

        Ok(row.map(row_to_profile))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn row(street: Option<&str>) -> UserProfileRow {
        UserProfileRow {
            user_id: uuid::Uuid::new_v4(),
            phone: Some("+1-555-0100".to_owned()),
            emergency_contact: None,
            street: street.map(str::to_owned),
            city: Some("Sacramento".to_owned()),
            region: Some("CA".to_owned()),
            country: Some("US".to_owned()),
            postal_code: Some("95814".to_owned()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn complete_address_columns_surface_as_an_address() {
        let profile = row_to_profile(row(Some("1400 10th St")));
        let address = profile.address.expect("address present");
        assert_eq!(address.city, "Sacramento");
        assert_eq!(address.postal_code, "95814");
    }

    #[rstest]
    fn partial_address_columns_surface_as_no_address() {
        let profile = row_to_profile(row(None));
        assert!(profile.address.is_none());
        assert_eq!(profile.phone.as_deref(), Some("+1-555-0100"));
    }
}
