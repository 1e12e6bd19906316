//! PostgreSQL-backed `AccountRepository` implementation using Diesel ORM.
//!
//! Registration inserts the account row and its empty profile row inside one
//! transaction, so every registered principal has a profile.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};

use crate::domain::ports::{
    Account, AccountRepository, AccountRepositoryError, NewAccount, StoredCredentials,
};
use crate::domain::principal::UserId;

use super::error_mapping::{is_unique_violation, map_basic_diesel_error, map_basic_pool_error};
use super::models::{NewUserProfileRow, NewUserRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::{user_profiles, users};

/// Diesel-backed implementation of the `AccountRepository` port.
#[derive(Clone)]
pub struct DieselAccountRepository {
    pool: DbPool,
}

impl DieselAccountRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> AccountRepositoryError {
    map_basic_pool_error(error, AccountRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> AccountRepositoryError {
    map_basic_diesel_error(
        error,
        AccountRepositoryError::query,
        AccountRepositoryError::connection,
    )
}

fn row_to_account(row: &UserRow) -> Account {
    Account {
        id: UserId::from_uuid(row.id),
        username: row.username.clone(),
        is_admin: row.is_admin,
        created_at: row.created_at,
    }
}

#[async_trait]
impl AccountRepository for DieselAccountRepository {
    async fn create_with_profile(
        &self,
        account: &NewAccount,
    ) -> Result<Account, AccountRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let new_user = NewUserRow {
            id: *account.id.as_uuid(),
            username: account.username.as_str(),
            password_salt: account.password_salt.as_str(),
            password_digest: account.password_digest.as_str(),
        };

        let row = conn
            .transaction::<UserRow, diesel::result::Error, _>(|conn| {
                async move {
                    let user: UserRow = diesel::insert_into(users::table)
                        .values(&new_user)
                        .returning(UserRow::as_returning())
                        .get_result(conn)
                        .await?;
                    diesel::insert_into(user_profiles::table)
                        .values(&NewUserProfileRow { user_id: user.id })
                        .execute(conn)
                        .await?;
                    Ok(user)
                }
                .scope_boxed()
            })
            .await
            .map_err(|error| {
                if is_unique_violation(&error) {
                    AccountRepositoryError::duplicate_username(account.username.clone())
                } else {
                    map_diesel_error(error)
                }
            })?;

        Ok(row_to_account(&row))
    }

    async fn find_credentials(
        &self,
        username: &str,
    ) -> Result<Option<StoredCredentials>, AccountRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<UserRow> = users::table
            .filter(users::username.eq(username))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        Ok(row.map(|row| StoredCredentials {
            account: row_to_account(&row),
            password_salt: row.password_salt,
            password_digest: row.password_digest,
        }))
    }

    async fn exists(&self, id: &UserId) -> Result<bool, AccountRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let found: Option<uuid::Uuid> = users::table
            .filter(users::id.eq(id.as_uuid()))
            .select(users::id)
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        Ok(found.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn rows_convert_to_accounts_without_credentials() {
        let row = UserRow {
            id: uuid::Uuid::new_v4(),
            username: "taylor".to_owned(),
            password_salt: "salt".to_owned(),
            password_digest: "digest".to_owned(),
            is_admin: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let account = row_to_account(&row);
        assert_eq!(account.username, "taylor");
        assert!(account.is_admin);
        assert_eq!(account.id.as_uuid(), &row.id);
    }

    #[test]
    fn pool_errors_map_to_connection_errors() {
        let err = map_pool_error(PoolError::build("bad url"));
        assert!(matches!(err, AccountRepositoryError::Connection { .. }));
    }
}
