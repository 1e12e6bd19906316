//! Port for account storage: registration, credential lookup, existence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::principal::UserId;

use super::define_port_error;

define_port_error! {
    /// Errors raised by account repository adapters.
    pub enum AccountRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "account repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "account repository query failed: {message}",
        /// The requested username is already registered.
        DuplicateUsername { username: String } =>
            "username {username} is already registered",
    }
}

/// A registered account, without credential material.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub id: UserId,
    pub username: String,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

/// Credential material for password verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredCredentials {
    pub account: Account,
    pub password_salt: String,
    pub password_digest: String,
}

/// Registration payload: account fields plus pre-hashed credential material.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccount {
    pub id: UserId,
    pub username: String,
    pub password_salt: String,
    pub password_digest: String,
}

/// Port for account storage.
///
/// Registration creates the account and its empty profile in one transaction
/// so a profile exists for every registered principal.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Create an account and its 1:1 profile atomically.
    async fn create_with_profile(
        &self,
        account: &NewAccount,
    ) -> Result<Account, AccountRepositoryError>;

    /// Fetch credential material by username.
    async fn find_credentials(
        &self,
        username: &str,
    ) -> Result<Option<StoredCredentials>, AccountRepositoryError>;

    /// Whether a principal with this id exists.
    async fn exists(&self, id: &UserId) -> Result<bool, AccountRepositoryError>;
}

/// Fixture implementation with no registered accounts.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureAccountRepository;

#[async_trait]
impl AccountRepository for FixtureAccountRepository {
    async fn create_with_profile(
        &self,
        account: &NewAccount,
    ) -> Result<Account, AccountRepositoryError> {
        Ok(Account {
            id: account.id,
            username: account.username.clone(),
            is_admin: false,
            created_at: Utc::now(),
        })
    }

    async fn find_credentials(
        &self,
        _username: &str,
    ) -> Result<Option<StoredCredentials>, AccountRepositoryError> {
        Ok(None)
    }

    async fn exists(&self, _id: &UserId) -> Result<bool, AccountRepositoryError> {
        Ok(false)
    }
}
