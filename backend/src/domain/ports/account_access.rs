//! Driving port for registration, login, and profile use-cases.

use async_trait::async_trait;

use crate::domain::principal::{Principal, UserId};
use crate::domain::profile::{ProfileUpdate, UserProfile};
use crate::domain::Error;

use super::account_repository::Account;

/// Registration payload as accepted from the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub username: String,
    pub password: String,
}

/// Use-cases over accounts and profiles.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountAccess: Send + Sync {
    /// Register an account; the empty profile is created atomically with it.
    async fn register(&self, registration: Registration) -> Result<Account, Error>;

    /// Verify credentials and return the authenticated principal.
    async fn login(&self, username: &str, password: &str) -> Result<Principal, Error>;

    /// Fetch a profile the principal may access.
    async fn fetch_profile(
        &self,
        principal: &Principal,
        user_id: &UserId,
    ) -> Result<UserProfile, Error>;

    /// Apply a partial profile update on behalf of the principal.
    async fn update_profile(
        &self,
        principal: &Principal,
        user_id: &UserId,
        update: ProfileUpdate,
    ) -> Result<UserProfile, Error>;
}
