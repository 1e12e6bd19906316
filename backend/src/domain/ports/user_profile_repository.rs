//! Port for user profile persistence.

use async_trait::async_trait;

use crate::domain::principal::UserId;
use crate::domain::profile::{ProfileUpdate, UserProfile};

use super::define_port_error;

define_port_error! {
    /// Errors raised by profile repository adapters.
    pub enum UserProfileRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "profile repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "profile repository query failed: {message}",
    }
}

/// Port for profile storage and retrieval.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserProfileRepository: Send + Sync {
    /// Fetch the profile of one principal.
    async fn find_by_user(
        &self,
        user_id: &UserId,
    ) -> Result<Option<UserProfile>, UserProfileRepositoryError>;

    /// Apply a partial update and return the refreshed profile.
    ///
    /// Returns `Ok(None)` when no profile row exists for the principal.
    async fn update(
        &self,
        user_id: &UserId,
        update: &ProfileUpdate,
    ) -> Result<Option<UserProfile>, UserProfileRepositoryError>;
}

/// Fixture implementation with no stored profiles.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureUserProfileRepository;

#[async_trait]
impl UserProfileRepository for FixtureUserProfileRepository {
    async fn find_by_user(
        &self,
        _user_id: &UserId,
    ) -> Result<Option<UserProfile>, UserProfileRepositoryError> {
        Ok(None)
    }

    async fn update(
        &self,
        _user_id: &UserId,
        _update: &ProfileUpdate,
    ) -> Result<Option<UserProfile>, UserProfileRepositoryError> {
        Ok(None)
    }
}
