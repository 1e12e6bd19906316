//! Port for the notification ledger.

use async_trait::async_trait;

use crate::domain::notification::{NewNotification, Notification};
use crate::domain::principal::UserId;

use super::define_port_error;

define_port_error! {
    /// Errors raised by notification repository adapters.
    pub enum NotificationRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "notification repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "notification repository query failed: {message}",
    }
}

/// Port for notification storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationRepository: Send + Sync {
    /// Append one notification to the ledger.
    async fn insert(
        &self,
        notification: &NewNotification,
    ) -> Result<Notification, NotificationRepositoryError>;

    /// Fetch one notification by identity.
    async fn find_by_id(
        &self,
        id: i64,
    ) -> Result<Option<Notification>, NotificationRepositoryError>;

    /// List notifications owned by one principal, newest first.
    async fn list_for_owner(
        &self,
        owner: &UserId,
    ) -> Result<Vec<Notification>, NotificationRepositoryError>;

    /// List every notification, newest first.
    async fn list_all(&self) -> Result<Vec<Notification>, NotificationRepositoryError>;

    /// Mark one notification read; marking an already-read row is a no-op.
    async fn mark_read(&self, id: i64) -> Result<Notification, NotificationRepositoryError>;

    /// Mark all unread notifications read in one statement.
    ///
    /// `owner` scopes the update to one principal; `None` covers every row
    /// (the administrative override). Returns the number of rows flipped.
    async fn mark_all_read(
        &self,
        owner: Option<UserId>,
    ) -> Result<u64, NotificationRepositoryError>;

    /// Count unread notifications for one principal.
    async fn unread_count(&self, owner: &UserId) -> Result<u64, NotificationRepositoryError>;

    /// Delete one notification.
    async fn delete(&self, id: i64) -> Result<(), NotificationRepositoryError>;
}

/// Fixture implementation with an empty ledger.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureNotificationRepository;

#[async_trait]
impl NotificationRepository for FixtureNotificationRepository {
    async fn insert(
        &self,
        _notification: &NewNotification,
    ) -> Result<Notification, NotificationRepositoryError> {
        Err(NotificationRepositoryError::query("fixture ledger is empty"))
    }

    async fn find_by_id(
        &self,
        _id: i64,
    ) -> Result<Option<Notification>, NotificationRepositoryError> {
        Ok(None)
    }

    async fn list_for_owner(
        &self,
        _owner: &UserId,
    ) -> Result<Vec<Notification>, NotificationRepositoryError> {
        Ok(Vec::new())
    }

    async fn list_all(&self) -> Result<Vec<Notification>, NotificationRepositoryError> {
        Ok(Vec::new())
    }

    async fn mark_read(&self, _id: i64) -> Result<Notification, NotificationRepositoryError> {
        Err(NotificationRepositoryError::query("fixture ledger is empty"))
    }

    async fn mark_all_read(
        &self,
        _owner: Option<UserId>,
    ) -> Result<u64, NotificationRepositoryError> {
        Ok(0)
    }

    async fn unread_count(&self, _owner: &UserId) -> Result<u64, NotificationRepositoryError> {
        Ok(0)
    }

    async fn delete(&self, _id: i64) -> Result<(), NotificationRepositoryError> {
        Ok(())
    }
}
