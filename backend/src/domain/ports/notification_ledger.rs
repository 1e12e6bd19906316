//! Driving port for the notification ledger use-cases.

use async_trait::async_trait;

use crate::domain::notification::{NewNotification, Notification};
use crate::domain::principal::Principal;
use crate::domain::Error;

/// Use-cases over notifications, all scoped by the access guard.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationLedger: Send + Sync {
    /// Append a notification (administrative actors only).
    async fn create(
        &self,
        principal: &Principal,
        notification: NewNotification,
    ) -> Result<Notification, Error>;

    /// List accessible notifications, newest first.
    async fn list(&self, principal: &Principal) -> Result<Vec<Notification>, Error>;

    /// Mark one accessible notification read (idempotent).
    async fn mark_read(&self, principal: &Principal, id: i64) -> Result<Notification, Error>;

    /// Mark every accessible unread notification read; returns rows flipped.
    async fn mark_all_read(&self, principal: &Principal) -> Result<u64, Error>;

    /// Count the caller's unread notifications.
    async fn unread_count(&self, principal: &Principal) -> Result<u64, Error>;

    /// Delete one accessible notification.
    async fn remove(&self, principal: &Principal, id: i64) -> Result<(), Error>;
}
