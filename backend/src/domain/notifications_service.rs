//! Notification ledger domain service.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::notification::{NewNotification, Notification};
use crate::domain::ports::{
    AccountRepository, AccountRepositoryError, NotificationLedger, NotificationRepository,
    NotificationRepositoryError,
};
use crate::domain::principal::Principal;
use crate::domain::Error;

/// Notification service implementing the driving port.
#[derive(Clone)]
pub struct NotificationsService<N, A> {
    notifications: Arc<N>,
    accounts: Arc<A>,
}

impl<N, A> NotificationsService<N, A> {
    /// Create a new service over the ledger store and the account directory.
    pub fn new(notifications: Arc<N>, accounts: Arc<A>) -> Self {
        Self {
            notifications,
            accounts,
        }
    }
}

fn map_ledger_error(error: NotificationRepositoryError) -> Error {
    match error {
        NotificationRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("notification store unavailable: {message}"))
        }
        NotificationRepositoryError::Query { message } => {
            Error::internal(format!("notification store error: {message}"))
        }
    }
}

fn map_account_error(error: AccountRepositoryError) -> Error {
    match error {
        AccountRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("account store unavailable: {message}"))
        }
        AccountRepositoryError::Query { message }
        | AccountRepositoryError::DuplicateUsername { username: message } => {
            Error::internal(format!("account store error: {message}"))
        }
    }
}

impl<N, A> NotificationsService<N, A>
where
    N: NotificationRepository,
    A: AccountRepository,
{
    async fn fetch_guarded(&self, principal: &Principal, id: i64) -> Result<Notification, Error> {
        let notification = self
            .notifications
            .find_by_id(id)
            .await
            .map_err(map_ledger_error)?
            .ok_or_else(|| Error::not_found("notification not found"))?;
        principal.authorize_owner(&notification.user_id, "notification")?;
        Ok(notification)
    }
}

#[async_trait]
impl<N, A> NotificationLedger for NotificationsService<N, A>
where
    N: NotificationRepository,
    A: AccountRepository,
{
    async fn create(
        &self,
        principal: &Principal,
        notification: NewNotification,
    ) -> Result<Notification, Error> {
        principal.require_admin()?;
        let known = self
            .accounts
            .exists(&notification.user_id)
            .await
            .map_err(map_account_error)?;
        if !known {
            return Err(Error::invalid_request(format!(
                "no principal with id {}",
                notification.user_id
            )));
        }
        self.notifications
            .insert(&notification)
            .await
            .map_err(map_ledger_error)
    }

    async fn list(&self, principal: &Principal) -> Result<Vec<Notification>, Error> {
        let rows = if principal.is_admin() {
            self.notifications.list_all().await
        } else {
            self.notifications.list_for_owner(principal.id()).await
        };
        rows.map_err(map_ledger_error)
    }

    async fn mark_read(&self, principal: &Principal, id: i64) -> Result<Notification, Error> {
        let notification = self.fetch_guarded(principal, id).await?;
        if notification.read {
            // Idempotent: already-read rows succeed without another write.
            return Ok(notification);
        }
        self.notifications
            .mark_read(id)
            .await
            .map_err(map_ledger_error)
    }

    async fn mark_all_read(&self, principal: &Principal) -> Result<u64, Error> {
        let owner = if principal.is_admin() {
            None
        } else {
            Some(*principal.id())
        };
        self.notifications
            .mark_all_read(owner)
            .await
            .map_err(map_ledger_error)
    }

    async fn unread_count(&self, principal: &Principal) -> Result<u64, Error> {
        self.notifications
            .unread_count(principal.id())
            .await
            .map_err(map_ledger_error)
    }

    async fn remove(&self, principal: &Principal, id: i64) -> Result<(), Error> {
        self.fetch_guarded(principal, id).await?;
        self.notifications
            .delete(id)
            .await
            .map_err(map_ledger_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::notification::NotificationKind;
    use crate::domain::ports::{MockAccountRepository, MockNotificationRepository};
    use crate::domain::principal::UserId;
    use crate::domain::ErrorCode;
    use chrono::Utc;

    fn notification(id: i64, owner: UserId, read: bool) -> Notification {
        Notification {
            id,
            user_id: owner,
            title: "claim update".to_owned(),
            message: "your claim moved to under review".to_owned(),
            kind: NotificationKind::Info,
            read,
            created_at: Utc::now(),
        }
    }

    fn service(
        notifications: MockNotificationRepository,
        accounts: MockAccountRepository,
    ) -> NotificationsService<MockNotificationRepository, MockAccountRepository> {
        NotificationsService::new(Arc::new(notifications), Arc::new(accounts))
    }

    #[tokio::test]
    async fn create_is_admin_only() {
        let principal = Principal::new(UserId::random(), false);
        let service = service(
            MockNotificationRepository::new(),
            MockAccountRepository::new(),
        );
        let payload =
            NewNotification::try_new(UserId::random(), "t", "m", NotificationKind::Info)
                .expect("valid payload");
        let err = service
            .create(&principal, payload)
            .await
            .expect_err("non-admin create must fail");
        assert_eq!(err.code(), ErrorCode::Forbidden);
    }

    #[tokio::test]
    async fn create_validates_the_referenced_principal() {
        let admin = Principal::new(UserId::random(), true);
        let mut accounts = MockAccountRepository::new();
        accounts.expect_exists().times(1).return_once(|_| Ok(false));
        let mut notifications = MockNotificationRepository::new();
        notifications.expect_insert().times(0);

        let service = service(notifications, accounts);
        let payload =
            NewNotification::try_new(UserId::random(), "t", "m", NotificationKind::Info)
                .expect("valid payload");
        let err = service
            .create(&admin, payload)
            .await
            .expect_err("unknown principal must fail validation");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
    }

    #[tokio::test]
    async fn mark_read_is_idempotent() {
        let owner = UserId::random();
        let principal = Principal::new(owner, false);
        let mut notifications = MockNotificationRepository::new();
        notifications
            .expect_find_by_id()
            .times(1)
            .return_once(move |id| Ok(Some(notification(id, owner, true))));
        notifications.expect_mark_read().times(0);

        let service = service(notifications, MockAccountRepository::new());
        let row = service
            .mark_read(&principal, 7)
            .await
            .expect("marking an already-read row succeeds");
        assert!(row.read);
    }

    #[tokio::test]
    async fn mark_read_flips_unread_rows() {
        let owner = UserId::random();
        let principal = Principal::new(owner, false);
        let mut notifications = MockNotificationRepository::new();
        notifications
            .expect_find_by_id()
            .times(1)
            .return_once(move |id| Ok(Some(notification(id, owner, false))));
        notifications
            .expect_mark_read()
            .times(1)
            .return_once(move |id| Ok(notification(id, owner, true)));

        let service = service(notifications, MockAccountRepository::new());
        let row = service.mark_read(&principal, 7).await.expect("mark succeeds");
        assert!(row.read);
    }

    #[tokio::test]
    async fn mark_all_read_scopes_to_the_caller() {
        let owner = UserId::random();
        let principal = Principal::new(owner, false);
        let mut notifications = MockNotificationRepository::new();
        notifications
            .expect_mark_all_read()
            .withf(move |scope| scope == &Some(owner))
            .times(1)
            .return_once(|_| Ok(3));

        let service = service(notifications, MockAccountRepository::new());
        assert_eq!(
            service.mark_all_read(&principal).await.expect("bulk mark"),
            3
        );
    }

    #[tokio::test]
    async fn admin_mark_all_read_is_unscoped() {
        let admin = Principal::new(UserId::random(), true);
        let mut notifications = MockNotificationRepository::new();
        notifications
            .expect_mark_all_read()
            .withf(|scope| scope.is_none())
            .times(1)
            .return_once(|_| Ok(12));

        let service = service(notifications, MockAccountRepository::new());
        assert_eq!(service.mark_all_read(&admin).await.expect("bulk mark"), 12);
    }

    #[tokio::test]
    async fn foreign_notifications_are_hidden() {
        let principal = Principal::new(UserId::random(), false);
        let foreign = UserId::random();
        let mut notifications = MockNotificationRepository::new();
        notifications
            .expect_find_by_id()
            .times(1)
            .return_once(move |id| Ok(Some(notification(id, foreign, false))));
        notifications.expect_delete().times(0);

        let service = service(notifications, MockAccountRepository::new());
        let err = service
            .remove(&principal, 4)
            .await
            .expect_err("foreign rows are hidden");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }
}
