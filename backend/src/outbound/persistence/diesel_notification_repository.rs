//! PostgreSQL-backed `NotificationRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::notification::{NewNotification, Notification, NotificationKind};
use crate::domain::ports::{NotificationRepository, NotificationRepositoryError};
use crate::domain::principal::UserId;

use super::error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{NewNotificationRow, NotificationRow};
use super::pool::{DbPool, PoolError};
use super::schema::notifications;

/// Diesel-backed implementation of the `NotificationRepository` port.
#[derive(Clone)]
pub struct DieselNotificationRepository {
    pool: DbPool,
}

impl DieselNotificationRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> NotificationRepositoryError {
    map_basic_pool_error(error, NotificationRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> NotificationRepositoryError {
    map_basic_diesel_error(
        error,
        NotificationRepositoryError::query,
        NotificationRepositoryError::connection,
    )
}

fn row_to_notification(row: NotificationRow) -> Result<Notification, NotificationRepositoryError> {
    let kind: NotificationKind = row
        .kind
        .parse()
        .map_err(|()| NotificationRepositoryError::query("unrecognised notification kind in storage"))?;
    Ok(Notification {
        id: row.id,
        user_id: UserId::from_uuid(row.user_id),
        title: row.title,
        message: row.message,
        kind,
        read: row.read,
        created_at: row.created_at,
    })
}

#[async_trait]
impl NotificationRepository for DieselNotificationRepository {
    async fn insert(
        &self,
        notification: &NewNotification,
    ) -> Result<Notification, NotificationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let new_row = NewNotificationRow {
            user_id: *notification.user_id.as_uuid(),
            title: notification.title.as_str(),
            message: notification.message.as_str(),
            kind: notification.kind.as_str(),
        };

        let row: NotificationRow = diesel::insert_into(notifications::table)
            .values(&new_row)
            .returning(NotificationRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        row_to_notification(row)
    }

    async fn find_by_id(
        &self,
        id: i64,
    ) -> Result<Option<Notification>, NotificationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<NotificationRow> = notifications::table
            .filter(notifications::id.eq(id))
            .select(NotificationRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_notification).transpose()
    }

    async fn list_for_owner(
        &self,
        owner: &UserId,
    ) -> Result<Vec<Notification>, NotificationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<NotificationRow> = notifications::table
            .filter(notifications::user_id.eq(owner.as_uuid()))
            .order(notifications::created_at.desc())
            .select(NotificationRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_notification).collect()
    }

    async fn list_all(&self) -> Result<Vec<Notification>, NotificationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<NotificationRow> = notifications::table
            .order(notifications::created_at.desc())
            .select(NotificationRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_notification).collect()
    }

    async fn mark_read(&self, id: i64) -> Result<Notification, NotificationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: NotificationRow =
            diesel::update(notifications::table.filter(notifications::id.eq(id)))
                .set(notifications::read.eq(true))
                .returning(NotificationRow::as_returning())
                .get_result(&mut conn)
                .await
                .map_err(map_diesel_error)?;

        row_to_notification(row)
    }

    async fn mark_all_read(
        &self,
        owner: Option<UserId>,
    ) -> Result<u64, NotificationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        // One scoped UPDATE; already-read rows are excluded so the returned
        // count reflects rows actually flipped.
        let flipped = match owner {
            Some(owner) => {
                diesel::update(
                    notifications::table
                        .filter(notifications::read.eq(false))
                        .filter(notifications::user_id.eq(owner.as_uuid())),
                )
                .set(notifications::read.eq(true))
                .execute(&mut conn)
                .await
            }
            None => {
                diesel::update(notifications::table.filter(notifications::read.eq(false)))
                    .set(notifications::read.eq(true))
                    .execute(&mut conn)
                    .await
            }
        }
        .map_err(map_diesel_error)?;

        Ok(flipped as u64)
    }

    async fn unread_count(&self, owner: &UserId) -> Result<u64, NotificationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let count: i64 = notifications::table
            .filter(notifications::user_id.eq(owner.as_uuid()))
            .filter(notifications::read.eq(false))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(count.max(0) as u64)
    }

    async fn delete(&self, id: i64) -> Result<(), NotificationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::delete(notifications::table.filter(notifications::id.eq(id)))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rstest::rstest;

    fn row(kind: &str) -> NotificationRow {
        NotificationRow {
            id: 4,
            user_id: uuid::Uuid::new_v4(),
            title: "claim update".to_owned(),
            message: "status changed".to_owned(),
            kind: kind.to_owned(),
            read: false,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn rows_convert_to_domain_notifications() {
        let notification = row_to_notification(row("warning")).expect("row converts");
        assert_eq!(notification.kind, NotificationKind::Warning);
        assert!(!notification.read);
    }

    #[rstest]
    #[case("alert")]
    #[case("")]
    fn unrecognised_kinds_are_query_errors(#[case] kind: &str) {
        let err = row_to_notification(row(kind)).expect_err("corrupt rows must not default");
        assert!(matches!(err, NotificationRepositoryError::Query { .. }));
    }
}
