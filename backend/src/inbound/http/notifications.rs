//! Notification ledger HTTP handlers.
//!
//! ```text
//! POST   /api/v1/notifications
//! GET    /api/v1/notifications
//! GET    /api/v1/notifications/unread-count
//! POST   /api/v1/notifications/read-all
//! POST   /api/v1/notifications/{id}/read
//! DELETE /api/v1/notifications/{id}
//! ```

use actix_web::{delete, get, post, web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::domain::{NewNotification, Notification};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    missing_field_error, parse_enum_field, parse_user_id_field,
};
use crate::inbound::http::ApiResult;

/// Request body for `POST /api/v1/notifications` (administrative).
#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateNotificationRequest {
    pub user_id: Option<String>,
    pub title: Option<String>,
    pub message: Option<String>,
    pub kind: Option<String>,
}

fn parse_new_notification(payload: CreateNotificationRequest) -> ApiResult<NewNotification> {
    let user_id = payload.user_id.ok_or_else(|| missing_field_error("userId"))?;
    let title = payload.title.ok_or_else(|| missing_field_error("title"))?;
    let message = payload.message.ok_or_else(|| missing_field_error("message"))?;
    let kind = payload.kind.ok_or_else(|| missing_field_error("kind"))?;

    NewNotification::try_new(
        parse_user_id_field("userId", &user_id)?,
        title,
        message,
        parse_enum_field("kind", &kind, "success, warning, info, danger")?,
    )
}

/// Response payload for one notification.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationResponse {
    pub id: i64,
    pub user_id: String,
    pub title: String,
    pub message: String,
    pub kind: String,
    pub read: bool,
    pub created_at: String,
}

impl From<Notification> for NotificationResponse {
    fn from(notification: Notification) -> Self {
        Self {
            id: notification.id,
            user_id: notification.user_id.to_string(),
            title: notification.title,
            message: notification.message,
            kind: notification.kind.to_string(),
            read: notification.read,
            created_at: notification.created_at.to_rfc3339(),
        }
    }
}

/// Append a notification to the ledger (administrative actors only).
#[post("/notifications")]
pub async fn create_notification(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateNotificationRequest>,
) -> ApiResult<HttpResponse> {
    let principal = session.require_principal()?;
    let notification = parse_new_notification(payload.into_inner())?;
    let created = state.notifications.create(&principal, notification).await?;
    Ok(HttpResponse::Created().json(NotificationResponse::from(created)))
}

/// List accessible notifications, newest first.
#[get("/notifications")]
pub async fn list_notifications(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<NotificationResponse>>> {
    let principal = session.require_principal()?;
    let rows = state.notifications.list(&principal).await?;
    Ok(web::Json(
        rows.into_iter().map(NotificationResponse::from).collect(),
    ))
}

/// Count the caller's unread notifications.
#[get("/notifications/unread-count")]
pub async fn unread_count(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let principal = session.require_principal()?;
    let count = state.notifications.unread_count(&principal).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "count": count })))
}

/// Mark every accessible unread notification read.
#[post("/notifications/read-all")]
pub async fn mark_all_read(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let principal = session.require_principal()?;
    let updated = state.notifications.mark_all_read(&principal).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "updated": updated })))
}

/// Mark one accessible notification read (idempotent).
#[post("/notifications/{id}/read")]
pub async fn mark_read(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
) -> ApiResult<web::Json<NotificationResponse>> {
    let principal = session.require_principal()?;
    let row = state
        .notifications
        .mark_read(&principal, path.into_inner())
        .await?;
    Ok(web::Json(NotificationResponse::from(row)))
}

/// Delete one accessible notification.
#[delete("/notifications/{id}")]
pub async fn delete_notification(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    let principal = session.require_principal()?;
    state
        .notifications
        .remove(&principal, path.into_inner())
        .await?;
    Ok(HttpResponse::NoContent().finish())
}
