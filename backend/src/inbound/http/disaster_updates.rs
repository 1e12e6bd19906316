//! Disaster update HTTP handlers.
//!
//! The read path only reads. Reconciliation runs through the separate
//! refresh endpoint so list requests never inherit upstream latency.
//!
//! ```text
//! GET  /api/v1/disaster-updates
//! POST /api/v1/disaster-updates/refresh
//! ```

use actix_web::{get, post, web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::domain::ports::RefreshScope;
use crate::domain::DisasterUpdate;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::ApiResult;

const DEFAULT_LIST_LIMIT: i64 = 50;
const MAX_LIST_LIMIT: i64 = 200;

/// Query parameters for the listing endpoint.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub limit: Option<i64>,
}

/// Request body for `POST /api/v1/disaster-updates/refresh` (administrative).
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    #[serde(default)]
    pub states: Vec<String>,
}

/// Response payload for one disaster update.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisasterUpdateResponse {
    pub id: i64,
    pub title: String,
    pub location: String,
    pub disaster_type: String,
    pub severity: i16,
    pub declaration_type: String,
    pub declaration_display: String,
    pub assistance_available: bool,
    pub source: String,
    pub url: String,
    pub updated_at: String,
}

impl From<DisasterUpdate> for DisasterUpdateResponse {
    fn from(update: DisasterUpdate) -> Self {
        Self {
            id: update.id,
            title: update.title,
            location: update.location,
            disaster_type: update.disaster_type.to_string(),
            severity: update.severity.level(),
            declaration_type: update.declaration_type,
            declaration_display: update.declaration_display,
            assistance_available: update.assistance_available,
            source: update.source,
            url: update.url,
            updated_at: update.updated_at.to_rfc3339(),
        }
    }
}

fn clamp_limit(limit: Option<i64>) -> i64 {
    limit.unwrap_or(DEFAULT_LIST_LIMIT).clamp(1, MAX_LIST_LIMIT)
}

/// List stored disaster updates, newest first.
#[get("/disaster-updates")]
pub async fn list_disaster_updates(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<ListQuery>,
) -> ApiResult<web::Json<Vec<DisasterUpdateResponse>>> {
    session.require_principal()?;
    let updates = state.disaster_feed.latest(clamp_limit(query.limit)).await?;
    Ok(web::Json(
        updates
            .into_iter()
            .map(DisasterUpdateResponse::from)
            .collect(),
    ))
}

/// Trigger one reconciliation pass (administrative actors only).
///
/// Upstream failures surface in the outcome payload, never as an error
/// status; existing rows are untouched either way.
#[post("/disaster-updates/refresh")]
pub async fn refresh_disaster_updates(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<RefreshRequest>,
) -> ApiResult<HttpResponse> {
    let principal = session.require_principal()?;
    let outcome = state
        .disaster_feed
        .refresh(
            &principal,
            RefreshScope {
                states: payload.into_inner().states,
            },
        )
        .await?;
    Ok(HttpResponse::Ok().json(outcome))
}
