//! Registration, login, and logout handlers.
//!
//! ```text
//! POST /api/v1/register {"username":"taylor","password":"..."}
//! POST /api/v1/login    {"username":"taylor","password":"..."}
//! POST /api/v1/logout
//! ```

use actix_web::{post, web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::domain::ports::{Account, Registration};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::missing_field_error;
use crate::inbound::http::ApiResult;

/// Request body for registration and login.
#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialsRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

impl CredentialsRequest {
    fn into_parts(self) -> ApiResult<(String, String)> {
        let username = self.username.ok_or_else(|| missing_field_error("username"))?;
        let password = self.password.ok_or_else(|| missing_field_error("password"))?;
        Ok((username, password))
    }
}

/// Response body describing an account.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountResponse {
    pub id: String,
    pub username: String,
    pub is_admin: bool,
    pub created_at: String,
}

impl From<Account> for AccountResponse {
    fn from(account: Account) -> Self {
        Self {
            id: account.id.to_string(),
            username: account.username,
            is_admin: account.is_admin,
            created_at: account.created_at.to_rfc3339(),
        }
    }
}

/// Register a new account; its empty profile is created atomically.
#[post("/register")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<CredentialsRequest>,
) -> ApiResult<HttpResponse> {
    let (username, password) = payload.into_inner().into_parts()?;
    let account = state
        .accounts
        .register(Registration { username, password })
        .await?;
    Ok(HttpResponse::Created().json(AccountResponse::from(account)))
}

/// Authenticate and establish a session.
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CredentialsRequest>,
) -> ApiResult<HttpResponse> {
    let (username, password) = payload.into_inner().into_parts()?;
    let principal = state.accounts.login(&username, &password).await?;
    session.persist_principal(&principal)?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "id": principal.id().to_string(),
        "isAdmin": principal.is_admin(),
    })))
}

/// Drop the session.
#[post("/logout")]
pub async fn logout(session: SessionContext) -> ApiResult<HttpResponse> {
    session.require_principal()?;
    session.clear();
    Ok(HttpResponse::NoContent().finish())
}
