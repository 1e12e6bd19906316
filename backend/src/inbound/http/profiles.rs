//! Profile HTTP handlers.
//!
//! ```text
//! GET /api/v1/users/me/profile
//! PUT /api/v1/users/me/profile
//! GET /api/v1/users/{id}/profile
//! ```

use actix_web::{get, put, web};
use serde::{Deserialize, Serialize};

use crate::domain::{PostalAddress, ProfileUpdate, UserProfile};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{missing_field_error, parse_user_id_field};
use crate::inbound::http::ApiResult;

/// Structured address payload.
#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressPayload {
    pub street: Option<String>,
    pub city: Option<String>,
    pub region: Option<String>,
    pub country: Option<String>,
    pub postal_code: Option<String>,
}

impl AddressPayload {
    fn into_domain(self) -> ApiResult<PostalAddress> {
        Ok(PostalAddress {
            street: self.street.ok_or_else(|| missing_field_error("address.street"))?,
            city: self.city.ok_or_else(|| missing_field_error("address.city"))?,
            region: self.region.ok_or_else(|| missing_field_error("address.region"))?,
            country: self.country.ok_or_else(|| missing_field_error("address.country"))?,
            postal_code: self
                .postal_code
                .ok_or_else(|| missing_field_error("address.postalCode"))?,
        })
    }
}

/// Request body for `PUT /api/v1/users/me/profile`; absent fields are left
/// unchanged.
#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdateRequest {
    pub phone: Option<String>,
    pub emergency_contact: Option<String>,
    pub address: Option<AddressPayload>,
}

fn parse_profile_update(payload: ProfileUpdateRequest) -> ApiResult<ProfileUpdate> {
    Ok(ProfileUpdate {
        phone: payload.phone,
        emergency_contact: payload.emergency_contact,
        address: payload.address.map(AddressPayload::into_domain).transpose()?,
    })
}

/// Response payload for a profile.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub user_id: String,
    pub phone: Option<String>,
    pub emergency_contact: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<PostalAddress>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<UserProfile> for ProfileResponse {
    fn from(profile: UserProfile) -> Self {
        Self {
            user_id: profile.user_id.to_string(),
            phone: profile.phone,
            emergency_contact: profile.emergency_contact,
            address: profile.address,
            created_at: profile.created_at.to_rfc3339(),
            updated_at: profile.updated_at.to_rfc3339(),
        }
    }
}

/// Fetch the authenticated principal's profile.
#[get("/users/me/profile")]
pub async fn get_own_profile(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<ProfileResponse>> {
    let principal = session.require_principal()?;
    let user_id = *principal.id();
    let profile = state.accounts.fetch_profile(&principal, &user_id).await?;
    Ok(web::Json(ProfileResponse::from(profile)))
}

/// Update the authenticated principal's profile.
#[put("/users/me/profile")]
pub async fn update_own_profile(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<ProfileUpdateRequest>,
) -> ApiResult<web::Json<ProfileResponse>> {
    let principal = session.require_principal()?;
    let user_id = *principal.id();
    let update = parse_profile_update(payload.into_inner())?;
    let profile = state
        .accounts
        .update_profile(&principal, &user_id, update)
        .await?;
    Ok(web::Json(ProfileResponse::from(profile)))
}

/// Fetch one profile by principal id (self or administrative access).
#[get("/users/{id}/profile")]
pub async fn get_profile(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<ProfileResponse>> {
    let principal = session.require_principal()?;
    let user_id = parse_user_id_field("id", &path.into_inner())?;
    let profile = state.accounts.fetch_profile(&principal, &user_id).await?;
    Ok(web::Json(ProfileResponse::from(profile)))
}
