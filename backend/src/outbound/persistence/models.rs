//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. They exist solely to satisfy Diesel's
//! type requirements for queries and mutations.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{claim_documents, claims, disaster_updates, notifications, user_profiles, users};

// ---------------------------------------------------------------------------
// Users and profiles
// ---------------------------------------------------------------------------

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub username: String,
    pub password_salt: String,
    pub password_digest: String,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
    #[expect(dead_code, reason = "schema field for future audit trail support")]
    pub updated_at: DateTime<Utc>,
}

/// Insertable struct for creating new accounts.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub username: &'a str,
    pub password_salt: &'a str,
    pub password_digest: &'a str,
}

/// Row struct for reading from the user_profiles table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = user_profiles)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserProfileRow {
    pub user_id: Uuid,
    pub phone: Option<String>,
    pub emergency_contact: Option<String>,
    pub street: Option<String>,
    pub city: Option<String>,
    pub region: Option<String>,
    pub country: Option<String>,
    pub postal_code: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insertable struct for the empty profile created at registration.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = user_profiles)]
pub(crate) struct NewUserProfileRow {
    pub user_id: Uuid,
}

/// Changeset for partial profile updates; `None` fields are left untouched.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = user_profiles)]
pub(crate) struct UserProfileChangeset<'a> {
    pub phone: Option<&'a str>,
    pub emergency_contact: Option<&'a str>,
    pub street: Option<&'a str>,
    pub city: Option<&'a str>,
    pub region: Option<&'a str>,
    pub country: Option<&'a str>,
    pub postal_code: Option<&'a str>,
    pub updated_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Claims
// ---------------------------------------------------------------------------

/// Row struct for reading from the claims table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = claims)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ClaimRow {
    pub id: i64,
    pub user_id: Uuid,
    pub disaster_type: String,
    pub property_type: String,
    pub description: String,
    pub estimated_loss_cents: i64,
    pub status: String,
    pub predicted_approval_hundredths: Option<i16>,
    pub predicted_limit_cents: Option<i64>,
    pub claim_number: Option<String>,
    pub insurance_policy_number: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insertable struct for creating new claims.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = claims)]
pub(crate) struct NewClaimRow<'a> {
    pub user_id: Uuid,
    pub disaster_type: &'a str,
    pub property_type: &'a str,
    pub description: &'a str,
    pub estimated_loss_cents: i64,
    pub status: &'a str,
}

/// Changeset writing the derived display identifiers back onto a claim.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = claims)]
pub(crate) struct ClaimIdentifierChangeset<'a> {
    pub claim_number: &'a str,
    pub insurance_policy_number: &'a str,
    pub updated_at: DateTime<Utc>,
}

/// Changeset for owner-editable amendments; `None` fields are left untouched.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = claims)]
pub(crate) struct ClaimAmendmentChangeset<'a> {
    pub description: Option<&'a str>,
    pub estimated_loss_cents: Option<i64>,
    pub updated_at: DateTime<Utc>,
}

/// Changeset recording an adjudication outcome.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = claims)]
pub(crate) struct ClaimReviewChangeset<'a> {
    pub status: &'a str,
    pub predicted_approval_hundredths: Option<i16>,
    pub predicted_limit_cents: Option<i64>,
    pub updated_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Claim documents
// ---------------------------------------------------------------------------

/// Row struct for reading from the claim_documents table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = claim_documents)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ClaimDocumentRow {
    pub id: i64,
    pub claim_id: i64,
    pub filename: String,
    pub content_type: String,
    pub size_bytes: i64,
    pub blob_ref: String,
    pub uploaded_at: DateTime<Utc>,
}

/// Insertable struct for attachment rows.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = claim_documents)]
pub(crate) struct NewClaimDocumentRow<'a> {
    pub claim_id: i64,
    pub filename: &'a str,
    pub content_type: &'a str,
    pub size_bytes: i64,
    pub blob_ref: &'a str,
}

// ---------------------------------------------------------------------------
// Disaster updates
// ---------------------------------------------------------------------------

/// Row struct for reading from the disaster_updates table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = disaster_updates)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct DisasterUpdateRow {
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
    pub updated_at: DateTime<Utc>,
}

/// Insertable struct for the natural-key merge.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = disaster_updates)]
pub(crate) struct NewDisasterUpdateRow<'a> {
    pub title: &'a str,
    pub location: &'a str,
    pub disaster_type: &'a str,
    pub severity: i16,
    pub declaration_type: &'a str,
    pub declaration_display: &'a str,
    pub assistance_available: bool,
    pub source: &'a str,
    pub url: &'a str,
    pub updated_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Notifications
// ---------------------------------------------------------------------------

/// Row struct for reading from the notifications table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = notifications)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct NotificationRow {
    pub id: i64,
    pub user_id: Uuid,
    pub title: String,
    pub message: String,
    pub kind: String,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for appending ledger rows.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = notifications)]
pub(crate) struct NewNotificationRow<'a> {
    pub user_id: Uuid,
    pub title: &'a str,
    pub message: &'a str,
    pub kind: &'a str,
}
