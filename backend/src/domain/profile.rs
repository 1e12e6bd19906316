//! User profile aggregate.
//!
//! One profile exists per registered principal, created atomically with the
//! account. The structured-address form is canonical.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::principal::UserId;

/// Structured postal address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostalAddress {
    pub street: String,
    pub city: String,
    pub region: String,
    pub country: String,
    pub postal_code: String,
}

/// A principal's profile record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub user_id: UserId,
    pub phone: Option<String>,
    pub emergency_contact: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<PostalAddress>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Partial profile update; `None` leaves the field unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileUpdate {
    pub phone: Option<String>,
    pub emergency_contact: Option<String>,
    pub address: Option<PostalAddress>,
}

impl ProfileUpdate {
    /// Whether the update would change nothing.
    pub fn is_empty(&self) -> bool {
        self.phone.is_none() && self.emergency_contact.is_none() && self.address.is_none()
    }
}
