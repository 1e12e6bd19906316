//! Authenticated principal and the ownership capability check.
//!
//! Every accessor in the domain funnels through [`Principal::authorize_owner`]
//! instead of re-implementing "is admin or owner" checks per resource. Foreign
//! resources are reported as missing so their existence is not revealed.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Error;

/// Validation errors returned when parsing a [`UserId`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserIdParseError {
    Empty,
    InvalidUuid,
}

impl fmt::Display for UserIdParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "user id must not be empty"),
            Self::InvalidUuid => write!(f, "user id must be a valid UUID"),
        }
    }
}

impl std::error::Error for UserIdParseError {}

/// Stable principal identifier stored as a UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(Uuid);

impl UserId {
    /// Validate and construct a [`UserId`] from string input.
    pub fn parse(raw: impl AsRef<str>) -> Result<Self, UserIdParseError> {
        let raw = raw.as_ref();
        if raw.trim().is_empty() {
            return Err(UserIdParseError::Empty);
        }
        Uuid::parse_str(raw)
            .map(Self)
            .map_err(|_| UserIdParseError::InvalidUuid)
    }

    /// Generate a new random [`UserId`].
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an already-validated UUID.
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// An authenticated actor making a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    id: UserId,
    is_admin: bool,
}

impl Principal {
    /// Construct a principal from its identity and role flag.
    pub fn new(id: UserId, is_admin: bool) -> Self {
        Self { id, is_admin }
    }

    /// The principal's stable identifier.
    pub fn id(&self) -> &UserId {
        &self.id
    }

    /// Whether the principal carries the administrative override.
    pub fn is_admin(&self) -> bool {
        self.is_admin
    }

    /// Capability check: admins may access anything, others only what they own.
    pub fn can_access(&self, owner: &UserId) -> bool {
        self.is_admin || self.id == *owner
    }

    /// Authorise direct access to an owned resource.
    ///
    /// Foreign resources fail with `NotFound` so unauthorised callers cannot
    /// distinguish "exists but not yours" from "does not exist".
    pub fn authorize_owner(&self, owner: &UserId, resource: &str) -> Result<(), Error> {
        if self.can_access(owner) {
            Ok(())
        } else {
            Err(Error::not_found(format!("{resource} not found")))
        }
    }

    /// Require the administrative role for an admin-only operation.
    pub fn require_admin(&self) -> Result<(), Error> {
        if self.is_admin {
            Ok(())
        } else {
            Err(Error::forbidden("administrator role required"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("not-a-uuid")]
    fn rejects_malformed_user_ids(#[case] raw: &str) {
        assert!(UserId::parse(raw).is_err());
    }

    #[test]
    fn parses_canonical_uuid() {
        let id = UserId::parse("3fa85f64-5717-4562-b3fc-2c963f66afa6").expect("valid id");
        assert_eq!(id.to_string(), "3fa85f64-5717-4562-b3fc-2c963f66afa6");
    }

    #[test]
    fn owner_may_access_own_resource() {
        let owner = UserId::random();
        let principal = Principal::new(owner, false);
        assert!(principal.can_access(&owner));
        assert!(principal.authorize_owner(&owner, "claim").is_ok());
    }

    #[test]
    fn foreign_access_is_reported_as_missing() {
        let principal = Principal::new(UserId::random(), false);
        let err = principal
            .authorize_owner(&UserId::random(), "claim")
            .expect_err("foreign access must fail");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[test]
    fn admin_override_grants_access_everywhere() {
        let admin = Principal::new(UserId::random(), true);
        assert!(admin.can_access(&UserId::random()));
        assert!(admin.require_admin().is_ok());
    }

    #[test]
    fn non_admin_is_forbidden_from_admin_operations() {
        let principal = Principal::new(UserId::random(), false);
        let err = principal.require_admin().expect_err("must be forbidden");
        assert_eq!(err.code(), ErrorCode::Forbidden);
    }
}
