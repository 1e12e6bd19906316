//! Domain primitives, aggregates, services, and ports.
//!
//! Types here are transport and storage agnostic. Inbound adapters translate
//! them to HTTP; outbound adapters persist them. Invariants live on the types
//! themselves (validated constructors) or in the services.

pub mod accounts_service;
pub mod claim;
pub mod claims_service;
pub mod disaster_update;
pub mod document;
pub mod error;
pub mod money;
pub mod notification;
pub mod notifications_service;
pub mod ports;
pub mod principal;
pub mod profile;
pub mod reconciler;

pub use self::accounts_service::AccountsService;
pub use self::claim::{
    derive_identifiers, Claim, ClaimAmendment, ClaimId, ClaimIdentifiers, ClaimReview, ClaimStatus,
    DisasterType, NewClaim, PropertyType,
};
pub use self::claims_service::ClaimsService;
pub use self::disaster_update::{DisasterUpdate, DisasterUpdateDraft, Severity};
pub use self::document::{
    blob_path, validate_upload, ClaimDocument, DocumentRejection, DocumentUpload,
    NewClaimDocument, ALLOWED_EXTENSIONS, MAX_DOCUMENT_BYTES,
};
pub use self::error::{Error, ErrorCode};
pub use self::money::{FixedPointParseError, Money, Probability};
pub use self::notification::{NewNotification, Notification, NotificationKind};
pub use self::notifications_service::NotificationsService;
pub use self::principal::{Principal, UserId, UserIdParseError};
pub use self::profile::{PostalAddress, ProfileUpdate, UserProfile};
pub use self::reconciler::FeedReconciler;

/// Convenient API result alias.
pub type ApiResult<T> = Result<T, Error>;
