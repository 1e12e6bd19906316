//! Domain ports: driving use-case traits consumed by inbound adapters and
//! driven collaborator traits implemented by outbound adapters.
//!
//! Every driven port ships a fixture implementation for tests that do not
//! exercise it, and a mockall mock under `cfg(test)`.

mod account_access;
mod account_repository;
mod blob_store;
mod claim_document_repository;
mod claim_repository;
mod claim_workflow;
mod disaster_feed;
mod disaster_feed_source;
mod disaster_update_repository;
mod macros;
mod notification_ledger;
mod notification_repository;
mod user_profile_repository;

pub(crate) use macros::define_port_error;

pub use account_access::{AccountAccess, Registration};
pub use account_repository::{
    Account, AccountRepository, AccountRepositoryError, FixtureAccountRepository, NewAccount,
    StoredCredentials,
};
pub use blob_store::{BlobStoreError, DocumentBlobStore, FixtureDocumentBlobStore};
pub use claim_document_repository::{
    ClaimDocumentRepository, ClaimDocumentRepositoryError, FixtureClaimDocumentRepository,
};
pub use claim_repository::{ClaimRepository, ClaimRepositoryError, FixtureClaimRepository};
pub use claim_workflow::{ClaimSubmission, ClaimWorkflow, SubmittedClaim};
pub use disaster_feed::{DisasterFeed, RefreshOutcome, RefreshScope};
pub use disaster_feed_source::{
    DeclarationRecord, DisasterFeedSource, DisasterFeedSourceError, FeedQuery,
    FixtureDisasterFeedSource,
};
pub use disaster_update_repository::{
    DisasterUpdateRepository, DisasterUpdateRepositoryError, FixtureDisasterUpdateRepository,
};
pub use notification_ledger::NotificationLedger;
pub use notification_repository::{
    FixtureNotificationRepository, NotificationRepository, NotificationRepositoryError,
};
pub use user_profile_repository::{
    FixtureUserProfileRepository, UserProfileRepository, UserProfileRepositoryError,
};

#[cfg(test)]
pub use account_access::MockAccountAccess;
#[cfg(test)]
pub use account_repository::MockAccountRepository;
#[cfg(test)]
pub use blob_store::MockDocumentBlobStore;
#[cfg(test)]
pub use claim_document_repository::MockClaimDocumentRepository;
#[cfg(test)]
pub use claim_repository::MockClaimRepository;
#[cfg(test)]
pub use claim_workflow::MockClaimWorkflow;
#[cfg(test)]
pub use disaster_feed::MockDisasterFeed;
#[cfg(test)]
pub use disaster_feed_source::MockDisasterFeedSource;
#[cfg(test)]
pub use disaster_update_repository::MockDisasterUpdateRepository;
#[cfg(test)]
pub use notification_ledger::MockNotificationLedger;
#[cfg(test)]
pub use notification_repository::MockNotificationRepository;
#[cfg(test)]
pub use user_profile_repository::MockUserProfileRepository;
