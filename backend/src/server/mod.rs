//! Server bootstrap: configuration and dependency wiring.

pub mod config;

use std::io;
use std::sync::Arc;

use crate::domain::{
    AccountsService, ClaimsService, FeedReconciler, NotificationsService,
};
use crate::inbound::http::state::HttpState;
use crate::outbound::blob::FsBlobStore;
use crate::outbound::fema::FemaHttpSource;
use crate::outbound::persistence::{
    DbPool, DieselAccountRepository, DieselClaimDocumentRepository, DieselClaimRepository,
    DieselDisasterUpdateRepository, DieselNotificationRepository, DieselUserProfileRepository,
    PoolConfig,
};

pub use config::{AppConfig, ConfigError};

/// Wire every adapter and service into the HTTP state bundle.
///
/// # Errors
///
/// Fails when the connection pool, blob root, or feed client cannot be
/// constructed.
pub async fn build_state(config: &AppConfig) -> io::Result<HttpState> {
    let pool = DbPool::new(PoolConfig::new(&config.database_url))
        .await
        .map_err(|err| io::Error::other(err.to_string()))?;

    let accounts = Arc::new(DieselAccountRepository::new(pool.clone()));
    let profiles = Arc::new(DieselUserProfileRepository::new(pool.clone()));
    let claims = Arc::new(DieselClaimRepository::new(pool.clone()));
    let documents = Arc::new(DieselClaimDocumentRepository::new(pool.clone()));
    let notifications = Arc::new(DieselNotificationRepository::new(pool.clone()));
    let disaster_updates = Arc::new(DieselDisasterUpdateRepository::new(pool));

    let blobs = Arc::new(
        FsBlobStore::open(&config.blob_root)
            .map_err(|err| io::Error::other(format!("blob root failed to open: {err}")))?,
    );
    let feed_source = Arc::new(
        FemaHttpSource::new(config.feed_endpoint.clone(), config.feed_timeout)
            .map_err(|err| io::Error::other(format!("feed client failed to build: {err}")))?,
    );

    Ok(HttpState::new(
        Arc::new(AccountsService::new(Arc::clone(&accounts), profiles)),
        Arc::new(ClaimsService::new(claims, documents, blobs)),
        Arc::new(NotificationsService::new(notifications, accounts)),
        Arc::new(FeedReconciler::with_fetch_limit(
            feed_source,
            disaster_updates,
            config.feed_fetch_limit,
        )),
    ))
}
