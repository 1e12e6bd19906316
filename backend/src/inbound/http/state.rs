//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{AccountAccess, ClaimWorkflow, DisasterFeed, NotificationLedger};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub accounts: Arc<dyn AccountAccess>,
    pub claims: Arc<dyn ClaimWorkflow>,
    pub notifications: Arc<dyn NotificationLedger>,
    pub disaster_feed: Arc<dyn DisasterFeed>,
}

impl HttpState {
    /// Construct state from the four use-case ports.
    pub fn new(
        accounts: Arc<dyn AccountAccess>,
        claims: Arc<dyn ClaimWorkflow>,
        notifications: Arc<dyn NotificationLedger>,
        disaster_feed: Arc<dyn DisasterFeed>,
    ) -> Self {
        Self {
            accounts,
            claims,
            notifications,
            disaster_feed,
        }
    }
}
