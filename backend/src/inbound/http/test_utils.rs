//! Shared helpers for HTTP adapter tests.

use std::sync::Arc;

use actix_session::storage::CookieSessionStore;
use actix_session::SessionMiddleware;
use actix_web::cookie::Key;

use crate::domain::ports::{AccountAccess, ClaimWorkflow, DisasterFeed, NotificationLedger};
use crate::inbound::http::state::HttpState;

/// Cookie session middleware with a throwaway key for tests.
pub(crate) fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".into())
        .cookie_secure(false)
        .build()
}

/// Build an [`HttpState`] from individual port implementations.
pub(crate) fn test_state(
    accounts: Arc<dyn AccountAccess>,
    claims: Arc<dyn ClaimWorkflow>,
    notifications: Arc<dyn NotificationLedger>,
    disaster_feed: Arc<dyn DisasterFeed>,
) -> HttpState {
    HttpState::new(accounts, claims, notifications, disaster_feed)
}
