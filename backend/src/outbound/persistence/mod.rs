//! Diesel/PostgreSQL outbound adapters.
//!
//! One repository per domain port, a shared async connection pool, and the
//! embedded migrations that keep `schema.rs` honest.

mod diesel_account_repository;
mod diesel_claim_document_repository;
mod diesel_claim_repository;
mod diesel_disaster_update_repository;
mod diesel_notification_repository;
mod diesel_user_profile_repository;
mod error_mapping;
mod models;
pub mod pool;
pub mod schema;

use diesel::{Connection, PgConnection};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};

pub use diesel_account_repository::DieselAccountRepository;
pub use diesel_claim_document_repository::DieselClaimDocumentRepository;
pub use diesel_claim_repository::DieselClaimRepository;
pub use diesel_disaster_update_repository::DieselDisasterUpdateRepository;
pub use diesel_notification_repository::DieselNotificationRepository;
pub use diesel_user_profile_repository::DieselUserProfileRepository;
pub use pool::{DbPool, PoolConfig, PoolError};

/// Migrations compiled into the binary.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

/// Run pending migrations over a short-lived synchronous connection.
///
/// # Errors
///
/// Returns a description of the connection or migration failure.
pub fn run_pending_migrations(database_url: &str) -> Result<(), String> {
    let mut conn = PgConnection::establish(database_url)
        .map_err(|err| format!("failed to connect for migrations: {err}"))?;
    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|err| format!("failed to run migrations: {err}"))?;
    Ok(())
}
