//! Environment-driven application configuration.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use reqwest::Url;

use crate::outbound::fema::{DEFAULT_FEED_ENDPOINT, DEFAULT_FEED_TIMEOUT};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_SESSION_KEY_FILE: &str = "/var/run/secrets/session_key";
const DEFAULT_BLOB_ROOT: &str = "data/claim-documents";
const DEFAULT_FEED_FETCH_LIMIT: u32 = 10;

/// Configuration failure with the offending variable named.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("configuration error: {message}")]
pub struct ConfigError {
    message: String,
}

impl ConfigError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Application settings resolved from the environment.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub database_url: String,
    pub session_key_file: PathBuf,
    pub cookie_secure: bool,
    pub feed_endpoint: Url,
    pub feed_timeout: Duration,
    pub feed_fetch_limit: u32,
    pub blob_root: PathBuf,
}

fn env_or(name: &str, fallback: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| fallback.to_owned())
}

impl AppConfig {
    /// Resolve configuration from process environment variables.
    ///
    /// `DATABASE_URL` is required; everything else has a default.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] naming the variable that failed to resolve
    /// or parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        let bind_addr = env_or("BIND_ADDR", DEFAULT_BIND_ADDR)
            .parse()
            .map_err(|err| ConfigError::new(format!("BIND_ADDR is not a socket address: {err}")))?;
        let database_url = std::env::var("DATABASE_URL")
            .map_err(|_| ConfigError::new("DATABASE_URL is required"))?;
        let cookie_secure = env_or("SESSION_COOKIE_SECURE", "1") != "0";
        let feed_endpoint = env_or("FEMA_ENDPOINT", DEFAULT_FEED_ENDPOINT)
            .parse()
            .map_err(|err| ConfigError::new(format!("FEMA_ENDPOINT is not a URL: {err}")))?;
        let feed_timeout = match std::env::var("FEMA_TIMEOUT_SECS") {
            Ok(raw) => Duration::from_secs(raw.parse().map_err(|err| {
                ConfigError::new(format!("FEMA_TIMEOUT_SECS is not a number: {err}"))
            })?),
            Err(_) => DEFAULT_FEED_TIMEOUT,
        };
        let feed_fetch_limit = match std::env::var("FEMA_FETCH_LIMIT") {
            Ok(raw) => raw.parse().map_err(|err| {
                ConfigError::new(format!("FEMA_FETCH_LIMIT is not a number: {err}"))
            })?,
            Err(_) => DEFAULT_FEED_FETCH_LIMIT,
        };

        Ok(Self {
            bind_addr,
            database_url,
            session_key_file: PathBuf::from(env_or("SESSION_KEY_FILE", DEFAULT_SESSION_KEY_FILE)),
            cookie_secure,
            feed_endpoint,
            feed_timeout,
            feed_fetch_limit,
            blob_root: PathBuf::from(env_or("BLOB_ROOT", DEFAULT_BLOB_ROOT)),
        })
    }
}
