//! Driven port for fetching declarations from the external disaster feed.
//!
//! The domain owns the query shape and record contract so reconciliation can
//! stay adapter-agnostic.

use async_trait::async_trait;

use super::define_port_error;

/// Query passed to the feed adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedQuery {
    /// Fetch at most this many records, most recent declarations first.
    pub top: u32,
    /// Optional region scoping; each entry becomes an equality predicate,
    /// joined disjunctively.
    pub states: Vec<String>,
}

/// One declaration returned from the feed, decoded but not yet mapped into
/// the internal taxonomy.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DeclarationRecord {
    pub title: String,
    pub designated_area: String,
    pub incident_type: Option<String>,
    pub declaration_type: Option<String>,
    /// True when any upstream assistance-program indicator is truthy.
    pub assistance_declared: bool,
    /// Raw upstream refresh timestamp; parsed during mapping.
    pub last_refresh: Option<String>,
    pub disaster_number: Option<String>,
}

define_port_error! {
    /// Errors surfaced while calling the disaster feed.
    pub enum DisasterFeedSourceError {
        /// Network transport failed before receiving a response.
        Transport { message: String } =>
            "feed transport failed: {message}",
        /// Feed call exceeded the bounded timeout.
        Timeout { message: String } =>
            "feed timeout: {message}",
        /// Feed response could not be decoded.
        Decode { message: String } =>
            "feed response decode failed: {message}",
        /// Adapter rejected the request before execution.
        InvalidRequest { message: String } =>
            "feed request invalid: {message}",
    }
}

/// Port for querying the external disaster-declaration feed.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DisasterFeedSource: Send + Sync {
    /// Fetch declarations for one reconciliation pass.
    async fn fetch_declarations(
        &self,
        query: &FeedQuery,
    ) -> Result<Vec<DeclarationRecord>, DisasterFeedSourceError>;
}

/// Fixture implementation returning an empty feed.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureDisasterFeedSource;

#[async_trait]
impl DisasterFeedSource for FixtureDisasterFeedSource {
    async fn fetch_declarations(
        &self,
        _query: &FeedQuery,
    ) -> Result<Vec<DeclarationRecord>, DisasterFeedSourceError> {
        Ok(Vec::new())
    }
}
