//! Reqwest-backed FEMA feed adapter.
//!
//! This adapter owns transport details only: OData query serialisation,
//! timeout and HTTP error mapping, and JSON decoding into domain declaration
//! records.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};

use super::dto::FemaResponseDto;
use crate::domain::ports::{
    DeclarationRecord, DisasterFeedSource, DisasterFeedSourceError, FeedQuery,
};

/// Public FEMA OData endpoint for declaration summaries.
pub const DEFAULT_FEED_ENDPOINT: &str =
    "https://www.fema.gov/api/open/v2/DisasterDeclarationsSummaries";

/// Upper bound on one fetch, per the reconciliation contract.
pub const DEFAULT_FEED_TIMEOUT: Duration = Duration::from_secs(30);

const ORDER_BY: &str = "declarationDate desc";

/// FEMA feed adapter performing HTTP GET requests against one endpoint.
pub struct FemaHttpSource {
    client: Client,
    endpoint: Url,
}

impl FemaHttpSource {
    /// Build an adapter using a reqwest client with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(endpoint: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, endpoint })
    }
}

#[async_trait]
impl DisasterFeedSource for FemaHttpSource {
    async fn fetch_declarations(
        &self,
        query: &FeedQuery,
    ) -> Result<Vec<DeclarationRecord>, DisasterFeedSourceError> {
        let url = build_feed_url(&self.endpoint, query)?;
        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }

        parse_records(body.as_ref())
    }
}

fn parse_records(body: &[u8]) -> Result<Vec<DeclarationRecord>, DisasterFeedSourceError> {
    let decoded: FemaResponseDto = serde_json::from_slice(body).map_err(|error| {
        DisasterFeedSourceError::decode(format!("invalid feed JSON payload: {error}"))
    })?;
    Ok(decoded.into_domain_records())
}

/// Encode one query-string value the way the upstream OData service expects
/// (spaces as `+`, everything else percent-escaped).
fn encode_value(raw: &str) -> String {
    url::form_urlencoded::byte_serialize(raw.as_bytes()).collect()
}

fn validate_state(state: &str) -> Result<&str, DisasterFeedSourceError> {
    let trimmed = state.trim();
    if trimmed.is_empty() {
        return Err(DisasterFeedSourceError::invalid_request(
            "state filters must not include blank values",
        ));
    }
    if !trimmed.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(DisasterFeedSourceError::invalid_request(format!(
            "state filter {trimmed:?} must be alphanumeric"
        )));
    }
    Ok(trimmed)
}

/// Build the upstream query URL.
///
/// The `$`-prefixed OData parameter names are kept literal; only the values
/// are form-encoded.
fn build_feed_url(endpoint: &Url, query: &FeedQuery) -> Result<Url, DisasterFeedSourceError> {
    let mut parts = vec![format!("$top={}", query.top.max(1))];

    if !query.states.is_empty() {
        let predicates = query
            .states
            .iter()
            .map(|state| validate_state(state).map(|s| format!("state eq '{s}'")))
            .collect::<Result<Vec<_>, _>>()?;
        let filter = format!("({})", predicates.join(" or "));
        parts.push(format!("$filter={}", encode_value(&filter)));
    }

    parts.push(format!("$orderby={}", encode_value(ORDER_BY)));

    let url = format!("{}?{}", endpoint, parts.join("&"));
    Url::parse(&url).map_err(|error| {
        DisasterFeedSourceError::invalid_request(format!("feed url failed to build: {error}"))
    })
}

fn map_transport_error(error: reqwest::Error) -> DisasterFeedSourceError {
    if error.is_timeout() {
        DisasterFeedSourceError::timeout(error.to_string())
    } else {
        DisasterFeedSourceError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> DisasterFeedSourceError {
    let body_preview = body_preview(body);
    let message = if body_preview.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {}", status.as_u16(), body_preview)
    };

    match status {
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            DisasterFeedSourceError::timeout(message)
        }
        _ if status.is_client_error() => DisasterFeedSourceError::invalid_request(message),
        _ => DisasterFeedSourceError::transport(message),
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}
