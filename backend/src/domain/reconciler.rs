//! Disaster feed reconciliation.
//!
//! Pulls declarations from the upstream feed, maps them into the internal
//! taxonomy, and merges them into the store keyed by `(title, location)`.
//! A failed fetch aborts the pass and preserves existing rows; per-record
//! mapping failures skip that record only. Passes are single-flighted so two
//! concurrent refreshes cannot interleave partial writes.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::domain::claim::DisasterType;
use crate::domain::disaster_update::{DisasterUpdate, DisasterUpdateDraft, Severity};
use crate::domain::ports::{
    DeclarationRecord, DisasterFeed, DisasterFeedSource, DisasterUpdateRepository,
    DisasterUpdateRepositoryError, FeedQuery, RefreshOutcome, RefreshScope,
};
use crate::domain::principal::Principal;
use crate::domain::Error;

/// Attributed source label stored on every merged row.
const FEED_SOURCE: &str = "FEMA";

/// Upstream refresh timestamp format (`2024-03-01T00:00:00.000000Z`).
const LAST_REFRESH_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.fZ";

/// Default number of records requested per pass.
pub const DEFAULT_FETCH_LIMIT: u32 = 10;

fn disaster_type_for(incident_type: Option<&str>) -> DisasterType {
    match incident_type {
        Some("Flood") => DisasterType::Flood,
        Some("Hurricane") => DisasterType::Hurricane,
        Some("Tornado") => DisasterType::Tornado,
        Some("Fire") => DisasterType::Wildfire,
        Some("Earthquake") => DisasterType::Earthquake,
        _ => DisasterType::Other,
    }
}

fn severity_for(declaration_type: &str) -> Severity {
    match declaration_type {
        "DR" | "EM" => Severity::High,
        "FM" => Severity::Medium,
        "FS" => Severity::Low,
        _ => Severity::Unknown,
    }
}

fn declaration_display_for(declaration_type: &str) -> &'static str {
    match declaration_type {
        "DR" => "Major Disaster Declaration",
        "EM" => "Emergency Declaration",
        "FM" => "Fire Management Assistance Declaration",
        "FS" => "Fire Suppression Authorization",
        _ => "Unknown",
    }
}

fn parse_last_refresh(raw: Option<&str>, fallback: DateTime<Utc>) -> DateTime<Utc> {
    // A bad timestamp never rejects the record; the processing time stands in.
    raw.and_then(|value| NaiveDateTime::parse_from_str(value, LAST_REFRESH_FORMAT).ok())
        .map(|naive| naive.and_utc())
        .unwrap_or(fallback)
}

fn detail_url(disaster_number: Option<&str>) -> String {
    match disaster_number {
        Some(number) if !number.trim().is_empty() => {
            format!("https://www.fema.gov/disaster/{}", number.trim())
        }
        _ => String::new(),
    }
}

/// Map one feed record into a draft row, or explain why it was skipped.
pub fn map_record(record: &DeclarationRecord, now: DateTime<Utc>) -> Result<DisasterUpdateDraft, String> {
    let title = record.title.trim();
    let location = record.designated_area.trim();
    if title.is_empty() {
        return Err("declaration title is empty".to_owned());
    }
    if location.is_empty() {
        return Err("designated area is empty".to_owned());
    }

    let declaration_type = record.declaration_type.clone().unwrap_or_default();
    Ok(DisasterUpdateDraft {
        title: title.to_owned(),
        location: location.to_owned(),
        disaster_type: disaster_type_for(record.incident_type.as_deref()),
        severity: severity_for(&declaration_type),
        declaration_display: declaration_display_for(&declaration_type).to_owned(),
        declaration_type,
        assistance_available: record.assistance_declared,
        source: FEED_SOURCE.to_owned(),
        url: detail_url(record.disaster_number.as_deref()),
        updated_at: parse_last_refresh(record.last_refresh.as_deref(), now),
    })
}

/// Collapse drafts sharing a natural key; the last occurrence wins, keeping
/// the batch safe for a single multi-row upsert statement.
fn dedup_by_natural_key(drafts: Vec<DisasterUpdateDraft>) -> Vec<DisasterUpdateDraft> {
    let mut index: HashMap<(String, String), usize> = HashMap::new();
    let mut result: Vec<DisasterUpdateDraft> = Vec::with_capacity(drafts.len());
    for draft in drafts {
        let key = (draft.title.clone(), draft.location.clone());
        match index.get(&key) {
            Some(&slot) => {
                if let Some(existing) = result.get_mut(slot) {
                    *existing = draft;
                }
            }
            None => {
                index.insert(key, result.len());
                result.push(draft);
            }
        }
    }
    result
}

fn map_repository_error(error: DisasterUpdateRepositoryError) -> Error {
    match error {
        DisasterUpdateRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("disaster update store unavailable: {message}"))
        }
        DisasterUpdateRepositoryError::Query { message } => {
            Error::internal(format!("disaster update store error: {message}"))
        }
    }
}

/// Feed reconciliation service implementing the driving port.
pub struct FeedReconciler<S, R> {
    source: Arc<S>,
    repository: Arc<R>,
    fetch_limit: u32,
    in_flight: Mutex<()>,
}

impl<S, R> FeedReconciler<S, R> {
    /// Create a reconciler over the given feed source and store.
    pub fn new(source: Arc<S>, repository: Arc<R>) -> Self {
        Self::with_fetch_limit(source, repository, DEFAULT_FETCH_LIMIT)
    }

    /// Create a reconciler with an explicit per-pass record limit.
    pub fn with_fetch_limit(source: Arc<S>, repository: Arc<R>, fetch_limit: u32) -> Self {
        Self {
            source,
            repository,
            fetch_limit: fetch_limit.max(1),
            in_flight: Mutex::new(()),
        }
    }
}

#[async_trait]
impl<S, R> DisasterFeed for FeedReconciler<S, R>
where
    S: DisasterFeedSource,
    R: DisasterUpdateRepository,
{
    async fn refresh(
        &self,
        principal: &Principal,
        scope: RefreshScope,
    ) -> Result<RefreshOutcome, Error> {
        principal.require_admin()?;

        let Ok(_guard) = self.in_flight.try_lock() else {
            debug!("disaster feed refresh already running, skipping");
            return Ok(RefreshOutcome::AlreadyRunning);
        };

        let query = FeedQuery {
            top: self.fetch_limit,
            states: scope.states,
        };
        let records = match self.source.fetch_declarations(&query).await {
            Ok(records) => records,
            Err(error) => {
                warn!(error = %error, "disaster feed refresh aborted; existing rows preserved");
                return Ok(RefreshOutcome::UpstreamUnavailable);
            }
        };

        let now = Utc::now();
        let mut drafts = Vec::with_capacity(records.len());
        let mut skipped = 0_usize;
        for record in &records {
            match map_record(record, now) {
                Ok(draft) => drafts.push(draft),
                Err(reason) => {
                    skipped += 1;
                    debug!(reason = %reason, "skipping unmappable feed record");
                }
            }
        }
        let drafts = dedup_by_natural_key(drafts);

        self.repository
            .merge_batch(&drafts)
            .await
            .map_err(map_repository_error)?;

        Ok(RefreshOutcome::Completed {
            merged: drafts.len(),
            skipped,
        })
    }

    async fn latest(&self, limit: i64) -> Result<Vec<DisasterUpdate>, Error> {
        self.repository
            .list_recent(limit)
            .await
            .map_err(map_repository_error)
    }
}
