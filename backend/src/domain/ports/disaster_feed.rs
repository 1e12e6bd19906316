//! Driving port for disaster feed reconciliation and the read path.
//!
//! Reading never triggers a refresh; reconciliation is a separately triggered
//! operation so the read path cannot inherit upstream latency or failures.

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::disaster_update::DisasterUpdate;
use crate::domain::principal::Principal;
use crate::domain::Error;

/// Optional scoping for one reconciliation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RefreshScope {
    /// Region codes to filter by; empty means no region filter.
    pub states: Vec<String>,
}

/// How a reconciliation attempt ended. Upstream failures are reported as a
/// value, never raised, so callers' read paths stay unaffected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "status")]
pub enum RefreshOutcome {
    /// The batch was merged; `skipped` counts unmappable records.
    Completed { merged: usize, skipped: usize },
    /// Another reconciliation pass holds the single-flight lock.
    AlreadyRunning,
    /// The upstream fetch failed; existing rows are untouched.
    UpstreamUnavailable,
}

/// Use-cases over disaster updates.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DisasterFeed: Send + Sync {
    /// Run one reconciliation pass (administrative actors only).
    async fn refresh(
        &self,
        principal: &Principal,
        scope: RefreshScope,
    ) -> Result<RefreshOutcome, Error>;

    /// List stored updates, newest first.
    async fn latest(&self, limit: i64) -> Result<Vec<DisasterUpdate>, Error>;
}
