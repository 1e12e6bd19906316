//! Disaster declarations mirrored from the external feed.
//!
//! `(title, location)` is the natural key: a refresh updates matching rows in
//! place and never resurrects or deletes rows absent from the current fetch.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::claim::DisasterType;

/// Severity level attached to a declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
    /// Sentinel for declaration types the taxonomy does not cover.
    Unknown,
}

impl Severity {
    /// Numeric storage level (1=Low, 2=Medium, 3=High, 4=Unknown).
    pub fn level(self) -> i16 {
        match self {
            Self::Low => 1,
            Self::Medium => 2,
            Self::High => 3,
            Self::Unknown => 4,
        }
    }

    /// Reconstruct from a storage level; anything unrecognised is `Unknown`.
    pub fn from_level(level: i16) -> Self {
        match level {
            1 => Self::Low,
            2 => Self::Medium,
            3 => Self::High,
            _ => Self::Unknown,
        }
    }
}

/// A persisted disaster declaration row.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisasterUpdate {
    pub id: i64,
    pub title: String,
    pub location: String,
    pub disaster_type: DisasterType,
    pub severity: Severity,
    pub declaration_type: String,
    pub declaration_display: String,
    pub assistance_available: bool,
    pub source: String,
    pub url: String,
    pub updated_at: DateTime<Utc>,
}

/// A mapped feed record ready to merge into the store.
#[derive(Debug, Clone, PartialEq)]
pub struct DisasterUpdateDraft {
    pub title: String,
    pub location: String,
    pub disaster_type: DisasterType,
    pub severity: Severity,
    pub declaration_type: String,
    pub declaration_display: String,
    pub assistance_available: bool,
    pub source: String,
    pub url: String,
    pub updated_at: DateTime<Utc>,
}

impl DisasterUpdateDraft {
    /// The upsert natural key.
    pub fn natural_key(&self) -> (&str, &str) {
        (self.title.as_str(), self.location.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Severity::Low, 1)]
    #[case(Severity::Medium, 2)]
    #[case(Severity::High, 3)]
    #[case(Severity::Unknown, 4)]
    fn severity_levels_round_trip(#[case] severity: Severity, #[case] level: i16) {
        assert_eq!(severity.level(), level);
        assert_eq!(Severity::from_level(level), severity);
    }

    #[rstest]
    #[case(0)]
    #[case(5)]
    #[case(-3)]
    fn unrecognised_levels_fall_back_to_unknown(#[case] level: i16) {
        assert_eq!(Severity::from_level(level), Severity::Unknown);
    }
}
