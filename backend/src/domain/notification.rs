//! Per-user notification messages with read/unread state.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::principal::UserId;
use super::Error;

/// Presentation category of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Success,
    Warning,
    Info,
    Danger,
}

impl NotificationKind {
    /// Stable storage/wire representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Info => "info",
            Self::Danger => "danger",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NotificationKind {
    type Err = ();

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw {
            "success" => Ok(Self::Success),
            "warning" => Ok(Self::Warning),
            "info" => Ok(Self::Info),
            "danger" => Ok(Self::Danger),
            _ => Err(()),
        }
    }
}

/// A persisted notification.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: i64,
    pub user_id: UserId,
    pub title: String,
    pub message: String,
    pub kind: NotificationKind,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

/// Validated input for a notification to append to the ledger.
#[derive(Debug, Clone, PartialEq)]
pub struct NewNotification {
    pub user_id: UserId,
    pub title: String,
    pub message: String,
    pub kind: NotificationKind,
}

impl NewNotification {
    /// Validate and construct a new notification.
    pub fn try_new(
        user_id: UserId,
        title: impl Into<String>,
        message: impl Into<String>,
        kind: NotificationKind,
    ) -> Result<Self, Error> {
        let title = title.into();
        let message = message.into();
        if title.trim().is_empty() {
            return Err(Error::invalid_request("notification title must not be empty"));
        }
        if message.trim().is_empty() {
            return Err(Error::invalid_request(
                "notification message must not be empty",
            ));
        }
        Ok(Self {
            user_id,
            title,
            message,
            kind,
        })
    }
}
