use chrono::{DateTime, Utc};
use serde::Serialize;

use super::check_result::CheckResult;
use crate::domain::value_objects::status::CheckStatus;

/// A finding from a `watch` cycle that is pushed to the alert channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Alert {
    pub timestamp: DateTime<Utc>,
    pub host: String,
    pub status: CheckStatus,
    /// `category/name` of the originating result
    pub title: String,
    pub message: String,
    pub details: Option<String>,
}

impl Alert {
    #[must_use]
    pub fn from_result(result: &CheckResult, host: &str, timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            host: host.to_string(),
            status: result.status(),
            title: format!("{}/{}", result.category(), result.name()),
            message: result.message().to_string(),
            details: result.details().map(str::to_string),
        }
    }

    /// Identity used for rate limiting; a changed message is a new alert.
    #[must_use]
    pub fn key(&self) -> String {
        format!("{}:{}", self.title, self.message)
    }
}
