use serde::{Deserialize, Serialize};

use crate::domain::value_objects::category::Category;
use crate::domain::value_objects::status::CheckStatus;

/// One immutable observation produced by a checker.
///
/// Fields are only reachable through accessors so a result cannot change
/// after it has been appended to a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResult {
    category: Category,
    name: String,
    status: CheckStatus,
    message: String,
    #[serde(default)]
    details: Option<String>,
}

impl CheckResult {
    #[must_use]
    pub fn new(
        category: Category,
        name: impl Into<String>,
        status: CheckStatus,
        message: impl Into<String>,
    ) -> Self {
        Self {
            category,
            name: name.into(),
            status,
            message: message.into(),
            details: None,
        }
    }

    #[must_use]
    pub fn pass(category: Category, name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(category, name, CheckStatus::Pass, message)
    }

    #[must_use]
    pub fn warning(
        category: Category,
        name: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::new(category, name, CheckStatus::Warning, message)
    }

    #[must_use]
    pub fn fail(category: Category, name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(category, name, CheckStatus::Fail, message)
    }

    #[must_use]
    pub fn info(category: Category, name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(category, name, CheckStatus::Info, message)
    }

    /// Attaches supplementary data; blank strings are dropped.
    #[must_use]
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        let details = details.into();
        self.details = if details.trim().is_empty() {
            None
        } else {
            Some(details)
        };
        self
    }

    #[must_use]
    pub const fn category(&self) -> Category {
        self.category
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn status(&self) -> CheckStatus {
        self.status
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[must_use]
    pub fn details(&self) -> Option<&str> {
        self.details.as_deref()
    }
}
