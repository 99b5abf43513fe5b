use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Inspection domain a check belongs to.
///
/// Declaration order is the fixed execution order of a run.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Environment,
    Model,
    Gpu,
    System,
    Network,
    Processes,
    Scripts,
}

impl Category {
    /// All categories in execution order.
    pub const ALL: [Self; 7] = [
        Self::Environment,
        Self::Model,
        Self::Gpu,
        Self::System,
        Self::Network,
        Self::Processes,
        Self::Scripts,
    ];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Environment => "environment",
            Self::Model => "model",
            Self::Gpu => "gpu",
            Self::System => "system",
            Self::Network => "network",
            Self::Processes => "processes",
            Self::Scripts => "scripts",
        }
    }

    #[must_use]
    pub const fn title(&self) -> &'static str {
        match self {
            Self::Environment => "Environment",
            Self::Model => "Model",
            Self::Gpu => "GPU",
            Self::System => "System Resources",
            Self::Network => "Network",
            Self::Processes => "Processes",
            Self::Scripts => "Scripts & Tools",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fatal argument errors, raised before any checker runs.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("invalid category '{given}' (valid: {valid})", valid = valid_selectors())]
    InvalidCategory { given: String },
}

fn valid_selectors() -> String {
    Category::ALL
        .iter()
        .map(Category::as_str)
        .chain(std::iter::once("all"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Which categories a run should execute
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum CategorySelector {
    #[default]
    All,
    Only(Category),
}

impl CategorySelector {
    #[must_use]
    pub fn includes(&self, category: Category) -> bool {
        match self {
            Self::All => true,
            Self::Only(only) => *only == category,
        }
    }
}

impl FromStr for CategorySelector {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        if normalized == "all" {
            return Ok(Self::All);
        }
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == normalized)
            .map(Self::Only)
            .ok_or_else(|| ConfigurationError::InvalidCategory {
                given: s.to_string(),
            })
    }
}

impl std::fmt::Display for CategorySelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::All => write!(f, "all"),
            Self::Only(category) => write!(f, "{category}"),
        }
    }
}
