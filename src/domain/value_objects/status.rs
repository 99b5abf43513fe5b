use serde::{Deserialize, Serialize};

/// Outcome of a single check
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum CheckStatus {
    /// Requirement satisfied
    Pass,
    /// Non-judged observation
    Info,
    /// Soft concern worth reviewing
    Warning,
    /// Requirement violated
    Fail,
}

impl std::fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pass => write!(f, "PASS"),
            Self::Info => write!(f, "INFO"),
            Self::Warning => write!(f, "WARNING"),
            Self::Fail => write!(f, "FAIL"),
        }
    }
}

impl CheckStatus {
    #[must_use]
    pub const fn emoji(&self) -> &str {
        match self {
            Self::Pass => "✅",
            Self::Info => "ℹ️",
            Self::Warning => "⚠️",
            Self::Fail => "❌",
        }
    }

    /// Whether this status should be surfaced in the recommendations section.
    #[must_use]
    pub const fn needs_attention(&self) -> bool {
        matches!(self, Self::Warning | Self::Fail)
    }
}
