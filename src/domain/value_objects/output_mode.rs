/// How the reporter renders a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum OutputMode {
    /// Text without ANSI escapes
    Plain,
    /// Text with terminal colors
    #[default]
    Colored,
    /// Machine-readable JSON records
    Json,
}

impl OutputMode {
    /// Picks the mode from CLI flags; JSON wins over color settings.
    #[must_use]
    pub const fn from_flags(json: bool, no_color: bool) -> Self {
        if json {
            Self::Json
        } else if no_color {
            Self::Plain
        } else {
            Self::Colored
        }
    }

    #[must_use]
    pub const fn is_colored(&self) -> bool {
        matches!(self, Self::Colored)
    }
}

impl std::fmt::Display for OutputMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Plain => write!(f, "plain"),
            Self::Colored => write!(f, "colored"),
            Self::Json => write!(f, "json"),
        }
    }
}
