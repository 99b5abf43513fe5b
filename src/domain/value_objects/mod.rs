pub mod category;
pub mod output_mode;
pub mod status;
pub mod targets;
pub mod thresholds;

pub use category::{Category, CategorySelector, ConfigurationError};
pub use output_mode::OutputMode;
pub use status::CheckStatus;
pub use targets::CheckTargets;
pub use thresholds::ThresholdSet;
