pub mod json_fmt;
pub mod probe_fmt;
pub mod report_fmt;
pub mod style;
pub mod text_fmt;
