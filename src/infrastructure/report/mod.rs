pub mod history_file;
pub mod report_file;
