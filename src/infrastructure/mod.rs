pub mod collectors;
pub mod command;
pub mod http;
pub mod network;
pub mod notifications;
pub mod report;
