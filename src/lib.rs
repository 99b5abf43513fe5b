//! Readiness checks for a multi-GPU LLM inference host.

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod presentation;
