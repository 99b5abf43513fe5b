use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("request to {endpoint} failed: {reason}")]
    Transport { endpoint: String, reason: String },
    #[error("{endpoint} returned HTTP {status}")]
    Status { endpoint: String, status: u16 },
    #[error("invalid response from {endpoint}: {reason}")]
    InvalidResponse { endpoint: String, reason: String },
}

/// One successful chat completion
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionSample {
    #[serde(rename = "latency_ms", with = "duration_ms")]
    pub latency: Duration,
    pub choices: usize,
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
}

impl CompletionSample {
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn tokens_per_second(&self) -> f64 {
        let secs = self.latency.as_secs_f64();
        if secs > 0.0 {
            self.completion_tokens as f64 / secs
        } else {
            0.0
        }
    }
}

/// OpenAI-compatible inference server reached over HTTP
#[async_trait]
pub trait InferenceEndpoint: Send + Sync {
    /// Liveness probe; returns the round-trip time.
    ///
    /// # Errors
    ///
    /// Returns `ProbeError` on transport failure or a non-success status.
    async fn health(&self) -> Result<Duration, ProbeError>;

    /// Ids of the models served.
    ///
    /// # Errors
    ///
    /// Returns `ProbeError` on transport failure, a non-success status or an
    /// unparseable body.
    async fn models(&self) -> Result<Vec<String>, ProbeError>;

    /// Sends a single-turn chat completion.
    ///
    /// # Errors
    ///
    /// Returns `ProbeError` on transport failure, a non-success status or a
    /// body missing `choices`/`usage`.
    async fn complete(
        &self,
        model: &str,
        prompt: &str,
        max_tokens: u32,
    ) -> Result<CompletionSample, ProbeError>;
}

mod duration_ms {
    use std::time::Duration;

    use serde::Serializer;

    #[allow(clippy::trivially_copy_pass_by_ref)]
    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_f64(d.as_secs_f64() * 1000.0)
    }
}
