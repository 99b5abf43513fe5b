use serde::Serialize;

use crate::domain::ports::inference::{CompletionSample, InferenceEndpoint};

/// What the probe sends to the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeRequest {
    pub model: String,
    pub prompt: String,
    pub max_tokens: u32,
    pub requests: u32,
}

/// Everything observed while probing one server.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProbeOutcome {
    pub endpoint: String,
    pub health_ms: Option<f64>,
    pub models: Vec<String>,
    /// Whether the requested model appears in `/v1/models`
    pub model_listed: bool,
    pub samples: Vec<CompletionSample>,
    pub errors: Vec<String>,
}

impl ProbeOutcome {
    /// Every step answered and every completion came back.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.errors.is_empty() && self.health_ms.is_some()
    }

    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn mean_latency_ms(&self) -> Option<f64> {
        if self.samples.is_empty() {
            return None;
        }
        let total: f64 = self
            .samples
            .iter()
            .map(|s| s.latency.as_secs_f64() * 1000.0)
            .sum();
        Some(total / self.samples.len() as f64)
    }

    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn mean_tokens_per_second(&self) -> Option<f64> {
        if self.samples.is_empty() {
            return None;
        }
        let total: f64 = self.samples.iter().map(CompletionSample::tokens_per_second).sum();
        Some(total / self.samples.len() as f64)
    }
}

/// Health, model listing, then `requests` sequential completions.
///
/// A failed health check stops the probe; later failures are recorded and
/// the remaining steps still run.
pub async fn run_probe(
    endpoint: &dyn InferenceEndpoint,
    endpoint_url: &str,
    request: &ProbeRequest,
) -> ProbeOutcome {
    let mut outcome = ProbeOutcome {
        endpoint: endpoint_url.to_string(),
        ..ProbeOutcome::default()
    };

    match endpoint.health().await {
        Ok(rtt) => {
            tracing::info!(latency_ms = rtt.as_millis(), "server healthy");
            outcome.health_ms = Some(rtt.as_secs_f64() * 1000.0);
        }
        Err(e) => {
            tracing::error!("health check failed: {e}");
            outcome.errors.push(e.to_string());
            return outcome;
        }
    }

    match endpoint.models().await {
        Ok(models) => {
            outcome.model_listed = models.iter().any(|m| m == &request.model);
            if !outcome.model_listed {
                tracing::warn!(model = %request.model, "model not listed by server");
            }
            outcome.models = models;
        }
        Err(e) => {
            tracing::error!("model listing failed: {e}");
            outcome.errors.push(e.to_string());
        }
    }

    for i in 1..=request.requests {
        match endpoint
            .complete(&request.model, &request.prompt, request.max_tokens)
            .await
        {
            Ok(sample) => {
                tracing::info!(
                    request = i,
                    latency_ms = sample.latency.as_millis(),
                    completion_tokens = sample.completion_tokens,
                    "completion received"
                );
                outcome.samples.push(sample);
            }
            Err(e) => {
                tracing::error!(request = i, "completion failed: {e}");
                outcome.errors.push(format!("request {i}: {e}"));
            }
        }
    }

    outcome
}
