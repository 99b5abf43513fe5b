use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use crate::domain::ports::inference::{CompletionSample, InferenceEndpoint, ProbeError};

/// Client for an OpenAI-compatible server such as vLLM.
pub struct OpenAiClient {
    base_url: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

#[derive(Deserialize)]
struct ModelList {
    data: Vec<ModelEntry>,
}

#[derive(Deserialize)]
struct ModelEntry {
    id: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<serde_json::Value>,
    usage: Usage,
}

#[derive(Deserialize)]
struct Usage {
    prompt_tokens: u64,
    completion_tokens: u64,
}

impl OpenAiClient {
    /// The timeout covers connection and the full response of each request.
    ///
    /// # Errors
    ///
    /// Returns `ProbeError::Transport` if the HTTP client cannot be
    /// initialized (e.g. TLS backend failure).
    pub fn new(
        base_url: &str,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, ProbeError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ProbeError::Transport {
                endpoint: base_url.to_string(),
                reason: format!("cannot build HTTP client: {e}"),
            })?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.filter(|k| !k.is_empty()),
            client,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(key) => request.bearer_auth(key),
            None => request,
        }
    }

    async fn send(
        &self,
        url: &str,
        request: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response, ProbeError> {
        let response = request.send().await.map_err(|e| ProbeError::Transport {
            endpoint: url.to_string(),
            reason: e.to_string(),
        })?;
        if !response.status().is_success() {
            return Err(ProbeError::Status {
                endpoint: url.to_string(),
                status: response.status().as_u16(),
            });
        }
        Ok(response)
    }
}

fn invalid(url: &str, e: impl std::fmt::Display) -> ProbeError {
    ProbeError::InvalidResponse {
        endpoint: url.to_string(),
        reason: e.to_string(),
    }
}

#[async_trait]
impl InferenceEndpoint for OpenAiClient {
    async fn health(&self) -> Result<Duration, ProbeError> {
        let url = self.url("/health");
        let started = Instant::now();
        self.send(&url, self.client.get(&url)).await?;
        Ok(started.elapsed())
    }

    async fn models(&self) -> Result<Vec<String>, ProbeError> {
        let url = self.url("/v1/models");
        let response = self
            .send(&url, self.authorized(self.client.get(&url)))
            .await?;
        let list: ModelList = response.json().await.map_err(|e| invalid(&url, e))?;
        Ok(list.data.into_iter().map(|m| m.id).collect())
    }

    async fn complete(
        &self,
        model: &str,
        prompt: &str,
        max_tokens: u32,
    ) -> Result<CompletionSample, ProbeError> {
        let url = self.url("/v1/chat/completions");
        let body = json!({
            "model": model,
            "messages": [{"role": "user", "content": prompt}],
            "max_tokens": max_tokens,
            "temperature": 0.1,
        });

        let started = Instant::now();
        let response = self
            .send(&url, self.authorized(self.client.post(&url).json(&body)))
            .await?;
        let parsed: ChatResponse = response.json().await.map_err(|e| invalid(&url, e))?;
        let latency = started.elapsed();

        if parsed.choices.is_empty() {
            return Err(invalid(&url, "response has no choices"));
        }

        Ok(CompletionSample {
            latency,
            choices: parsed.choices.len(),
            prompt_tokens: parsed.usage.prompt_tokens,
            completion_tokens: parsed.usage.completion_tokens,
        })
    }
}
