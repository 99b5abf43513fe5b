use std::io::Write;
use std::time::Duration;

use crate::application::config::ProbeConfig;
use crate::application::services::probe::{run_probe, ProbeRequest};
use crate::domain::value_objects::output_mode::OutputMode;
use crate::infrastructure::http::openai_client::OpenAiClient;
use crate::presentation::cli::app::ProbeArgs;
use crate::presentation::cli::formatters::probe_fmt::render_probe_text;

/// Probes the inference server; CLI flags override the `[probe]` config section.
///
/// # Errors
///
/// Returns an error if the HTTP client cannot be built or output fails.
pub async fn run_probe_command(
    args: &ProbeArgs,
    config: &ProbeConfig,
    mode: OutputMode,
    out: &mut impl Write,
) -> anyhow::Result<u8> {
    let endpoint = args.endpoint.clone().unwrap_or_else(|| config.endpoint.clone());
    let request = ProbeRequest {
        model: args.model.clone().unwrap_or_else(|| config.model.clone()),
        prompt: args.prompt.clone().unwrap_or_else(|| config.prompt.clone()),
        max_tokens: args.max_tokens.unwrap_or(config.max_tokens),
        requests: args.requests.unwrap_or(config.requests),
    };

    let client = OpenAiClient::new(
        &endpoint,
        args.api_key.clone(),
        Duration::from_secs(config.request_timeout_secs),
    )?;
    let outcome = run_probe(&client, &endpoint, &request).await;

    if mode == OutputMode::Json {
        writeln!(out, "{}", serde_json::to_string_pretty(&outcome)?)?;
    } else {
        write!(out, "{}", render_probe_text(&outcome, &request.model, mode))?;
    }

    Ok(u8::from(!outcome.is_success()))
}
