use std::fmt::Write as _;

use super::style::{sanitize_terminal, section_header, status_badge};
use crate::application::services::probe::ProbeOutcome;
use crate::domain::value_objects::output_mode::OutputMode;
use crate::domain::value_objects::status::CheckStatus;

#[must_use]
pub fn render_probe_text(outcome: &ProbeOutcome, model: &str, mode: OutputMode) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{}",
        section_header(&format!("Probe {}", outcome.endpoint), mode)
    );

    match outcome.health_ms {
        Some(ms) => {
            let _ = writeln!(
                out,
                "  {} health: {ms:.1} ms",
                status_badge(CheckStatus::Pass, mode)
            );
        }
        None => {
            let _ = writeln!(
                out,
                "  {} health: unreachable",
                status_badge(CheckStatus::Fail, mode)
            );
        }
    }

    if !outcome.models.is_empty() {
        let status = if outcome.model_listed {
            CheckStatus::Pass
        } else {
            CheckStatus::Warning
        };
        let _ = writeln!(
            out,
            "  {} models: {}",
            status_badge(status, mode),
            sanitize_terminal(&outcome.models.join(", "))
        );
        if !outcome.model_listed {
            let _ = writeln!(out, "      '{model}' is not served");
        }
    }

    for (i, sample) in outcome.samples.iter().enumerate() {
        let _ = writeln!(
            out,
            "  {} request {}: {:.0} ms, {} prompt + {} completion tokens, {:.1} tok/s",
            status_badge(CheckStatus::Pass, mode),
            i + 1,
            sample.latency.as_secs_f64() * 1000.0,
            sample.prompt_tokens,
            sample.completion_tokens,
            sample.tokens_per_second()
        );
    }

    for error in &outcome.errors {
        let _ = writeln!(
            out,
            "  {} {}",
            status_badge(CheckStatus::Fail, mode),
            sanitize_terminal(error)
        );
    }

    if let (Some(latency), Some(tps)) = (outcome.mean_latency_ms(), outcome.mean_tokens_per_second())
    {
        let _ = writeln!(out, "\nmean latency: {latency:.0} ms");
        let _ = writeln!(out, "mean throughput: {tps:.1} tok/s");
    }
    out
}
