use async_trait::async_trait;

use super::{Checker, HostContext};
use crate::domain::entities::check_result::CheckResult;
use crate::domain::entities::process::ProcessInfo;
use crate::domain::ports::command::CommandError;
use crate::domain::value_objects::category::Category;

const CATEGORY: Category = Category::Processes;

/// Lists inference-related processes and terminal sessions. Informational only.
pub struct ProcessChecker;

#[async_trait]
impl Checker for ProcessChecker {
    fn category(&self) -> Category {
        CATEGORY
    }

    async fn check(&self, host: &HostContext<'_>) -> Vec<CheckResult> {
        let target = &host.targets.processes;
        let mut results = Vec::with_capacity(2);

        results.push(match host.snapshot().await {
            Ok(snapshot) => {
                let own_pid = std::process::id();
                let mut matching: Vec<&ProcessInfo> = snapshot
                    .processes
                    .iter()
                    .filter(|p| p.pid != own_pid)
                    .filter(|p| target.patterns.iter().any(|pat| p.matches(pat)))
                    .collect();
                matching.sort_by_key(|p| p.pid);
                let listing = matching
                    .iter()
                    .map(|p| format!("{} {} ({} MB, {:.0}% CPU)", p.pid, p.name, p.rss_mb, p.cpu_percent))
                    .collect::<Vec<_>>()
                    .join("; ");
                CheckResult::info(
                    CATEGORY,
                    "matching_processes",
                    format!("{} matching process(es)", matching.len()),
                )
                .with_details(listing)
            }
            Err(e) => CheckResult::info(CATEGORY, "matching_processes", "process table unavailable")
                .with_details(e.to_string()),
        });

        if let Some((program, args)) = target.session_command.split_first() {
            let args: Vec<&str> = args.iter().map(String::as_str).collect();
            results.push(match host.commands.run(program, &args).await {
                Ok(out) if out.success() => {
                    let sessions = session_names(&out.stdout);
                    CheckResult::info(
                        CATEGORY,
                        "sessions",
                        format!("{} session(s)", sessions.len()),
                    )
                    .with_details(sessions.join(", "))
                }
                // tmux exits non-zero when no server is running
                Ok(out) => CheckResult::info(CATEGORY, "sessions", "0 session(s)")
                    .with_details(out.first_error_line().to_string()),
                Err(CommandError::NotFound(_)) => {
                    CheckResult::info(CATEGORY, "sessions", format!("{program} not installed"))
                }
                Err(e) => CheckResult::info(CATEGORY, "sessions", "session query failed")
                    .with_details(e.to_string()),
            });
        }

        results
    }
}

/// Session names from `tmux list-sessions` output (`name: N windows ...`).
#[must_use]
pub fn session_names(output: &str) -> Vec<String> {
    output
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(|l| l.split(':').next().unwrap_or(l).to_string())
        .collect()
}
