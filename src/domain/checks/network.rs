use async_trait::async_trait;

use super::{Checker, HostContext};
use crate::domain::entities::check_result::CheckResult;
use crate::domain::ports::command::CommandError;
use crate::domain::ports::network::PortState;
use crate::domain::value_objects::category::Category;

const CATEGORY: Category = Category::Network;

/// Confirms the serving ports are free and records firewall state.
pub struct NetworkChecker;

#[async_trait]
impl Checker for NetworkChecker {
    fn category(&self) -> Category {
        CATEGORY
    }

    async fn check(&self, host: &HostContext<'_>) -> Vec<CheckResult> {
        let target = &host.targets.network;
        let mut results = Vec::with_capacity(target.ports.len() + 1);

        for &port in &target.ports {
            let name = format!("port_{port}");
            results.push(match host.ports.probe(port) {
                Ok(PortState::Free) => CheckResult::pass(CATEGORY, name, format!("port {port} is free")),
                Ok(PortState::InUse) => {
                    CheckResult::warning(CATEGORY, name, format!("port {port} is already in use"))
                }
                Err(e) => CheckResult::warning(CATEGORY, name, format!("port {port} could not be probed"))
                    .with_details(e.to_string()),
            });
        }

        if let Some((program, args)) = target.firewall_command.split_first() {
            let args: Vec<&str> = args.iter().map(String::as_str).collect();
            results.push(match host.commands.run(program, &args).await {
                Ok(out) if out.success() => {
                    let state = out
                        .stdout
                        .lines()
                        .map(str::trim)
                        .find(|l| !l.is_empty())
                        .unwrap_or("no output");
                    CheckResult::info(CATEGORY, "firewall", state.to_string())
                        .with_details(out.stdout.trim().to_string())
                }
                Ok(out) => CheckResult::warning(CATEGORY, "firewall", "firewall state unavailable")
                    .with_details(out.first_error_line().to_string()),
                Err(CommandError::NotFound(_)) => {
                    CheckResult::warning(CATEGORY, "firewall", format!("{program} not installed"))
                }
                Err(e) => CheckResult::warning(CATEGORY, "firewall", "firewall query failed")
                    .with_details(e.to_string()),
            });
        }

        results
    }
}
