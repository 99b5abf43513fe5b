use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use async_trait::async_trait;

use super::{slug, Checker, HostContext};
use crate::domain::entities::check_result::CheckResult;
use crate::domain::value_objects::category::Category;

const CATEGORY: Category = Category::Scripts;

/// Inventories operational scripts and the command-line tools they rely on.
pub struct ScriptChecker;

#[async_trait]
impl Checker for ScriptChecker {
    fn category(&self) -> Category {
        CATEGORY
    }

    async fn check(&self, host: &HostContext<'_>) -> Vec<CheckResult> {
        let target = &host.targets.scripts;
        let mut results = Vec::new();

        let existing: Vec<&PathBuf> = target.dirs.iter().filter(|d| d.is_dir()).collect();
        results.push(if existing.is_empty() {
            CheckResult::info(CATEGORY, "executable_scripts", "no script directories found")
                .with_details(
                    target
                        .dirs
                        .iter()
                        .map(|d| d.display().to_string())
                        .collect::<Vec<_>>()
                        .join(", "),
                )
        } else {
            let scripts = executable_scripts(&existing);
            CheckResult::info(
                CATEGORY,
                "executable_scripts",
                format!("{} executable script(s)", scripts.len()),
            )
            .with_details(scripts.join(", "))
        });

        for script in &target.key_scripts {
            let name = format!("key_{}", slug(script));
            let found = existing
                .iter()
                .map(|d| d.join(script))
                .find(|p| p.is_file());
            results.push(match found {
                Some(path) if is_executable(&path) => {
                    CheckResult::pass(CATEGORY, name, format!("{script} ready"))
                        .with_details(path.display().to_string())
                }
                Some(path) => CheckResult::warning(CATEGORY, name, format!("{script} is not executable"))
                    .with_details(format!("chmod +x {}", path.display())),
                None => CheckResult::warning(CATEGORY, name, format!("{script} not found")),
            });
        }

        for tool in &target.tools {
            let name = format!("tool_{}", slug(tool));
            results.push(match host.commands.which(tool) {
                Some(path) => CheckResult::pass(CATEGORY, name, format!("{tool} available"))
                    .with_details(path.display().to_string()),
                None => CheckResult::warning(CATEGORY, name, format!("{tool} not found on PATH")),
            });
        }

        results
    }
}

/// True when any execute bit is set on a regular file.
#[must_use]
pub fn is_executable(path: &Path) -> bool {
    fs::metadata(path).is_ok_and(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
}

/// Executable file names across `dirs`, sorted and de-duplicated.
fn executable_scripts(dirs: &[&PathBuf]) -> Vec<String> {
    let mut names: Vec<String> = dirs
        .iter()
        .filter_map(|d| fs::read_dir(d).ok())
        .flat_map(|entries| entries.flatten())
        .map(|entry| entry.path())
        .filter(|p| is_executable(p))
        .filter_map(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
        .collect();
    names.sort();
    names.dedup();
    names
}
