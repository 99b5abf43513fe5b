use async_trait::async_trait;

use super::{slug, Checker, HostContext};
use crate::domain::entities::check_result::CheckResult;
use crate::domain::ports::command::{CommandError, CommandOutput};
use crate::domain::value_objects::category::Category;

const CATEGORY: Category = Category::Environment;

/// Verifies the Python runtime that hosts the inference server.
///
/// The runtime is activated first; when it is missing a single
/// `runtime` FAIL is reported and nothing else is attempted.
pub struct EnvironmentChecker;

#[async_trait]
impl Checker for EnvironmentChecker {
    fn category(&self) -> Category {
        CATEGORY
    }

    async fn check(&self, host: &HostContext<'_>) -> Vec<CheckResult> {
        let target = &host.targets.environment;

        if let Some(prefix) = &target.prefix {
            if !prefix.is_dir() {
                return vec![CheckResult::fail(CATEGORY, "runtime", "environment missing")
                    .with_details(format!("prefix {} does not exist", prefix.display()))];
            }
        }

        let version_text = match host.commands.run(&target.interpreter, &["--version"]).await {
            Ok(out) if out.success() => format!("{}{}", out.stdout, out.stderr),
            Ok(out) => {
                return vec![CheckResult::fail(CATEGORY, "runtime", "environment missing")
                    .with_details(out.first_error_line().to_string())]
            }
            Err(e) => {
                return vec![CheckResult::fail(CATEGORY, "runtime", "environment missing")
                    .with_details(e.to_string())]
            }
        };

        let mut results = vec![CheckResult::pass(
            CATEGORY,
            "runtime",
            "runtime environment available",
        )
        .with_details(
            host.commands
                .which(&target.interpreter)
                .map_or_else(|| target.interpreter.clone(), |p| p.display().to_string()),
        )];

        results.push(interpreter_version_result(
            &version_text,
            host.thresholds.min_interpreter_version,
        ));

        let library = &target.accelerator_library;
        let library_ok = if is_valid_module_name(library) {
            let script = format!("import {library}; print({library}.__version__)");
            match run_python(host, &script).await {
                Ok(out) if out.success() => {
                    results.push(CheckResult::pass(
                        CATEGORY,
                        slug(library),
                        format!("{library} {} importable", out.stdout.trim()),
                    ));
                    true
                }
                Ok(out) => {
                    results.push(
                        CheckResult::fail(CATEGORY, slug(library), format!("{library} not importable"))
                            .with_details(out.first_error_line().to_string()),
                    );
                    false
                }
                Err(e) => {
                    results.push(
                        CheckResult::fail(CATEGORY, slug(library), format!("{library} check failed"))
                            .with_details(e.to_string()),
                    );
                    false
                }
            }
        } else {
            results.push(CheckResult::fail(
                CATEGORY,
                slug(library),
                format!("invalid library name '{library}'"),
            ));
            false
        };

        results.push(if library_ok {
            accelerator_result(
                library,
                run_python(
                    host,
                    &format!(
                        "import {library}; print({library}.cuda.is_available()); \
                         print({library}.cuda.device_count()); print({library}.version.cuda)"
                    ),
                )
                .await,
            )
        } else {
            CheckResult::fail(
                CATEGORY,
                format!("{}_cuda", slug(library)),
                "accelerator runtime support unavailable",
            )
            .with_details(format!("{library} is not importable"))
        });

        for package in &target.required_packages {
            results.push(package_result(host, package, true).await);
        }
        for package in &target.recommended_packages {
            results.push(package_result(host, package, false).await);
        }

        results
    }
}

async fn run_python(host: &HostContext<'_>, script: &str) -> Result<CommandOutput, CommandError> {
    tracing::debug!(script, "running interpreter probe");
    host.commands
        .run(&host.targets.environment.interpreter, &["-c", script])
        .await
}

fn is_valid_module_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
}

/// Extracts `(major, minor, patch)` from `Python 3.11.9`-style output.
#[must_use]
pub fn parse_interpreter_version(text: &str) -> Option<(u32, u32, u32)> {
    let version = text
        .split_whitespace()
        .find(|word| word.chars().next().is_some_and(|c| c.is_ascii_digit()))?;
    let mut parts = version
        .split('.')
        .map(|p| p.chars().take_while(char::is_ascii_digit).collect::<String>());
    let major = parts.next()?.parse().ok()?;
    let minor = parts.next()?.parse().ok()?;
    let patch = parts.next().and_then(|p| p.parse().ok()).unwrap_or(0);
    Some((major, minor, patch))
}

fn interpreter_version_result(text: &str, minimum: (u32, u32)) -> CheckResult {
    match parse_interpreter_version(text) {
        Some((major, minor, patch)) if (major, minor) >= minimum => CheckResult::pass(
            CATEGORY,
            "interpreter_version",
            format!("Python {major}.{minor}.{patch}"),
        ),
        Some((major, minor, patch)) => CheckResult::warning(
            CATEGORY,
            "interpreter_version",
            format!("Python {major}.{minor}.{patch} is older than recommended"),
        )
        .with_details(format!("minimum {}.{}", minimum.0, minimum.1)),
        None => CheckResult::warning(
            CATEGORY,
            "interpreter_version",
            "could not determine interpreter version",
        )
        .with_details(text.trim().to_string()),
    }
}

fn accelerator_result(
    library: &str,
    outcome: Result<CommandOutput, CommandError>,
) -> CheckResult {
    let name = format!("{}_cuda", slug(library));
    match outcome {
        Ok(out) if out.success() => {
            let mut lines = out.stdout.lines().map(str::trim);
            let available = lines.next() == Some("True");
            let devices = lines.next().unwrap_or("0");
            let cuda_version = lines.next().unwrap_or("None");
            if available {
                CheckResult::pass(CATEGORY, name, format!("CUDA available ({devices} device(s))"))
                    .with_details(format!("CUDA {cuda_version}"))
            } else {
                CheckResult::fail(CATEGORY, name, "CUDA not available to the runtime")
                    .with_details(format!("{library}.version.cuda = {cuda_version}"))
            }
        }
        Ok(out) => CheckResult::fail(CATEGORY, name, "accelerator runtime query failed")
            .with_details(out.first_error_line().to_string()),
        Err(e) => CheckResult::fail(CATEGORY, name, "accelerator runtime query failed")
            .with_details(e.to_string()),
    }
}

async fn package_result(host: &HostContext<'_>, package: &str, required: bool) -> CheckResult {
    let name = format!("package_{}", slug(package));
    let missing = |message: String| {
        if required {
            CheckResult::fail(CATEGORY, name.clone(), message)
        } else {
            CheckResult::warning(CATEGORY, name.clone(), message)
        }
    };

    if !is_valid_module_name(package) {
        return missing(format!("invalid package name '{package}'"));
    }

    let script = format!("import importlib.metadata as m; print(m.version('{package}'))");
    match run_python(host, &script).await {
        Ok(out) if out.success() => CheckResult::pass(
            CATEGORY,
            name.clone(),
            format!("{package} {}", out.stdout.trim()),
        ),
        Ok(out) => missing(format!("{package} not found"))
            .with_details(out.first_error_line().to_string()),
        Err(e) => missing(format!("{package} check failed")).with_details(e.to_string()),
    }
}
