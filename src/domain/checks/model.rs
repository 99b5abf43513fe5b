use std::fs;
use std::path::Path;

use async_trait::async_trait;
use walkdir::WalkDir;

use super::{blocking_with_timeout, slug, Checker, HostContext};
use crate::domain::entities::check_result::CheckResult;
use crate::domain::value_objects::category::Category;

const CATEGORY: Category = Category::Model;

/// Validates the on-disk model directory served by the inference engine.
pub struct ModelChecker;

/// Total size and weight-shard count of a directory tree
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DirectoryUsage {
    pub bytes: u64,
    pub weight_files: usize,
}

impl DirectoryUsage {
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn gigabytes(&self) -> f64 {
        self.bytes as f64 / (1024.0 * 1024.0 * 1024.0)
    }
}

#[async_trait]
impl Checker for ModelChecker {
    fn category(&self) -> Category {
        CATEGORY
    }

    async fn check(&self, host: &HostContext<'_>) -> Vec<CheckResult> {
        let target = &host.targets.model;
        let path = target.path.as_path();
        let shown = path.display().to_string();

        if !path.is_dir() {
            let message = if path.exists() {
                "model path is not a directory"
            } else {
                "model directory not found"
            };
            return vec![CheckResult::fail(CATEGORY, "directory", message).with_details(shown)];
        }

        let mut results =
            vec![CheckResult::pass(CATEGORY, "directory", "model directory present").with_details(shown)];

        if let Err(e) = fs::read_dir(path) {
            results.push(
                CheckResult::fail(CATEGORY, "readable", "model directory is not readable")
                    .with_details(e.to_string()),
            );
            return results;
        }
        results.push(CheckResult::pass(CATEGORY, "readable", "model directory readable"));

        for file in &target.required_files {
            let name = format!("required_{}", slug(file));
            results.push(if path.join(file).is_file() {
                CheckResult::pass(CATEGORY, name, format!("{file} present"))
            } else {
                CheckResult::fail(CATEGORY, name, format!("{file} missing"))
            });
        }

        for file in &target.optional_files {
            let name = format!("optional_{}", slug(file));
            results.push(if path.join(file).is_file() {
                CheckResult::pass(CATEGORY, name, format!("{file} present"))
            } else {
                CheckResult::warning(CATEGORY, name, format!("{file} missing"))
            });
        }

        let root = path.to_path_buf();
        let extensions = target.weight_extensions.clone();
        let usage = match blocking_with_timeout(host.query_timeout, move || {
            directory_usage(&root, &extensions)
        })
        .await
        {
            Ok(usage) => usage,
            Err(e) => {
                results.push(
                    CheckResult::warning(CATEGORY, "size", "model directory scan did not finish")
                        .with_details(e.to_string()),
                );
                return results;
            }
        };
        let size_gb = usage.gigabytes();
        let minimum = host.thresholds.min_model_size_gb;
        results.push(if size_gb < minimum {
            CheckResult::warning(
                CATEGORY,
                "size",
                format!("model directory is only {size_gb:.1} GB"),
            )
            .with_details(format!("expected at least {minimum:.1} GB"))
        } else {
            CheckResult::pass(CATEGORY, "size", format!("model directory is {size_gb:.1} GB"))
        });

        results.push(
            CheckResult::info(
                CATEGORY,
                "weights",
                format!("{} weight file(s)", usage.weight_files),
            )
            .with_details(target.weight_extensions.join(", ")),
        );

        results
    }
}

/// Walks `root`, summing file sizes and counting files whose extension is in
/// `weight_extensions`.
///
/// Symlinked files are measured through the link so hub-style snapshot
/// directories report their real size. Symlinked directories are not followed.
/// Unreadable entries are skipped.
#[must_use]
pub fn directory_usage(root: &Path, weight_extensions: &[String]) -> DirectoryUsage {
    let mut usage = DirectoryUsage::default();

    let entries = WalkDir::new(root).follow_links(false).into_iter().filter_map(|entry| {
        entry
            .map_err(|e| tracing::debug!("skipping unreadable entry: {e}"))
            .ok()
    });
    for entry in entries {
        if entry.file_type().is_dir() {
            continue;
        }
        // Resolves symlinks; a link to a directory is not a file and is skipped.
        let Ok(meta) = fs::metadata(entry.path()) else {
            continue;
        };
        if !meta.is_file() {
            continue;
        }
        usage.bytes += meta.len();
        let is_weight = entry
            .path()
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| weight_extensions.iter().any(|w| w == ext));
        if is_weight {
            usage.weight_files += 1;
        }
    }

    usage
}
