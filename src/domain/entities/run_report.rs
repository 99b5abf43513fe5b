use chrono::{DateTime, Utc};
use serde::Serialize;

use super::check_result::CheckResult;
use crate::domain::value_objects::category::{Category, CategorySelector};
use crate::domain::value_objects::status::CheckStatus;

/// Status counts derived from a report's results.
///
/// Never stored alongside the results; always recomputed with [`Summary::of`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub pass_count: usize,
    pub warning_count: usize,
    pub fail_count: usize,
    pub info_count: usize,
}

impl Summary {
    #[must_use]
    pub fn of<'a>(results: impl IntoIterator<Item = &'a CheckResult>) -> Self {
        results
            .into_iter()
            .fold(Self::default(), |mut acc, result| {
                match result.status() {
                    CheckStatus::Pass => acc.pass_count += 1,
                    CheckStatus::Warning => acc.warning_count += 1,
                    CheckStatus::Fail => acc.fail_count += 1,
                    CheckStatus::Info => acc.info_count += 1,
                }
                acc
            })
    }

    #[must_use]
    pub const fn total(&self) -> usize {
        self.pass_count + self.warning_count + self.fail_count + self.info_count
    }

    #[must_use]
    pub const fn is_clean(&self) -> bool {
        self.fail_count == 0 && self.warning_count == 0
    }
}

/// Append-only collection filled while a run is in progress.
#[derive(Debug, Default)]
pub struct ResultStore {
    results: Vec<CheckResult>,
}

impl ResultStore {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            results: Vec::new(),
        }
    }

    pub fn append(&mut self, result: CheckResult) {
        self.results.push(result);
    }

    pub fn extend(&mut self, results: impl IntoIterator<Item = CheckResult>) {
        self.results.extend(results);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.results.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Seals the store into an immutable report.
    #[must_use]
    pub fn finalize(
        self,
        selector: CategorySelector,
        started_at: DateTime<Utc>,
        cancelled: bool,
    ) -> RunReport {
        RunReport {
            selector,
            started_at,
            finished_at: Utc::now(),
            cancelled,
            results: self.results,
        }
    }
}

/// Finalized output of one invocation.
#[derive(Debug, Clone)]
pub struct RunReport {
    selector: CategorySelector,
    started_at: DateTime<Utc>,
    finished_at: DateTime<Utc>,
    cancelled: bool,
    results: Vec<CheckResult>,
}

impl RunReport {
    #[must_use]
    pub fn results(&self) -> &[CheckResult] {
        &self.results
    }

    #[must_use]
    pub fn summary(&self) -> Summary {
        Summary::of(&self.results)
    }

    #[must_use]
    pub fn summary_for(&self, category: Category) -> Summary {
        Summary::of(self.results.iter().filter(|r| r.category() == category))
    }

    /// Results with the given status, in execution order.
    pub fn with_status(&self, status: CheckStatus) -> impl Iterator<Item = &CheckResult> {
        self.results.iter().filter(move |r| r.status() == status)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.results.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    #[must_use]
    pub const fn selector(&self) -> CategorySelector {
        self.selector
    }

    #[must_use]
    pub const fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub const fn finished_at(&self) -> DateTime<Utc> {
        self.finished_at
    }

    #[must_use]
    pub const fn cancelled(&self) -> bool {
        self.cancelled
    }

    /// The run failed iff at least one FAIL was recorded.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.summary().fail_count == 0
    }

    #[must_use]
    pub fn exit_code(&self) -> u8 {
        u8::from(!self.is_success())
    }
}
