//! Check results and run reports
//!
//! `CheckResult` is produced once per executed check and never mutated.
//! `RunReport` aggregates results in registration order; its overall status
//! is derived from the results alone.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;
use uuid::Uuid;

use crate::check::CheckKind;

/// Whole milliseconds in `duration`, saturating at `u64::MAX`.
pub(crate) fn elapsed_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// Outcome of a single check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckStatus {
    /// Observation completed and the condition holds
    Pass,
    /// Observation completed and the condition is false
    Fail,
    /// Observation could not complete
    Error,
}

impl CheckStatus {
    /// Glyph printed in front of a check line
    pub fn glyph(&self) -> &'static str {
        match self {
            CheckStatus::Pass => "+",
            CheckStatus::Fail => "x",
            CheckStatus::Error => "!",
        }
    }

    pub fn is_pass(&self) -> bool {
        matches!(self, CheckStatus::Pass)
    }
}

impl fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckStatus::Pass => write!(f, "pass"),
            CheckStatus::Fail => write!(f, "fail"),
            CheckStatus::Error => write!(f, "error"),
        }
    }
}

/// Result of executing one check
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckResult {
    /// Check name (unique within a run)
    pub name: String,

    /// Observation kind
    pub kind: CheckKind,

    /// Outcome
    pub status: CheckStatus,

    /// Human-readable detail; fault text is kept verbatim for errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Wall-clock duration in milliseconds
    pub duration_ms: u64,

    /// Structured observations (status code, entry count, ...)
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub diagnostics: BTreeMap<String, serde_json::Value>,

    /// Completion timestamp
    pub finished_at: DateTime<Utc>,
}

impl CheckResult {
    /// Create a result with no diagnostics
    pub fn new(
        name: impl Into<String>,
        kind: CheckKind,
        status: CheckStatus,
        message: Option<String>,
        duration_ms: u64,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            status,
            message,
            duration_ms,
            diagnostics: BTreeMap::new(),
            finished_at: Utc::now(),
        }
    }

    /// Create an error result
    pub fn error(
        name: impl Into<String>,
        kind: CheckKind,
        message: impl Into<String>,
        duration_ms: u64,
    ) -> Self {
        Self::new(name, kind, CheckStatus::Error, Some(message.into()), duration_ms)
    }

    /// Attach diagnostics
    pub fn with_diagnostics(mut self, diagnostics: BTreeMap<String, serde_json::Value>) -> Self {
        self.diagnostics = diagnostics;
        self
    }
}

/// Aggregate status of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverallStatus {
    Pass,
    Fail,
}

/// Per-status tallies
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    pub passed: usize,
    pub failed: usize,
    pub errored: usize,
}

impl StatusCounts {
    fn tally(results: &[CheckResult]) -> Self {
        results.iter().fold(Self::default(), |mut acc, r| {
            match r.status {
                CheckStatus::Pass => acc.passed += 1,
                CheckStatus::Fail => acc.failed += 1,
                CheckStatus::Error => acc.errored += 1,
            }
            acc
        })
    }

    pub fn total(&self) -> usize {
        self.passed + self.failed + self.errored
    }
}

/// Report for one execution of the harness
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    run_id: Uuid,
    started_at: DateTime<Utc>,
    duration_ms: u64,
    overall_status: OverallStatus,
    counts: StatusCounts,
    results: Vec<CheckResult>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    skipped: Vec<String>,
    cancelled: bool,
}

impl RunReport {
    /// Assemble a report. The overall status is computed here and nowhere else.
    pub fn new(
        started_at: DateTime<Utc>,
        duration_ms: u64,
        results: Vec<CheckResult>,
        skipped: Vec<String>,
        cancelled: bool,
    ) -> Self {
        let overall_status = if results.iter().all(|r| r.status.is_pass()) {
            OverallStatus::Pass
        } else {
            OverallStatus::Fail
        };

        Self {
            run_id: Uuid::new_v4(),
            started_at,
            duration_ms,
            overall_status,
            counts: StatusCounts::tally(&results),
            results,
            skipped,
            cancelled,
        }
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn duration_ms(&self) -> u64 {
        self.duration_ms
    }

    pub fn overall_status(&self) -> OverallStatus {
        self.overall_status
    }

    pub fn counts(&self) -> StatusCounts {
        self.counts
    }

    /// Results in registration order
    pub fn results(&self) -> &[CheckResult] {
        &self.results
    }

    /// Names with no result because the run stopped on the first failure.
    ///
    /// In concurrent mode this includes checks that were already in flight
    /// when the run stopped; they are abandoned and their outcome discarded.
    pub fn skipped(&self) -> &[String] {
        &self.skipped
    }

    pub fn was_cancelled(&self) -> bool {
        self.cancelled
    }

    /// Success signal for pipelines, independent of any rendering.
    pub fn is_success(&self) -> bool {
        self.overall_status == OverallStatus::Pass
    }

    /// The one-line human summary that closes every run.
    pub fn summary_line(&self) -> String {
        let mut line = format!(
            "{} passed, {} failed, {} errored",
            self.counts.passed, self.counts.failed, self.counts.errored
        );
        if !self.skipped.is_empty() {
            line.push_str(&format!(", {} skipped", self.skipped.len()));
        }
        line.push_str(&format!(
            " ({} checks in {}ms)",
            self.counts.total(),
            self.duration_ms
        ));
        if self.cancelled {
            line.push_str(" [cancelled]");
        }
        line
    }
}
