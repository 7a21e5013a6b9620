//! Harness runner
//!
//! Executes check specs and assembles the run report.

use chrono::Utc;
use futures::StreamExt;
use std::time::{Duration, Instant};

use crate::cancel::CancellationToken;
use crate::check::CheckSpec;
use crate::model::{elapsed_ms, CheckResult, RunReport};

/// Default per-check timeout
pub const DEFAULT_TIMEOUT_MS: u64 = 5000;

/// How specs are scheduled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionMode {
    /// One check at a time, in registration order
    Sequential,
    /// Up to `limit` checks in flight; results still in registration order
    Concurrent { limit: usize },
}

/// Runner options
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Upper bound for a single check
    pub timeout: Duration,
    pub mode: ExecutionMode,
    /// Stop scheduling new checks after the first non-pass result
    pub stop_on_failure: bool,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            mode: ExecutionMode::Sequential,
            stop_on_failure: false,
        }
    }
}

impl RunnerConfig {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// A limit of 0 or 1 means sequential execution.
    pub fn with_concurrency(mut self, limit: usize) -> Self {
        self.mode = if limit <= 1 {
            ExecutionMode::Sequential
        } else {
            ExecutionMode::Concurrent { limit }
        };
        self
    }

    pub fn with_stop_on_failure(mut self, stop: bool) -> Self {
        self.stop_on_failure = stop;
        self
    }
}

/// Executes specs and produces a `RunReport`
#[derive(Debug, Clone, Default)]
pub struct Runner {
    config: RunnerConfig,
}

impl Runner {
    pub fn new(config: RunnerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// Run every spec to completion.
    pub async fn run_all(&self, specs: &[CheckSpec]) -> RunReport {
        self.run_all_with_cancel(specs, &CancellationToken::new())
            .await
    }

    /// Run every spec, stopping early if `cancel` fires.
    ///
    /// Checks in flight or not yet started when cancellation is observed are
    /// recorded as errors with the message `cancelled`.
    pub async fn run_all_with_cancel(
        &self,
        specs: &[CheckSpec],
        cancel: &CancellationToken,
    ) -> RunReport {
        let started_at = Utc::now();
        let start = Instant::now();

        tracing::info!(
            checks = specs.len(),
            mode = ?self.config.mode,
            timeout_ms = elapsed_ms(self.config.timeout),
            "starting verification run"
        );

        let results = match self.config.mode {
            ExecutionMode::Sequential => self.run_sequential(specs, cancel).await,
            ExecutionMode::Concurrent { limit } => {
                self.run_concurrent(specs, limit.max(1), cancel).await
            }
        };

        let skipped: Vec<String> = specs[results.len()..]
            .iter()
            .map(|s| s.name().to_string())
            .collect();

        let report = RunReport::new(
            started_at,
            elapsed_ms(start.elapsed()),
            results,
            skipped,
            cancel.is_cancelled(),
        );

        tracing::info!(summary = %report.summary_line(), "verification run finished");
        report
    }

    async fn run_sequential(
        &self,
        specs: &[CheckSpec],
        cancel: &CancellationToken,
    ) -> Vec<CheckResult> {
        let mut results = Vec::with_capacity(specs.len());

        for spec in specs {
            let result = execute(spec, self.config.timeout, cancel).await;
            let stop = self.should_stop(&result, cancel);
            results.push(result);
            if stop {
                tracing::info!(check = spec.name(), "stopping after first failure");
                break;
            }
        }

        results
    }

    async fn run_concurrent(
        &self,
        specs: &[CheckSpec],
        limit: usize,
        cancel: &CancellationToken,
    ) -> Vec<CheckResult> {
        let timeout = self.config.timeout;
        // `buffered` yields in input order regardless of completion order.
        // Collected up front (futures are lazy) so the spawned future is `Send`.
        let pending: Vec<_> = specs
            .iter()
            .map(|spec| execute(spec, timeout, cancel))
            .collect();
        let mut outcomes = futures::stream::iter(pending).buffered(limit);

        // Stopping drops the stream, abandoning checks still in flight.
        let mut results = Vec::with_capacity(specs.len());
        while let Some(result) = outcomes.next().await {
            let stop = self.should_stop(&result, cancel);
            let name = result.name.clone();
            results.push(result);
            if stop {
                tracing::info!(check = %name, "stopping after first failure");
                break;
            }
        }

        results
    }

    /// After cancellation every remaining spec must still report `cancelled`,
    /// so a cancelled result never stops the run.
    fn should_stop(&self, result: &CheckResult, cancel: &CancellationToken) -> bool {
        self.config.stop_on_failure && !result.status.is_pass() && !cancel.is_cancelled()
    }
}

async fn execute(spec: &CheckSpec, timeout: Duration, cancel: &CancellationToken) -> CheckResult {
    if cancel.is_cancelled() {
        return CheckResult::error(spec.name(), spec.kind(), "cancelled", 0);
    }
    spec.run(timeout, cancel).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::check::Observation;
    use crate::error::ConnectorError;
    use crate::model::CheckStatus;

    fn delayed(name: &str, delay_ms: u64, pass: bool) -> CheckSpec {
        CheckSpec::from_fn(name, move || async move {
            tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            if pass {
                Ok(Observation::pass("ok"))
            } else {
                Ok(Observation::fail("nope"))
            }
        })
    }

    #[tokio::test]
    async fn test_zero_checks_is_pass() {
        let report = Runner::default().run_all(&[]).await;
        assert!(report.is_success());
        assert!(report.results().is_empty());
    }

    #[tokio::test]
    async fn test_runs_all_checks_despite_failures() {
        let specs = vec![
            delayed("a", 0, false),
            CheckSpec::from_fn("b", || async { Err(ConnectorError::Other("broken".into())) }),
            delayed("c", 0, true),
        ];
        let report = Runner::default().run_all(&specs).await;

        let statuses: Vec<_> = report.results().iter().map(|r| r.status).collect();
        assert_eq!(
            statuses,
            vec![CheckStatus::Fail, CheckStatus::Error, CheckStatus::Pass]
        );
        assert!(!report.is_success());
        assert!(report.skipped().is_empty());
    }

    #[tokio::test]
    async fn test_stop_on_failure_skips_rest() {
        let specs = vec![delayed("a", 0, true), delayed("b", 0, false), delayed("c", 0, true)];
        let runner = Runner::new(RunnerConfig::default().with_stop_on_failure(true));
        let report = runner.run_all(&specs).await;

        assert_eq!(report.results().len(), 2);
        assert_eq!(report.skipped(), &["c".to_string()]);
    }

    #[tokio::test]
    async fn test_concurrent_preserves_registration_order() {
        let specs = vec![
            delayed("slow", 80, true),
            delayed("medium", 40, false),
            delayed("fast", 0, true),
        ];
        let runner = Runner::new(RunnerConfig::default().with_concurrency(3));
        let report = runner.run_all(&specs).await;

        let names: Vec<_> = report.results().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["slow", "medium", "fast"]);
    }

    #[tokio::test]
    async fn test_cancel_marks_in_flight_and_pending() {
        let specs = vec![delayed("first", 0, true), delayed("hang", 10_000, true), delayed("last", 0, true)];
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            trigger.cancel();
        });

        let report = Runner::default()
            .run_all_with_cancel(&specs, &cancel)
            .await;

        assert!(report.was_cancelled());
        assert_eq!(report.results().len(), 3);
        assert_eq!(report.results()[0].status, CheckStatus::Pass);
        for result in &report.results()[1..] {
            assert_eq!(result.status, CheckStatus::Error);
            assert_eq!(result.message.as_deref(), Some("cancelled"));
        }
    }

    #[tokio::test]
    async fn test_cancel_with_stop_on_failure_reports_pending_as_cancelled() {
        let specs = vec![delayed("hang", 30_000, true), delayed("pending-1", 0, true), delayed("pending-2", 0, true)];
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            trigger.cancel();
        });

        let runner = Runner::new(RunnerConfig::default().with_stop_on_failure(true));
        let report = runner.run_all_with_cancel(&specs, &cancel).await;

        assert!(report.skipped().is_empty());
        let names: Vec<_> = report.results().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["hang", "pending-1", "pending-2"]);
        for result in report.results() {
            assert_eq!(result.status, CheckStatus::Error);
            assert_eq!(result.message.as_deref(), Some("cancelled"));
        }
    }

    #[tokio::test]
    async fn test_concurrent_stop_abandons_in_flight_checks() {
        let specs = vec![delayed("broken", 0, false), delayed("slow", 5_000, true), delayed("later", 0, true)];
        let runner = Runner::new(
            RunnerConfig::default()
                .with_concurrency(2)
                .with_stop_on_failure(true),
        );
        let report = runner.run_all(&specs).await;

        assert_eq!(report.results().len(), 1);
        assert_eq!(report.results()[0].status, CheckStatus::Fail);
        assert_eq!(report.skipped(), &["slow".to_string(), "later".to_string()]);
    }

    #[tokio::test]
    async fn test_concurrent_run_can_be_spawned() {
        let specs = vec![delayed("a", 10, true), delayed("b", 0, false), delayed("c", 0, true)];
        let handle = tokio::spawn(async move {
            Runner::new(RunnerConfig::default().with_concurrency(2))
                .run_all(&specs)
                .await
        });

        let report = handle.await.unwrap();
        assert_eq!(report.results().len(), 3);
        assert_eq!(report.counts().failed, 1);
    }

    #[test]
    fn test_concurrency_of_one_is_sequential() {
        let config = RunnerConfig::default().with_concurrency(1);
        assert_eq!(config.mode, ExecutionMode::Sequential);
        let config = RunnerConfig::default().with_concurrency(4);
        assert_eq!(config.mode, ExecutionMode::Concurrent { limit: 4 });
    }
}
