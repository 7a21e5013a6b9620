//! Checks, check specs and the registry
//!
//! A `Check` performs exactly one observation through a connector and returns
//! an `Observation` (pass or fail) or a `ConnectorError`. `CheckSpec::run` is
//! the check boundary: it converts faults, panics, timeouts and cancellation
//! into a `CheckResult`, so nothing escapes into the runner.

use futures::FutureExt;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::pin::Pin;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::Instrument;

use crate::cancel::CancellationToken;
use crate::error::{ConnectorError, HarnessError, Result};
use crate::model::{elapsed_ms, CheckResult, CheckStatus};

/// Future returned by `Check::observe`
pub type CheckFuture<'a> =
    Pin<Box<dyn Future<Output = std::result::Result<Observation, ConnectorError>> + Send + 'a>>;

/// Trait for a single verification
pub trait Check: Send + Sync {
    /// Observation kind, used for reporting and listing
    fn kind(&self) -> CheckKind;

    /// Perform the observation
    fn observe(&self) -> CheckFuture<'_>;
}

/// Observation kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckKind {
    /// Path existence and required children
    Filesystem,
    /// HTTP round trip
    Reachability,
    /// Password hash round trip
    PasswordHash,
    /// External capability resolution
    Dependency,
    /// Document store read
    DataStore,
    /// User-supplied closure
    Custom,
}

impl fmt::Display for CheckKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            CheckKind::Filesystem => "filesystem",
            CheckKind::Reachability => "reachability",
            CheckKind::PasswordHash => "password_hash",
            CheckKind::Dependency => "dependency",
            CheckKind::DataStore => "data_store",
            CheckKind::Custom => "custom",
        };
        f.write_str(label)
    }
}

/// Whether a completed observation found its condition to hold
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Pass,
    Fail,
}

/// A completed observation
#[derive(Debug, Clone)]
pub struct Observation {
    pub verdict: Verdict,
    pub message: String,
    pub diagnostics: BTreeMap<String, serde_json::Value>,
}

impl Observation {
    /// Condition holds
    pub fn pass(message: impl Into<String>) -> Self {
        Self {
            verdict: Verdict::Pass,
            message: message.into(),
            diagnostics: BTreeMap::new(),
        }
    }

    /// Condition is false
    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            verdict: Verdict::Fail,
            message: message.into(),
            diagnostics: BTreeMap::new(),
        }
    }

    /// Record a structured diagnostic
    pub fn with_diagnostic(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.diagnostics.insert(key.into(), value.into());
        self
    }
}

/// Check built from a closure returning a future
pub struct FnCheck<F> {
    kind: CheckKind,
    action: F,
}

impl<F, Fut> Check for FnCheck<F>
where
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = std::result::Result<Observation, ConnectorError>> + Send + 'static,
{
    fn kind(&self) -> CheckKind {
        self.kind
    }

    fn observe(&self) -> CheckFuture<'_> {
        Box::pin((self.action)())
    }
}

/// A named check, immutable once registered
#[derive(Clone)]
pub struct CheckSpec {
    name: String,
    check: Arc<dyn Check>,
}

impl CheckSpec {
    pub fn new(name: impl Into<String>, check: impl Check + 'static) -> Self {
        Self {
            name: name.into(),
            check: Arc::new(check),
        }
    }

    /// Wrap a closure as a custom check
    pub fn from_fn<F, Fut>(name: impl Into<String>, action: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = std::result::Result<Observation, ConnectorError>> + Send + 'static,
    {
        Self::new(
            name,
            FnCheck {
                kind: CheckKind::Custom,
                action,
            },
        )
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> CheckKind {
        self.check.kind()
    }

    /// Execute the check within `timeout`, honouring `cancel`.
    ///
    /// Never panics and never returns an error: every outcome is a result.
    pub async fn run(&self, timeout: Duration, cancel: &CancellationToken) -> CheckResult {
        let kind = self.kind();
        let span = tracing::info_span!("check", name = %self.name, %kind);

        async move {
            let start = Instant::now();
            // `observe` itself may panic before returning a future.
            let observed =
                AssertUnwindSafe(async { self.check.observe().await }).catch_unwind();

            let (status, message, diagnostics) = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    (CheckStatus::Error, "cancelled".to_string(), BTreeMap::new())
                }
                outcome = tokio::time::timeout(timeout, observed) => match outcome {
                    Err(_) => (CheckStatus::Error, "timed out".to_string(), BTreeMap::new()),
                    Ok(Err(panic)) => (
                        CheckStatus::Error,
                        format!("check panicked: {}", panic_message(panic.as_ref())),
                        BTreeMap::new(),
                    ),
                    Ok(Ok(Err(fault))) => (CheckStatus::Error, fault.to_string(), BTreeMap::new()),
                    Ok(Ok(Ok(observation))) => {
                        let status = match observation.verdict {
                            Verdict::Pass => CheckStatus::Pass,
                            Verdict::Fail => CheckStatus::Fail,
                        };
                        (status, observation.message, observation.diagnostics)
                    }
                },
            };

            let duration_ms = elapsed_ms(start.elapsed());
            match status {
                CheckStatus::Pass => tracing::debug!(duration_ms, "check passed"),
                CheckStatus::Fail => tracing::info!(duration_ms, %message, "check failed"),
                CheckStatus::Error => tracing::warn!(duration_ms, %message, "check errored"),
            }

            CheckResult::new(self.name.clone(), kind, status, Some(message), duration_ms)
                .with_diagnostics(diagnostics)
        }
        .instrument(span)
        .await
    }
}

impl fmt::Debug for CheckSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CheckSpec")
            .field("name", &self.name)
            .field("kind", &self.kind())
            .finish()
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

/// Ordered set of uniquely named check specs
#[derive(Debug, Clone, Default)]
pub struct CheckRegistry {
    specs: Vec<CheckSpec>,
}

impl CheckRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a spec; names must be unique
    pub fn register(&mut self, spec: CheckSpec) -> Result<()> {
        if self.get(spec.name()).is_some() {
            return Err(HarnessError::DuplicateCheck(spec.name().to_string()));
        }
        self.specs.push(spec);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&CheckSpec> {
        self.specs.iter().find(|s| s.name() == name)
    }

    /// Specs in registration order
    pub fn specs(&self) -> &[CheckSpec] {
        &self.specs
    }

    pub fn names(&self) -> Vec<&str> {
        self.specs.iter().map(|s| s.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    /// Narrow the registry to `only` (all when empty) minus `skip`.
    ///
    /// Unknown names in either list are structural faults, as is an empty
    /// selection.
    pub fn select(&self, only: &[String], skip: &[String]) -> Result<CheckRegistry> {
        for name in only.iter().chain(skip) {
            if self.get(name).is_none() {
                return Err(HarnessError::UnknownCheck(name.clone()));
            }
        }

        let only: HashSet<&str> = only.iter().map(String::as_str).collect();
        let skip: HashSet<&str> = skip.iter().map(String::as_str).collect();

        let specs: Vec<CheckSpec> = self
            .specs
            .iter()
            .filter(|s| only.is_empty() || only.contains(s.name()))
            .filter(|s| !skip.contains(s.name()))
            .cloned()
            .collect();

        if specs.is_empty() {
            return Err(HarnessError::NoChecks);
        }
        Ok(CheckRegistry { specs })
    }
}
