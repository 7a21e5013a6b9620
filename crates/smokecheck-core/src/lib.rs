//! smokecheck core
//!
//! A small verification harness for the taskboard deployment. Each check
//! performs one observation against the built or running system (file
//! existence, HTTP reachability, password-hash round trip, dependency
//! resolution, document-store read) and reports pass, fail or error.
//!
//! # Architecture
//!
//! 1. **Model** (`model`): `CheckResult`, `CheckStatus` and the aggregated
//!    `RunReport`.
//! 2. **Checks** (`check`, `checks/`): the `Check` trait, `CheckSpec` and the
//!    `CheckRegistry`, plus the built-in observation kinds.
//! 3. **Connectors** (`connectors/`): adapters to the filesystem, HTTP,
//!    argon2, `PATH` and document stores.
//! 4. **Runner** (`runner`): sequential or bounded-concurrency execution with
//!    per-check timeouts and cooperative cancellation.
//! 5. **Settings** (`settings/`): environment-driven configuration for the
//!    built-in checks.
//!
//! # Example
//!
//! ```rust,no_run
//! use smokecheck_core::{CheckRegistry, CheckSpec, Observation, Runner, RunnerConfig};
//!
//! # async fn demo() -> Result<(), smokecheck_core::HarnessError> {
//! let mut registry = CheckRegistry::new();
//! registry.register(CheckSpec::from_fn("always-green", || async {
//!     Ok(Observation::pass("nothing to see"))
//! }))?;
//!
//! let report = Runner::new(RunnerConfig::default())
//!     .run_all(registry.specs())
//!     .await;
//! assert!(report.is_success());
//! # Ok(())
//! # }
//! ```

pub mod cancel;
pub mod check;
pub mod checks;
pub mod connectors;
pub mod error;
pub mod model;
pub mod runner;
pub mod settings;

pub use cancel::CancellationToken;
pub use check::{Check, CheckFuture, CheckKind, CheckRegistry, CheckSpec, Observation, Verdict};
pub use checks::default_registry;
pub use error::{ConnectorError, HarnessError, Result};
pub use model::{CheckResult, CheckStatus, OverallStatus, RunReport, StatusCounts};
pub use runner::{ExecutionMode, Runner, RunnerConfig};
pub use settings::{EnvSource, HarnessSettings, ProcessEnv};

/// Harness version (from Cargo.toml)
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
