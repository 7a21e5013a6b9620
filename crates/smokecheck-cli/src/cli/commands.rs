//! CLI command definitions for smokecheck
//!
//! Clap-based definitions for running the verification harness and listing
//! the registered checks.

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use smokecheck_core::runner::DEFAULT_TIMEOUT_MS;
use smokecheck_core::{
    default_registry, CancellationToken, HarnessError, HarnessSettings, Runner, RunnerConfig,
};
use std::io::Write;
use std::time::Duration;

use super::output::{render_listing, OutputFormat, ReportOutput};
use super::ExitCode;

/// smokecheck CLI
///
/// Verify a taskboard deployment: client build output, API server, password
/// hashing, required tooling and the task store.
#[derive(Parser, Debug)]
#[command(name = "smokecheck")]
#[command(about = "Verification harness for the taskboard deployment", long_about = None)]
#[command(version)]
#[command(args_conflicts_with_subcommands = true)]
pub struct SmokeCli {
    /// Log verbosity (-v, -vv, -vvv); RUST_LOG takes precedence
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Disable coloured glyphs
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Option<SmokeCommands>,

    // Flags for a bare invocation, which runs the checks.
    #[command(flatten)]
    pub run: RunArgs,
}

impl SmokeCli {
    /// The command to execute; a bare invocation means `run`.
    pub fn into_command(self) -> SmokeCommands {
        self.command.unwrap_or(SmokeCommands::Run(self.run))
    }
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum SmokeCommands {
    /// Run the registered checks (default)
    Run(RunArgs),

    /// List registered check names and kinds without running them
    List {
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
}

/// Options controlling a run
#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Report format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, env = "SMOKECHECK__RUN__FORMAT")]
    pub format: OutputFormat,

    /// Per-check timeout in milliseconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_MS, env = "SMOKECHECK__RUN__TIMEOUT_MS")]
    pub timeout_ms: u64,

    /// Maximum checks in flight; 1 runs sequentially
    #[arg(long, default_value_t = 1, env = "SMOKECHECK__RUN__CONCURRENCY")]
    pub concurrency: usize,

    /// Stop scheduling checks after the first failure or error
    #[arg(long, env = "SMOKECHECK__RUN__STOP_ON_FAILURE")]
    pub stop_on_failure: bool,

    /// Run only the named check (repeatable)
    #[arg(long = "only", value_name = "NAME")]
    pub only: Vec<String>,

    /// Skip the named check (repeatable)
    #[arg(long = "skip", value_name = "NAME")]
    pub skip: Vec<String>,
}

impl RunArgs {
    fn timeout(&self) -> Result<Duration, HarnessError> {
        if self.timeout_ms == 0 {
            return Err(HarnessError::invalid_setting(
                "--timeout-ms",
                "must be greater than zero",
            ));
        }
        Ok(Duration::from_millis(self.timeout_ms))
    }

    fn runner_config(&self, timeout: Duration) -> RunnerConfig {
        RunnerConfig::default()
            .with_timeout(timeout)
            .with_concurrency(self.concurrency)
            .with_stop_on_failure(self.stop_on_failure)
    }
}

/// Execute the run command
///
/// Structural faults (bad flags, unknown or empty selection) are returned as
/// errors before any check executes.
pub async fn execute_run<O: Write, E: Write>(
    args: &RunArgs,
    settings: &HarnessSettings,
    cancel: &CancellationToken,
    out: &mut O,
    err: &mut E,
) -> anyhow::Result<ExitCode> {
    let timeout = args.timeout()?;
    let registry = default_registry(settings, timeout)?.select(&args.only, &args.skip)?;

    tracing::debug!(checks = ?registry.names(), "selected checks");

    let runner = Runner::new(args.runner_config(timeout));
    let report = runner.run_all_with_cancel(registry.specs(), cancel).await;

    ReportOutput::from_report(&report)
        .render(args.format, out, err)
        .context("failed to render report")?;

    Ok(ExitCode::from_report(&report))
}

/// Execute the list command
pub fn execute_list<O: Write>(
    settings: &HarnessSettings,
    format: OutputFormat,
    out: &mut O,
) -> anyhow::Result<ExitCode> {
    let registry = default_registry(settings, Duration::from_millis(DEFAULT_TIMEOUT_MS))?;
    render_listing(&registry, format, out).context("failed to render check list")?;
    Ok(ExitCode::Success)
}
