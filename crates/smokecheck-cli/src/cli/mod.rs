//! CLI module for smokecheck
//!
//! Parses arguments, runs or lists the registered checks and maps the outcome
//! to a process exit code. This is the only place exit codes are decided.

pub mod commands;
pub mod output;

pub use commands::{RunArgs, SmokeCli, SmokeCommands};
pub use output::{OutputFormat, ReportOutput};

use colored::Colorize;
use smokecheck_core::{CancellationToken, HarnessSettings, RunReport};
use std::io;

/// Exit codes for CLI operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Every check passed
    Success = 0,
    /// At least one check failed or errored
    ChecksFailed = 1,
    /// The run could not start (bad flags, unknown or empty selection)
    StructuralFault = 2,
    /// Interrupted before completion
    Interrupted = 130,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code as i32
    }
}

impl ExitCode {
    /// Determine exit code from a finished run
    pub fn from_report(report: &RunReport) -> Self {
        if report.was_cancelled() {
            ExitCode::Interrupted
        } else if report.is_success() {
            ExitCode::Success
        } else {
            ExitCode::ChecksFailed
        }
    }
}

/// Run the CLI and return the exit code
pub async fn run(cli: SmokeCli, cancel: &CancellationToken) -> ExitCode {
    let settings = HarnessSettings::from_process_env();
    let mut stdout = io::stdout();
    let mut stderr = io::stderr();

    let outcome = match cli.into_command() {
        SmokeCommands::Run(args) => {
            commands::execute_run(&args, &settings, cancel, &mut stdout, &mut stderr).await
        }
        SmokeCommands::List { format } => commands::execute_list(&settings, format, &mut stdout),
    };

    match outcome {
        Ok(code) => code,
        Err(e) => {
            tracing::debug!(error = ?e, "run aborted before checks executed");
            eprintln!("{} {:#}", "error:".red().bold(), e);
            ExitCode::StructuralFault
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use smokecheck_core::{CheckKind, CheckResult, CheckStatus};

    fn report_with(status: CheckStatus, cancelled: bool) -> RunReport {
        RunReport::new(
            Utc::now(),
            1,
            vec![CheckResult::new("server", CheckKind::Reachability, status, None, 1)],
            vec![],
            cancelled,
        )
    }

    #[test]
    fn test_exit_code_conversion() {
        assert_eq!(i32::from(ExitCode::Success), 0);
        assert_eq!(i32::from(ExitCode::ChecksFailed), 1);
        assert_eq!(i32::from(ExitCode::StructuralFault), 2);
        assert_eq!(i32::from(ExitCode::Interrupted), 130);
    }

    #[test]
    fn test_exit_code_from_report() {
        assert_eq!(
            ExitCode::from_report(&report_with(CheckStatus::Pass, false)),
            ExitCode::Success
        );
        assert_eq!(
            ExitCode::from_report(&report_with(CheckStatus::Fail, false)),
            ExitCode::ChecksFailed
        );
        assert_eq!(
            ExitCode::from_report(&report_with(CheckStatus::Error, false)),
            ExitCode::ChecksFailed
        );
        assert_eq!(
            ExitCode::from_report(&report_with(CheckStatus::Error, true)),
            ExitCode::Interrupted
        );
    }
}
