//! smokecheck command-line runner
//!
//! Builds the default check registry from `SMOKECHECK__*` environment
//! variables, runs it and renders the report.

pub mod cli;

pub use cli::{run as run_cli, ExitCode, OutputFormat, SmokeCli, SmokeCommands};
