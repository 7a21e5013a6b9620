//! smokecheck CLI
//!
//! # Usage
//!
//! ```bash
//! # Run every registered check
//! SMOKECHECK__SERVER__PORT=5000 SMOKECHECK__STORE__URL=sled://data/taskboard smokecheck
//!
//! # Run two checks concurrently and emit JSON
//! smokecheck run --only server --only task-store --concurrency 2 --format json
//!
//! # List registered checks
//! smokecheck list
//! ```
//!
//! # Exit Codes
//!
//! - 0: every check passed
//! - 1: at least one check failed or errored
//! - 2: structural fault, nothing was run
//! - 130: interrupted

use clap::Parser;
use smokecheck_cli::{run_cli, ExitCode, SmokeCli};
use smokecheck_core::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() {
    let cli = SmokeCli::parse();

    init_tracing(cli.verbose, cli.log_json);
    if cli.no_color {
        colored::control::set_override(false);
    }

    let runtime = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("error: failed to start async runtime: {}", e);
            std::process::exit(ExitCode::StructuralFault.into());
        }
    };

    let cancel = CancellationToken::new();
    let exit_code = runtime.block_on(async {
        let trigger = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::warn!("interrupt received, cancelling run");
                trigger.cancel();
            }
        });

        run_cli(cli, &cancel).await
    });

    std::process::exit(exit_code.into());
}

fn init_tracing(verbose: u8, json: bool) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(layer.json()).init();
    } else {
        registry.with(layer).init();
    }
}
