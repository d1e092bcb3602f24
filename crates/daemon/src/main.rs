// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Remote timer daemon (timerd)
//!
//! Background process that drives remotes to their scheduled state.

use std::process::ExitCode;

use clap::Parser;
use timer_daemon::lifecycle::{setup_logging, setup_stderr_logging, PidFile};
use timer_daemon::{check, daemon, Args};
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();

    if args.syntax {
        setup_stderr_logging();
        let ok = check::check_config(
            &args.config,
            args.verbose,
            &mut rand::thread_rng(),
            &mut std::io::stdout().lock(),
        )?;
        return Ok(if ok {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        });
    }

    // PID lock before any logging setup
    let pid_file = PidFile::acquire(&args.pid_file)?;
    let log_dir = args.log_dir();
    let _log_guard = setup_logging(&log_dir)?;

    info!(
        pid = std::process::id(),
        config = %args.config.display(),
        log_dir = %log_dir.display(),
        "Starting timerd"
    );

    let result = daemon::run(&args.config).await;
    if let Err(e) = &result {
        error!("Daemon failed: {}", e);
    }
    pid_file.release();
    result?;

    Ok(ExitCode::SUCCESS)
}
