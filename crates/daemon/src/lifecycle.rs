// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon lifecycle management: PID file, logging, configuration reload.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use fs2::FileExt;
use thiserror::Error;
use timer_adapters::BusAdapter;
use timer_core::{load_config, Clock, IdGen};
use timer_engine::Dispatcher;
use tracing::{error, info, warn};

/// Log file name prefix; the appender adds the date
pub const LOG_FILE_PREFIX: &str = ".timerd.log";

/// Rotated log files kept on disk
pub const LOG_FILES_KEPT: usize = 7;

/// Lifecycle errors
#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("Failed to acquire lock on {0}: daemon already running?")]
    LockFailed(PathBuf, #[source] std::io::Error),

    #[error("Failed to set up logging in {0}: {1}")]
    LogSetup(PathBuf, String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Exclusively locked PID file
///
/// The lock is held for as long as this value lives.
#[derive(Debug)]
pub struct PidFile {
    path: PathBuf,
    // NOTE(lifetime): Held to maintain exclusive file lock; released on drop
    _file: File,
}

impl PidFile {
    /// Lock `path` and write the current PID into it
    pub fn acquire(path: &Path) -> Result<Self, LifecycleError> {
        // No truncation until the lock is held
        let mut file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(path)?;
        file.try_lock_exclusive()
            .map_err(|e| LifecycleError::LockFailed(path.to_path_buf(), e))?;

        file.set_len(0)?;
        writeln!(file, "{}", std::process::id())?;
        file.flush()?;

        Ok(Self {
            path: path.to_path_buf(),
            _file: file,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Remove the PID file and release the lock
    pub fn release(self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            warn!("Failed to remove PID file: {}", e);
        }
    }
}

/// Log to daily-rotated files in `log_dir`
pub fn setup_logging(
    log_dir: &Path,
) -> Result<tracing_appender::non_blocking::WorkerGuard, LifecycleError> {
    use tracing_appender::rolling::{RollingFileAppender, Rotation};
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    std::fs::create_dir_all(log_dir)?;

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(LOG_FILE_PREFIX)
        .max_log_files(LOG_FILES_KEPT)
        .build(log_dir)
        .map_err(|e| LifecycleError::LogSetup(log_dir.to_path_buf(), e.to_string()))?;
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .try_init()
        .map_err(|e| LifecycleError::LogSetup(log_dir.to_path_buf(), e.to_string()))?;

    Ok(guard)
}

/// Log to stderr, for validate-only runs
pub fn setup_stderr_logging() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    // A subscriber may already be installed (tests); keep it
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).without_time())
        .try_init();
}

/// Reload remotes from `path` into the dispatcher
///
/// On a file-level failure the dispatcher keeps its current remotes and
/// delivery state. Remotes that fail to build are dropped from the new set.
/// Returns whether the remotes were replaced.
pub fn reload_config<B, C, I>(dispatcher: &mut Dispatcher<B, C, I>, path: &Path) -> bool
where
    B: BusAdapter,
    C: Clock,
    I: IdGen,
{
    match load_config(path, &mut rand::thread_rng()) {
        Ok(loaded) => {
            if !loaded.failures.is_empty() {
                warn!(
                    failed = loaded.failures.len(),
                    "some remotes were skipped, see errors above"
                );
            }
            info!(
                path = %path.display(),
                remotes = loaded.remotes.len(),
                "configuration loaded"
            );
            dispatcher.reload(loaded.remotes);
            true
        }
        Err(e) => {
            error!(
                path = %path.display(),
                error = %e,
                "failed to load configuration, keeping previous remotes"
            );
            false
        }
    }
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;
