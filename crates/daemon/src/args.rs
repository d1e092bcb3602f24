// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Command-line arguments

use clap::Parser;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(
    name = "timerd",
    version,
    about = "Drive remote devices to their weekly scheduled state over MQTT"
)]
pub struct Args {
    /// Configuration file
    #[arg(short, long, default_value = "config.yaml")]
    pub config: PathBuf,

    /// Check the configuration and print the schedules, then exit
    #[arg(short, long)]
    pub syntax: bool,

    /// With --syntax, also print the broker settings
    #[arg(short, long)]
    pub verbose: bool,

    /// Directory for log files [default: the configuration file's directory]
    #[arg(long)]
    pub log_dir: Option<PathBuf>,

    /// PID file, locked while the daemon runs
    #[arg(long, default_value = "timerd.pid")]
    pub pid_file: PathBuf,
}

impl Args {
    /// Resolved log directory
    pub fn log_dir(&self) -> PathBuf {
        if let Some(dir) = &self.log_dir {
            return dir.clone();
        }
        match self.config.parent() {
            Some(parent) if parent != Path::new("") => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }
}

#[cfg(test)]
#[path = "args_tests.rs"]
mod tests;
