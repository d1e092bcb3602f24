// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Configuration loading
//!
//! The file is YAML with two blocks: `mqtt` (bus settings) and `remotes`
//! (one entry per remote). File-level problems fail the whole load; a
//! malformed remote only fails that remote and is reported alongside the
//! remotes that did build.

mod remotes;

pub use remotes::{build_remote, RemoteError};

use crate::remote::Remote;
use rand::Rng;
use serde::Deserialize;
use serde_yaml::Value;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_PORT: u16 = 1883;
pub const DEFAULT_TOPIC: &str = "timerd";

/// Errors that fail a whole configuration load
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("missing required field: {0}")]
    MissingField(String),
    #[error("invalid format: {0}")]
    InvalidFormat(String),
}

/// Message bus connection settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BusSettings {
    pub broker: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Topic the controller subscribes to for replies
    #[serde(default = "default_topic")]
    pub topic: String,
    #[serde(default)]
    pub client_id: Option<String>,
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_topic() -> String {
    DEFAULT_TOPIC.to_string()
}

/// Result of a configuration load
#[derive(Debug)]
pub struct LoadedConfig {
    pub bus: BusSettings,
    pub remotes: Vec<Remote>,
    /// Remotes that failed to build; excluded from `remotes`
    pub failures: Vec<RemoteError>,
}

/// Read and parse a configuration file
pub fn load_config<R: Rng>(path: &Path, rng: &mut R) -> Result<LoadedConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&content, rng)
}

/// Parse configuration from YAML content, rolling jitter with `rng`
pub fn parse_config<R: Rng>(content: &str, rng: &mut R) -> Result<LoadedConfig, ConfigError> {
    let raw: Value = serde_yaml::from_str(content)?;
    let root = raw
        .as_mapping()
        .ok_or_else(|| ConfigError::InvalidFormat("root must be a mapping".to_string()))?;

    let mqtt = root
        .get("mqtt")
        .ok_or_else(|| ConfigError::MissingField("mqtt".to_string()))?;
    if mqtt.get("broker").is_none() {
        return Err(ConfigError::MissingField("mqtt.broker".to_string()));
    }
    let bus: BusSettings = serde_yaml::from_value(mqtt.clone())
        .map_err(|e| ConfigError::InvalidFormat(format!("mqtt: {}", e)))?;

    let remotes_value = root
        .get("remotes")
        .ok_or_else(|| ConfigError::MissingField("remotes".to_string()))?;
    let table = remotes_value
        .as_mapping()
        .ok_or_else(|| ConfigError::InvalidFormat("remotes must be a mapping".to_string()))?;

    let mut remotes = Vec::new();
    let mut failures = Vec::new();
    for (key, value) in table {
        match build_remote(key, value, rng) {
            Ok(remote) => remotes.push(remote),
            Err(e) => {
                tracing::error!(error = %e, "unexpected structure in config file");
                failures.push(e);
            }
        }
    }

    Ok(LoadedConfig {
        bus,
        remotes,
        failures,
    })
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
