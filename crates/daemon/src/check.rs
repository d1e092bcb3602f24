// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Validate-only mode
//!
//! Builds every remote from the configuration and prints it. Never touches
//! the bus.

use rand::Rng;
use std::io::{self, Write};
use std::path::Path;
use timer_core::load_config;

/// Check the configuration at `path`, writing a report to `out`
///
/// Returns `Ok(true)` when the file parsed and every remote built.
pub fn check_config<R: Rng, W: Write>(
    path: &Path,
    verbose: bool,
    rng: &mut R,
    out: &mut W,
) -> io::Result<bool> {
    let loaded = match load_config(path, rng) {
        Ok(loaded) => loaded,
        Err(e) => {
            writeln!(out, "Parse failed!")?;
            writeln!(out, "{}", e)?;
            return Ok(false);
        }
    };

    if !loaded.failures.is_empty() {
        writeln!(out, "Parse failed!")?;
        for failure in &loaded.failures {
            writeln!(out, "{}", failure)?;
        }
        return Ok(false);
    }

    writeln!(
        out,
        "Configuration file parsed successfully: {}",
        path.display()
    )?;
    if verbose {
        let bus = &loaded.bus;
        writeln!(out, "Broker: {}:{}", bus.broker, bus.port)?;
        writeln!(out, "Reply topic: {}", bus.topic)?;
        if let Some(client_id) = &bus.client_id {
            writeln!(out, "Client id: {}", client_id)?;
        }
    }
    for remote in &loaded.remotes {
        writeln!(out)?;
        write!(out, "{}", remote.render())?;
    }
    Ok(true)
}

#[cfg(test)]
#[path = "check_tests.rs"]
mod tests;
