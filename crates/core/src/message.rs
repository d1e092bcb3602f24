// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Plain-text wire messages exchanged with remotes
//!
//! Outbound (topic = remote name):
//! - command: `<state> <token>`
//! - probe:   `Ping <token>`
//!
//! Inbound (controller topic), space-delimited, verbs case-sensitive:
//! - `<remote> ack <token> [...]`
//! - `<remote> pong [payload...]`
//! - `<remote> reset [payload...]`

use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MessageError {
    #[error("payload is not valid UTF-8")]
    NotUtf8(#[from] std::str::Utf8Error),
    #[error("too few fields in message: {0:?}")]
    TooFewFields(String),
}

/// A message published to a remote
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outbound {
    Command { state: String, token: String },
    Probe { token: String },
}

impl fmt::Display for Outbound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outbound::Command { state, token } => write!(f, "{} {}", state, token),
            Outbound::Probe { token } => write!(f, "Ping {}", token),
        }
    }
}

/// A message received from a remote
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inbound {
    Ack { remote: String, token: String },
    Pong { remote: String, payload: String },
    Reset { remote: String, payload: String },
    Unknown { remote: String, verb: String },
}

impl Inbound {
    pub fn remote(&self) -> &str {
        match self {
            Inbound::Ack { remote, .. }
            | Inbound::Pong { remote, .. }
            | Inbound::Reset { remote, .. }
            | Inbound::Unknown { remote, .. } => remote,
        }
    }

    /// Parse a raw bus payload
    pub fn parse(payload: &[u8]) -> Result<Self, MessageError> {
        let text = std::str::from_utf8(payload)?;
        let fields: Vec<&str> = text.split_whitespace().collect();
        let [remote, verb, rest @ ..] = fields.as_slice() else {
            return Err(MessageError::TooFewFields(text.to_string()));
        };
        let remote = remote.to_string();

        match *verb {
            "ack" => {
                let Some(token) = rest.first() else {
                    return Err(MessageError::TooFewFields(text.to_string()));
                };
                Ok(Inbound::Ack {
                    remote,
                    token: token.to_string(),
                })
            }
            "pong" => Ok(Inbound::Pong {
                remote,
                payload: rest.join(" "),
            }),
            "reset" => Ok(Inbound::Reset {
                remote,
                payload: rest.join(" "),
            }),
            other => Ok(Inbound::Unknown {
                remote,
                verb: other.to_string(),
            }),
        }
    }
}

#[cfg(test)]
#[path = "message_tests.rs"]
mod tests;
