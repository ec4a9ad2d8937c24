//! Typed domain error enum.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! `JiffyError` converts to `anyhow::Error` via the `?` operator; callers that
//! need the variant use `err.downcast_ref::<JiffyError>()`.

use std::time::Duration;

use thiserror::Error;

use crate::domain::jiffybox::BoxId;

/// Every fatal condition the CLI can report.
#[derive(Debug, Error)]
pub enum JiffyError {
    /// A required value is missing or invalid. Raised before any network call.
    #[error("{0}")]
    Configuration(String),

    #[error("JiffyBox {0} is protected. Aborting")]
    ProtectedResource(BoxId),

    /// Connection, TLS or body-read failure talking to the API.
    #[error("cannot reach the JiffyBox API: {0}")]
    Transport(String),

    #[error("JiffyBox API answered HTTP {status}: {body}")]
    Api { status: u16, body: String },

    /// The reply did not have the expected shape or carried a fatal advisory.
    #[error("unexpected API response: {0}")]
    UnexpectedResponse(String),

    #[error("JiffyBox {id} reports unexpected status '{status}'")]
    UnknownStatus { id: BoxId, status: String },

    /// A file transfer or remote command exited non-zero.
    #[error("{step} failed on {address}: {detail}")]
    RemoteExecution {
        step: String,
        address: String,
        detail: String,
    },

    #[error("gave up waiting for JiffyBox {id} after {polls} polls ({}s)", elapsed.as_secs())]
    Timeout {
        id: BoxId,
        polls: u32,
        elapsed: Duration,
    },
}

impl JiffyError {
    /// Stable machine-readable name used by the JSON error object.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "configuration",
            Self::ProtectedResource(_) => "protected-resource",
            Self::Transport(_) => "transport",
            Self::Api { .. } => "api",
            Self::UnexpectedResponse(_) => "unexpected-response",
            Self::UnknownStatus { .. } => "unknown-status",
            Self::RemoteExecution { .. } => "remote-execution",
            Self::Timeout { .. } => "timeout",
        }
    }
}
