// Copyright 2026 API Hunter Contributors
// SPDX-License-Identifier: MIT

//! Error types for every layer of a capture run.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::types::CaptureResult;

/// Failure reported by a [`BrowserDriver`](crate::driver::BrowserDriver).
#[derive(Error, Debug)]
pub enum DriverError {
    #[error("browser launch failed: {0}")]
    Launch(String),

    #[error("navigation failed: {0}")]
    Navigation(String),

    #[error("browser protocol error: {0}")]
    Protocol(String),
}

/// A response failed in a way none of the rejection kinds describe.
#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("unclassified failure reading response from {url}: {reason}")]
    Fatal { url: String, reason: String },
}

/// Terminal failure of a capture session.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("browser launch failed: {0}")]
    LaunchFailed(String),

    #[error("navigation to {url} timed out after {}s", .timeout.as_secs_f64())]
    NavigationTimedOut { url: String, timeout: Duration },

    #[error("navigation to {url} failed: {reason}")]
    NavigationFailed { url: String, reason: String },

    #[error("responses still in flight after {}s drain window", .timeout.as_secs_f64())]
    DrainTimedOut { timeout: Duration },

    #[error(transparent)]
    Fatal(#[from] CaptureError),
}

/// A failed session together with whatever it captured before failing.
#[derive(Error, Debug)]
#[error("{error}")]
pub struct SessionFailure {
    #[source]
    pub error: SessionError,
    pub partial: CaptureResult,
}

impl SessionFailure {
    pub fn new(error: SessionError, partial: CaptureResult) -> Self {
        Self { error, partial }
    }
}

/// Failure while writing output artifacts.
#[derive(Error, Debug)]
pub enum PersistError {
    #[error("failed to write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize responses: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Invalid user-supplied configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid file name {0:?}: use 1-40 letters, digits or underscores")]
    InvalidIdentifier(String),
}
