// Copyright 2026 API Hunter Contributors
// SPDX-License-Identifier: MIT

//! Session configuration and the output file identifier.

use std::str::FromStr;
use std::sync::OnceLock;
use std::time::Duration;

use regex::Regex;

use crate::error::ConfigError;

/// Default bound on browser startup.
pub const DEFAULT_LAUNCH_TIMEOUT: Duration = Duration::from_secs(240);
/// Default bound on the main navigation.
pub const DEFAULT_NAVIGATION_TIMEOUT: Duration = Duration::from_secs(240);
/// Default wait after load for late asynchronous calls.
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_secs(8);
/// Default window for in-flight bodies after capture stops.
pub const DEFAULT_DRAIN_TIMEOUT: Duration = Duration::from_secs(10);

fn identifier_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[a-zA-Z0-9_]{1,40}$").expect("identifier regex is valid"))
}

/// Base name for the output artifacts: 1-40 ASCII letters, digits or `_`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identifier(String);

impl Identifier {
    pub fn parse(value: &str) -> Result<Self, ConfigError> {
        if identifier_pattern().is_match(value) {
            Ok(Self(value.to_string()))
        } else {
            Err(ConfigError::InvalidIdentifier(value.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `<id>_responses.json`
    pub fn responses_file(&self) -> String {
        format!("{}_responses.json", self.0)
    }

    /// `<id>_urls.txt`
    pub fn urls_file(&self) -> String {
        format!("{}_urls.txt", self.0)
    }
}

impl FromStr for Identifier {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Identifier {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Identifier> for String {
    fn from(id: Identifier) -> Self {
        id.0
    }
}

impl std::fmt::Display for Identifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Everything a capture session needs to run.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Address to load.
    pub target: String,
    pub launch_timeout: Duration,
    pub navigation_timeout: Duration,
    /// How long to keep listening after navigation returns.
    pub settle_delay: Duration,
    pub drain_timeout: Duration,
}

impl SessionConfig {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            launch_timeout: DEFAULT_LAUNCH_TIMEOUT,
            navigation_timeout: DEFAULT_NAVIGATION_TIMEOUT,
            settle_delay: DEFAULT_SETTLE_DELAY,
            drain_timeout: DEFAULT_DRAIN_TIMEOUT,
        }
    }

    pub fn with_launch_timeout(mut self, timeout: Duration) -> Self {
        self.launch_timeout = timeout;
        self
    }

    pub fn with_navigation_timeout(mut self, timeout: Duration) -> Self {
        self.navigation_timeout = timeout;
        self
    }

    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    pub fn with_drain_timeout(mut self, timeout: Duration) -> Self {
        self.drain_timeout = timeout;
        self
    }
}
