// Copyright 2026 API Hunter Contributors
// SPDX-License-Identifier: MIT

//! API Hunter — capture engine for discovering the hidden JSON endpoints a
//! web page calls while it loads.
//!
//! A capture session drives a headless browser through the [`BrowserDriver`]
//! capability, classifies every observed network response as JSON or one of
//! three rejection kinds, and folds the outcomes into an ordered
//! [`CaptureResult`]. [`persist`] then writes the two output artifacts.

pub mod aggregate;
pub mod classify;
pub mod config;
pub mod driver;
pub mod error;
pub mod persist;
pub mod session;
pub mod types;

pub use aggregate::CaptureAggregator;
pub use classify::classify;
pub use config::{Identifier, SessionConfig};
pub use driver::chromium::{find_chromium, ChromiumDriver};
pub use driver::{BrowserDriver, DriverSession, ResponseSink};
pub use error::{
    CaptureError, ConfigError, DriverError, PersistError, SessionError, SessionFailure,
};
pub use persist::{persist, PersistOutcome};
pub use session::run_session;
pub use types::*;
