// Copyright 2026 API Hunter Contributors
// SPDX-License-Identifier: MIT

//! Browser driver abstraction.
//!
//! Defines the `BrowserDriver` and `DriverSession` traits the capture session
//! is written against. The real implementation drives Chromium through
//! chromiumoxide; tests substitute a scripted driver.

pub mod chromium;
pub(crate) mod pending;

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::error::DriverError;
use crate::types::ResponseEvent;

/// Channel end the driver pushes observed responses into.
///
/// The session owns the receiving half. The driver drops its sender once it
/// has stopped observing and every in-flight body has been delivered.
pub type ResponseSink = mpsc::UnboundedSender<ResponseEvent>;

/// Something that can start a browser.
///
/// Launch, navigation and drain bounds are enforced by the caller; a driver
/// does not need its own timeouts.
#[async_trait]
pub trait BrowserDriver: Send + Sync {
    /// Start a browser with a single blank page.
    async fn launch(&self) -> Result<Box<dyn DriverSession>, DriverError>;
}

/// A running browser with one page.
#[async_trait]
pub trait DriverSession: Send {
    /// Start delivering every response the page receives to `sink`, tagged
    /// with a sequence number in arrival order.
    async fn on_response(&mut self, sink: ResponseSink) -> Result<(), DriverError>;

    /// Load `url` and return once the page's load event has fired.
    async fn navigate(&mut self, url: &str) -> Result<(), DriverError>;

    /// Stop observing new responses. Bodies already in flight are still
    /// delivered, after which the sink is dropped.
    async fn quiesce(&mut self);

    /// Release the browser. Safe to call more than once.
    async fn close(&mut self) -> Result<(), DriverError>;
}
