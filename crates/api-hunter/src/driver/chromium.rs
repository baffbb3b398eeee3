// Copyright 2026 API Hunter Contributors
// SPDX-License-Identifier: MIT

//! Chromium-based driver using chromiumoxide.

use std::path::PathBuf;

use async_trait::async_trait;
use base64::Engine as _;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::network::{
    EnableParams, EventLoadingFailed, EventLoadingFinished, EventResponseReceived,
    GetResponseBodyParams, RequestId,
};
use chromiumoxide::error::CdpError;
use chromiumoxide::page::Page;
use futures::future::BoxFuture;
use futures::stream::FuturesUnordered;
use futures::{FutureExt, StreamExt};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::pending::{PendingResponses, Settled};
use super::{BrowserDriver, DriverSession, ResponseSink};
use crate::error::DriverError;
use crate::types::{ResponseEvent, TransportError};

/// Find the Chromium binary path.
pub fn find_chromium() -> Option<PathBuf> {
    for name in ["google-chrome", "google-chrome-stable", "chromium", "chromium-browser"] {
        if let Ok(path) = which::which(name) {
            return Some(path);
        }
    }

    if cfg!(target_os = "macos") {
        let common =
            PathBuf::from("/Applications/Google Chrome.app/Contents/MacOS/Google Chrome");
        if common.exists() {
            return Some(common);
        }
    }

    None
}

/// Launches headless Chromium instances.
#[derive(Debug, Clone, Default)]
pub struct ChromiumDriver {
    executable: Option<PathBuf>,
}

impl ChromiumDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a specific browser binary instead of searching `PATH`.
    pub fn with_executable(mut self, path: Option<PathBuf>) -> Self {
        self.executable = path;
        self
    }
}

#[async_trait]
impl BrowserDriver for ChromiumDriver {
    async fn launch(&self) -> Result<Box<dyn DriverSession>, DriverError> {
        let chrome_path = match &self.executable {
            Some(path) => path.clone(),
            None => find_chromium().ok_or_else(|| {
                DriverError::Launch("Chromium not found; pass --chrome <PATH>".into())
            })?,
        };
        info!("launching Chromium from {}", chrome_path.display());

        let config = BrowserConfig::builder()
            .chrome_executable(chrome_path)
            .arg("--headless=new")
            .arg("--disable-gpu")
            .arg("--no-sandbox")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-extensions")
            .build()
            .map_err(|e| DriverError::Launch(format!("failed to build browser config: {e}")))?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| DriverError::Launch(e.to_string()))?;

        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!("browser handler error (ignoring): {e}");
                }
            }
            debug!("browser handler task ended");
        });

        let page = match browser.new_page("about:blank").await {
            Ok(page) => page,
            Err(e) => {
                handler_task.abort();
                return Err(DriverError::Launch(format!("failed to create page: {e}")));
            }
        };

        Ok(Box::new(ChromiumSession {
            browser: Some(browser),
            handler_task: Some(handler_task),
            page,
            listener: None,
            stop: None,
        }))
    }
}

/// One Chromium instance with a single page.
pub struct ChromiumSession {
    browser: Option<Browser>,
    handler_task: Option<JoinHandle<()>>,
    page: Page,
    listener: Option<JoinHandle<()>>,
    stop: Option<oneshot::Sender<()>>,
}

#[async_trait]
impl DriverSession for ChromiumSession {
    async fn on_response(&mut self, sink: ResponseSink) -> Result<(), DriverError> {
        let protocol = |e: CdpError| DriverError::Protocol(e.to_string());

        self.page
            .execute(EnableParams::default())
            .await
            .map_err(protocol)?;
        let received = self
            .page
            .event_listener::<EventResponseReceived>()
            .await
            .map_err(protocol)?;
        let finished = self
            .page
            .event_listener::<EventLoadingFinished>()
            .await
            .map_err(protocol)?;
        let failed = self
            .page
            .event_listener::<EventLoadingFailed>()
            .await
            .map_err(protocol)?;

        let (stop_tx, stop_rx) = oneshot::channel();
        let page = self.page.clone();
        self.listener = Some(tokio::spawn(async move {
            let mut received = received;
            let mut finished = finished;
            let mut failed = failed;
            let mut stop_rx = stop_rx;

            let mut pending = PendingResponses::new();
            let mut fetches: FuturesUnordered<BoxFuture<'static, ResponseEvent>> =
                FuturesUnordered::new();

            // Every CDP event is pushed to all listeners before the next one is
            // handled, so polling announcements first sees a response's
            // `responseReceived` no later than its completion.
            loop {
                let delivered = tokio::select! {
                    biased;
                    Some(event) = received.next(), if pending.is_observing() => {
                        let url = event.response.url.clone();
                        settle(pending.on_received(event.request_id.clone(), url), &page, &mut fetches, &sink)
                    }
                    _ = &mut stop_rx, if pending.is_observing() => {
                        let mut delivered = true;
                        while let Some(Some(event)) = received.next().now_or_never() {
                            let url = event.response.url.clone();
                            let settled = pending.on_received(event.request_id.clone(), url);
                            delivered &= settle(settled, &page, &mut fetches, &sink);
                        }
                        pending.stop();
                        debug!(in_flight = pending.in_flight(), "response capture stopped");
                        delivered
                    }
                    Some(event) = finished.next() => {
                        settle(pending.on_finished(event.request_id.clone()), &page, &mut fetches, &sink)
                    }
                    Some(event) = failed.next() => {
                        let settled = pending.on_failed(event.request_id.clone(), event.error_text.clone());
                        settle(settled, &page, &mut fetches, &sink)
                    }
                    Some(event) = fetches.next(), if !fetches.is_empty() => {
                        sink.send(event).is_ok()
                    }
                    else => break,
                };

                if !delivered || (pending.is_idle() && fetches.is_empty()) {
                    break;
                }
            }
            debug!("response listener ended");
        }));
        self.stop = Some(stop_tx);

        Ok(())
    }

    async fn navigate(&mut self, url: &str) -> Result<(), DriverError> {
        info!("navigating to {url}");
        self.page
            .goto(url)
            .await
            .map_err(|e| DriverError::Navigation(e.to_string()))?;
        Ok(())
    }

    async fn quiesce(&mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
    }

    async fn close(&mut self) -> Result<(), DriverError> {
        self.stop = None;
        if let Some(listener) = self.listener.take() {
            listener.abort();
        }

        let Some(mut browser) = self.browser.take() else {
            return Ok(());
        };
        let closed = browser.close().await;
        if let Err(e) = browser.wait().await {
            warn!("failed waiting for browser exit: {e}");
        }
        if let Some(handler) = self.handler_task.take() {
            handler.abort();
        }
        closed.map_err(|e| DriverError::Protocol(format!("error closing browser: {e}")))?;
        info!("browser closed");
        Ok(())
    }
}

/// Hand a settled response on: failed loads go straight to the sink, finished
/// ones queue a body fetch. Returns false once the sink is closed.
fn settle(
    settled: Option<Settled<RequestId>>,
    page: &Page,
    fetches: &mut FuturesUnordered<BoxFuture<'static, ResponseEvent>>,
    sink: &ResponseSink,
) -> bool {
    match settled {
        None => true,
        Some(Settled::Failed { seq, url, reason }) => {
            let error = TransportError::BodyUnavailable(reason);
            sink.send(ResponseEvent::with_error(seq, url, error)).is_ok()
        }
        Some(Settled::Finished { id, seq, url }) => {
            let page = page.clone();
            fetches.push(
                async move {
                    let body = fetch_body(&page, id).await;
                    ResponseEvent { seq, url, body }
                }
                .boxed(),
            );
            true
        }
    }
}

/// Read a response body through `Network.getResponseBody`.
///
/// A protocol-level refusal (resource evicted, no body for this request) is
/// an unavailable body; anything else from the connection is unexpected.
async fn fetch_body(page: &Page, request_id: RequestId) -> Result<Vec<u8>, TransportError> {
    match page.execute(GetResponseBodyParams::new(request_id)).await {
        Ok(response) => {
            let body = &response.result;
            if body.base64_encoded {
                base64::engine::general_purpose::STANDARD
                    .decode(&body.body)
                    .map_err(|e| TransportError::Internal(format!("malformed base64 body: {e}")))
            } else {
                Ok(body.body.clone().into_bytes())
            }
        }
        Err(CdpError::Chrome(e)) => Err(TransportError::BodyUnavailable(e.message)),
        Err(e) => Err(TransportError::Internal(e.to_string())),
    }
}
