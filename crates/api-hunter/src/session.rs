// Copyright 2026 API Hunter Contributors
// SPDX-License-Identifier: MIT

//! Capture session orchestration.
//!
//! A session moves through `Launching -> Navigating -> Settling -> Draining ->
//! Closed`. Responses are consumed from the driver's channel during every
//! phase after launch, classified, and folded into a [`CaptureAggregator`]
//! owned by the session. The browser is closed on every exit path once it
//! has been launched, and a failed session still hands back what it captured.
//! Launch, navigation and drain are each bounded; overrunning any of them
//! ends the session as a failure.

use tokio::sync::mpsc;
use tokio::time::{sleep, timeout};
use tracing::{debug, info, warn};

use crate::aggregate::CaptureAggregator;
use crate::classify::classify;
use crate::config::SessionConfig;
use crate::driver::{BrowserDriver, DriverSession};
use crate::error::{SessionError, SessionFailure};
use crate::types::{CaptureResult, ResponseEvent};

/// Run one capture session against `config.target`.
pub async fn run_session(
    driver: &dyn BrowserDriver,
    config: &SessionConfig,
) -> Result<CaptureResult, SessionFailure> {
    info!(target = %config.target, "launching browser");
    let mut session = match timeout(config.launch_timeout, driver.launch()).await {
        Ok(Ok(session)) => session,
        Ok(Err(e)) => {
            return Err(SessionFailure::new(
                SessionError::LaunchFailed(e.to_string()),
                CaptureResult::default(),
            ))
        }
        Err(_) => {
            return Err(SessionFailure::new(
                SessionError::LaunchFailed(format!(
                    "timed out after {}s",
                    config.launch_timeout.as_secs_f64()
                )),
                CaptureResult::default(),
            ))
        }
    };

    let mut aggregator = CaptureAggregator::new();
    let outcome = capture(session.as_mut(), config, &mut aggregator).await;

    if let Err(e) = session.close().await {
        warn!("failed to close browser: {e}");
    }

    let result = aggregator.finalize();
    info!(
        records = result.records.len(),
        rejected = result.tally.total(),
        "capture session closed"
    );

    match outcome {
        Ok(()) => Ok(result),
        Err(error) => Err(SessionFailure::new(error, result)),
    }
}

async fn capture(
    session: &mut dyn DriverSession,
    config: &SessionConfig,
    aggregator: &mut CaptureAggregator,
) -> Result<(), SessionError> {
    let (sink, mut events) = mpsc::unbounded_channel();
    session
        .on_response(sink)
        .await
        .map_err(|e| SessionError::LaunchFailed(e.to_string()))?;

    info!(target = %config.target, "navigating");
    let navigated = {
        let navigation = timeout(config.navigation_timeout, session.navigate(&config.target));
        tokio::pin!(navigation);
        loop {
            tokio::select! {
                biased;
                Some(event) = events.recv() => ingest(aggregator, event)?,
                result = &mut navigation => break result,
            }
        }
    };

    let failure = match navigated {
        Ok(Ok(())) => None,
        Ok(Err(e)) => Some(SessionError::NavigationFailed {
            url: config.target.clone(),
            reason: e.to_string(),
        }),
        Err(_) => Some(SessionError::NavigationTimedOut {
            url: config.target.clone(),
            timeout: config.navigation_timeout,
        }),
    };
    if let Some(error) = failure {
        absorb_queued(&mut events, aggregator);
        return Err(error);
    }

    debug!(
        "navigation finished, settling for {}s",
        config.settle_delay.as_secs_f64()
    );
    let settle = sleep(config.settle_delay);
    tokio::pin!(settle);
    loop {
        tokio::select! {
            biased;
            Some(event) = events.recv() => ingest(aggregator, event)?,
            () = &mut settle => break,
        }
    }

    debug!("draining in-flight responses");
    session.quiesce().await;
    let drained = timeout(config.drain_timeout, async {
        while let Some(event) = events.recv().await {
            ingest(aggregator, event)?;
        }
        Ok::<(), SessionError>(())
    })
    .await;
    match drained {
        Ok(result) => result,
        Err(_) => {
            warn!(
                "drain window of {}s exceeded; dropping in-flight responses",
                config.drain_timeout.as_secs_f64()
            );
            Err(SessionError::DrainTimedOut {
                timeout: config.drain_timeout,
            })
        }
    }
}

fn ingest(aggregator: &mut CaptureAggregator, event: ResponseEvent) -> Result<(), SessionError> {
    let seq = event.seq;
    let outcome = classify(event)?;
    aggregator.record(seq, outcome);
    Ok(())
}

/// Fold whatever is already queued without waiting for more.
fn absorb_queued(
    events: &mut mpsc::UnboundedReceiver<ResponseEvent>,
    aggregator: &mut CaptureAggregator,
) {
    while let Ok(event) = events.try_recv() {
        if let Err(e) = ingest(aggregator, event) {
            warn!("discarding queued responses after failure: {e}");
            break;
        }
    }
}
