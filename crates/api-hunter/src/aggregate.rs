// Copyright 2026 API Hunter Contributors
// SPDX-License-Identifier: MIT

//! Session-scoped accumulation of classification outcomes.

use crate::types::{CaptureResult, ErrorTally, Outcome, ResponseRecord};

/// Owns the capture state of one session.
///
/// Records are kept with the driver's emission sequence number and sorted on
/// [`finalize`](Self::finalize), so the result follows arrival order even when
/// outcomes are recorded out of order.
#[derive(Debug, Default)]
pub struct CaptureAggregator {
    records: Vec<(u64, ResponseRecord)>,
    tally: ErrorTally,
}

impl CaptureAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one outcome into the session state.
    pub fn record(&mut self, seq: u64, outcome: Outcome) {
        match outcome {
            Ok(record) => self.records.push((seq, record)),
            Err(kind) => self.tally.increment(kind),
        }
    }

    /// Number of JSON records captured so far.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn tally(&self) -> &ErrorTally {
        &self.tally
    }

    /// Consume the aggregator and produce the ordered result.
    pub fn finalize(mut self) -> CaptureResult {
        // Stable: equal sequence numbers keep recording order.
        self.records.sort_by_key(|(seq, _)| *seq);
        CaptureResult {
            records: self.records.into_iter().map(|(_, r)| r).collect(),
            tally: self.tally,
        }
    }
}
