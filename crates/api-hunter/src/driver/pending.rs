// Copyright 2026 API Hunter Contributors
// SPDX-License-Identifier: MIT

//! Pairing of network response notifications with their completion.
//!
//! A response is numbered when it is announced (`responseReceived`) and is
//! ready once its body has finished or failed to load. The three
//! notifications come from separate event streams, so a completion can be
//! seen before its announcement; it is parked until the announcement
//! arrives.

use std::collections::HashMap;
use std::hash::Hash;

/// A response whose outcome is known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Settled<K> {
    /// The body finished loading and can be fetched with `id`.
    Finished { id: K, seq: u64, url: String },
    /// The load failed; no body will be available.
    Failed { seq: u64, url: String, reason: String },
}

#[derive(Debug)]
enum Completion {
    Finished,
    Failed(String),
}

/// Tracks announced responses until they settle.
#[derive(Debug)]
pub struct PendingResponses<K> {
    next_seq: u64,
    observing: bool,
    announced: HashMap<K, (u64, String)>,
    completed_early: HashMap<K, Completion>,
}

impl<K: Hash + Eq + Clone> Default for PendingResponses<K> {
    fn default() -> Self {
        Self {
            next_seq: 0,
            observing: true,
            announced: HashMap::new(),
            completed_early: HashMap::new(),
        }
    }
}

impl<K: Hash + Eq + Clone> PendingResponses<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_observing(&self) -> bool {
        self.observing
    }

    /// Number the response `id`. Ignored once stopped.
    pub fn on_received(&mut self, id: K, url: String) -> Option<Settled<K>> {
        if !self.observing {
            return None;
        }
        let seq = self.next_seq;
        self.next_seq += 1;

        match self.completed_early.remove(&id) {
            Some(Completion::Finished) => Some(Settled::Finished { id, seq, url }),
            Some(Completion::Failed(reason)) => Some(Settled::Failed { seq, url, reason }),
            None => {
                self.announced.insert(id, (seq, url));
                None
            }
        }
    }

    pub fn on_finished(&mut self, id: K) -> Option<Settled<K>> {
        match self.announced.remove(&id) {
            Some((seq, url)) => Some(Settled::Finished { id, seq, url }),
            None => {
                self.park(id, Completion::Finished);
                None
            }
        }
    }

    pub fn on_failed(&mut self, id: K, reason: String) -> Option<Settled<K>> {
        match self.announced.remove(&id) {
            Some((seq, url)) => Some(Settled::Failed { seq, url, reason }),
            None => {
                self.park(id, Completion::Failed(reason));
                None
            }
        }
    }

    /// Stop numbering new responses. Announced ones still settle.
    pub fn stop(&mut self) {
        self.observing = false;
        self.completed_early.clear();
    }

    /// Stopped with nothing left to settle.
    pub fn is_idle(&self) -> bool {
        !self.observing && self.announced.is_empty()
    }

    pub fn in_flight(&self) -> usize {
        self.announced.len()
    }

    fn park(&mut self, id: K, completion: Completion) {
        if self.observing {
            self.completed_early.insert(id, completion);
        }
    }
}
