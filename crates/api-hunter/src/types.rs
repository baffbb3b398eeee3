// Copyright 2026 API Hunter Contributors
// SPDX-License-Identifier: MIT

//! Core data types flowing through a capture session.

use serde::Serialize;

/// One network response observed by the browser driver.
///
/// `seq` is assigned by the driver when the response is first seen, so it
/// reflects arrival order even when bodies finish loading out of order.
#[derive(Debug, Clone)]
pub struct ResponseEvent {
    pub seq: u64,
    pub url: String,
    pub body: Result<Vec<u8>, TransportError>,
}

impl ResponseEvent {
    /// Event whose body was read successfully.
    pub fn with_body(seq: u64, url: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        Self {
            seq,
            url: url.into(),
            body: Ok(body.into()),
        }
    }

    /// Event whose body the transport could not supply.
    pub fn with_error(seq: u64, url: impl Into<String>, error: TransportError) -> Self {
        Self {
            seq,
            url: url.into(),
            body: Err(error),
        }
    }
}

/// Why the transport failed to hand over a response body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The body no longer exists or never did: evicted from the browser
    /// cache, load aborted, redirect without content.
    BodyUnavailable(String),
    /// Anything the transport was not expected to report, such as the
    /// browser connection going away mid-read.
    Internal(String),
}

/// A response that decoded as JSON: one hidden endpoint call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponseRecord {
    pub url: String,
    #[serde(rename = "json_response")]
    pub payload: serde_json::Value,
}

/// Why a response was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Body is text but not valid JSON.
    NotJson,
    /// Body bytes are not valid UTF-8.
    DecodeError,
    /// The transport could not produce a body.
    ClientError,
}

impl ErrorKind {
    pub const ALL: [ErrorKind; 3] = [Self::NotJson, Self::DecodeError, Self::ClientError];

    pub fn label(&self) -> &'static str {
        match self {
            Self::NotJson => "not_a_json",
            Self::DecodeError => "unicode_error",
            Self::ClientError => "client_error",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Result of classifying a single response.
pub type Outcome = Result<ResponseRecord, ErrorKind>;

/// Per-kind count of rejected responses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ErrorTally {
    pub not_a_json: u64,
    pub unicode_error: u64,
    pub client_error: u64,
}

impl ErrorTally {
    pub fn get(&self, kind: ErrorKind) -> u64 {
        match kind {
            ErrorKind::NotJson => self.not_a_json,
            ErrorKind::DecodeError => self.unicode_error,
            ErrorKind::ClientError => self.client_error,
        }
    }

    pub fn increment(&mut self, kind: ErrorKind) {
        let slot = match kind {
            ErrorKind::NotJson => &mut self.not_a_json,
            ErrorKind::DecodeError => &mut self.unicode_error,
            ErrorKind::ClientError => &mut self.client_error,
        };
        *slot += 1;
    }

    /// Sum over all kinds.
    pub fn total(&self) -> u64 {
        self.not_a_json + self.unicode_error + self.client_error
    }

    /// Counts in display order.
    pub fn iter(&self) -> impl Iterator<Item = (ErrorKind, u64)> + '_ {
        ErrorKind::ALL.into_iter().map(|kind| (kind, self.get(kind)))
    }
}

/// Final output of a capture session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CaptureResult {
    pub records: Vec<ResponseRecord>,
    pub tally: ErrorTally,
}

impl CaptureResult {
    /// Number of responses that reached classification.
    pub fn observed(&self) -> u64 {
        self.records.len() as u64 + self.tally.total()
    }

    /// True when no JSON endpoint was found.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// URLs of all records, in order, duplicates included.
    pub fn urls(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(|r| r.url.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tally_starts_at_zero() {
        let tally = ErrorTally::default();
        for kind in ErrorKind::ALL {
            assert_eq!(tally.get(kind), 0);
        }
        assert_eq!(tally.total(), 0);
    }

    #[test]
    fn test_tally_increment_is_per_kind() {
        let mut tally = ErrorTally::default();
        tally.increment(ErrorKind::NotJson);
        tally.increment(ErrorKind::NotJson);
        tally.increment(ErrorKind::ClientError);

        assert_eq!(tally.get(ErrorKind::NotJson), 2);
        assert_eq!(tally.get(ErrorKind::DecodeError), 0);
        assert_eq!(tally.get(ErrorKind::ClientError), 1);
        assert_eq!(tally.total(), 3);

        let order: Vec<ErrorKind> = tally.iter().map(|(k, _)| k).collect();
        assert_eq!(order, ErrorKind::ALL.to_vec());
    }

    #[test]
    fn test_record_serializes_with_json_response_key() {
        let record = ResponseRecord {
            url: "https://example.com/api".to_string(),
            payload: serde_json::json!({"x": 1}),
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"url": "https://example.com/api", "json_response": {"x": 1}})
        );
    }

    #[test]
    fn test_error_kind_labels() {
        assert_eq!(ErrorKind::NotJson.to_string(), "not_a_json");
        assert_eq!(ErrorKind::DecodeError.to_string(), "unicode_error");
        assert_eq!(ErrorKind::ClientError.to_string(), "client_error");
    }

    #[test]
    fn test_observed_counts_records_and_rejections() {
        let mut result = CaptureResult::default();
        assert_eq!(result.observed(), 0);
        assert!(result.is_empty());

        result.records.push(ResponseRecord {
            url: "/a".into(),
            payload: serde_json::Value::Null,
        });
        result.tally.increment(ErrorKind::DecodeError);
        assert_eq!(result.observed(), 2);
        assert!(!result.is_empty());
        assert_eq!(result.urls().collect::<Vec<_>>(), vec!["/a"]);
    }
}
