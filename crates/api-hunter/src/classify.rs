// Copyright 2026 API Hunter Contributors
// SPDX-License-Identifier: MIT

//! Response classification: JSON endpoint or one of three rejection kinds.

use tracing::debug;

use crate::error::CaptureError;
use crate::types::{ErrorKind, Outcome, ResponseEvent, ResponseRecord, TransportError};

/// Classify one observed response.
///
/// Returns `Ok(Ok(record))` for a JSON body, `Ok(Err(kind))` for a rejected
/// body, and `Err(CaptureError::Fatal)` when the transport reported something
/// outside the recognized kinds. The body is decoded as UTF-8 first, then
/// parsed as JSON; a leading byte-order mark is ignored.
pub fn classify(event: ResponseEvent) -> Result<Outcome, CaptureError> {
    let ResponseEvent { seq, url, body } = event;

    let bytes = match body {
        Ok(bytes) => bytes,
        Err(TransportError::BodyUnavailable(reason)) => {
            debug!(seq, %url, %reason, "response body unavailable");
            return Ok(Err(ErrorKind::ClientError));
        }
        Err(TransportError::Internal(reason)) => {
            return Err(CaptureError::Fatal { url, reason });
        }
    };

    let text = match std::str::from_utf8(&bytes) {
        Ok(text) => text,
        Err(e) => {
            debug!(seq, %url, "response body is not utf-8: {e}");
            return Ok(Err(ErrorKind::DecodeError));
        }
    };
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    match serde_json::from_str(text) {
        Ok(payload) => {
            debug!(seq, %url, "json response captured");
            Ok(Ok(ResponseRecord { url, payload }))
        }
        Err(_) => Ok(Err(ErrorKind::NotJson)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn outcome(body: &[u8]) -> Outcome {
        classify(ResponseEvent::with_body(0, "/u", body.to_vec())).unwrap()
    }

    #[test]
    fn test_json_object_is_captured() {
        let record = outcome(br#"{"x":1}"#).unwrap();
        assert_eq!(record.url, "/u");
        assert_eq!(record.payload, json!({"x": 1}));
    }

    #[test]
    fn test_json_scalars_and_arrays_are_captured() {
        assert_eq!(outcome(b"[1,2,3]").unwrap().payload, json!([1, 2, 3]));
        assert_eq!(outcome(b"  42 ").unwrap().payload, json!(42));
        assert_eq!(outcome(b"null").unwrap().payload, json!(null));
        assert_eq!(outcome(br#""text""#).unwrap().payload, json!("text"));
    }

    #[test]
    fn test_html_is_not_json() {
        assert_eq!(outcome(b"<html>").unwrap_err(), ErrorKind::NotJson);
    }

    #[test]
    fn test_empty_body_is_not_json() {
        assert_eq!(outcome(b"").unwrap_err(), ErrorKind::NotJson);
    }

    #[test]
    fn test_truncated_json_is_not_json() {
        assert_eq!(outcome(br#"{"x": "#).unwrap_err(), ErrorKind::NotJson);
    }

    #[test]
    fn test_invalid_utf8_is_decode_error() {
        assert_eq!(outcome(&[0xff, 0xfe, 0x7b]).unwrap_err(), ErrorKind::DecodeError);
    }

    #[test]
    fn test_utf8_bom_is_ignored() {
        let mut body = "\u{feff}".as_bytes().to_vec();
        body.extend_from_slice(br#"{"ok":true}"#);
        assert_eq!(outcome(&body).unwrap().payload, json!({"ok": true}));
    }

    #[test]
    fn test_unavailable_body_is_client_error() {
        let event = ResponseEvent::with_error(
            3,
            "/gone",
            TransportError::BodyUnavailable("No resource with given identifier found".into()),
        );
        assert_eq!(classify(event).unwrap().unwrap_err(), ErrorKind::ClientError);
    }

    #[test]
    fn test_internal_transport_error_is_fatal() {
        let event = ResponseEvent::with_error(
            4,
            "/boom",
            TransportError::Internal("connection reset".into()),
        );
        match classify(event) {
            Err(CaptureError::Fatal { url, reason }) => {
                assert_eq!(url, "/boom");
                assert_eq!(reason, "connection reset");
            }
            other => panic!("expected fatal, got {other:?}"),
        }
    }
}
