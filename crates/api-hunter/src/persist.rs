// Copyright 2026 API Hunter Contributors
// SPDX-License-Identifier: MIT

//! Writing the capture artifacts to disk.
//!
//! Two files are produced, positionally aligned:
//! `<id>_responses.json` holds the records as a JSON array and `<id>_urls.txt`
//! holds one URL per line in the same order. Nothing is written when the
//! session found no JSON responses. Writes are plain, not atomic.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::info;

use crate::config::Identifier;
use crate::error::PersistError;
use crate::types::CaptureResult;

/// What [`persist`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistOutcome {
    /// The page produced no responses at all.
    NothingObserved,
    /// Responses were observed but none of them was JSON.
    NoEndpoints { rejected: u64 },
    /// Both artifacts were written.
    Written {
        responses: PathBuf,
        urls: PathBuf,
        count: usize,
    },
}

/// Write the artifacts for `result` into `dir`, named after `name`.
pub fn persist(
    result: &CaptureResult,
    name: &Identifier,
    dir: &Path,
) -> Result<PersistOutcome, PersistError> {
    if result.records.is_empty() {
        let rejected = result.tally.total();
        return Ok(if rejected == 0 {
            PersistOutcome::NothingObserved
        } else {
            PersistOutcome::NoEndpoints { rejected }
        });
    }

    let responses = dir.join(name.responses_file());
    write_responses(result, &responses)?;

    let urls = dir.join(name.urls_file());
    let listing = result.urls().collect::<Vec<_>>().join("\n");
    std::fs::write(&urls, listing).map_err(|source| PersistError::Io {
        path: urls.clone(),
        source,
    })?;

    info!(
        count = result.records.len(),
        "wrote {} and {}",
        responses.display(),
        urls.display()
    );

    Ok(PersistOutcome::Written {
        responses,
        urls,
        count: result.records.len(),
    })
}

fn write_responses(result: &CaptureResult, path: &Path) -> Result<(), PersistError> {
    let io_err = |source| PersistError::Io {
        path: path.to_path_buf(),
        source,
    };
    let file = File::create(path).map_err(io_err)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer(&mut writer, &result.records)?;
    writer.flush().map_err(io_err)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ErrorKind, ResponseRecord};
    use serde_json::json;

    fn id(name: &str) -> Identifier {
        Identifier::parse(name).unwrap()
    }

    fn record(url: &str, payload: serde_json::Value) -> ResponseRecord {
        ResponseRecord {
            url: url.to_string(),
            payload,
        }
    }

    #[test]
    fn test_nothing_observed_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let outcome = persist(&CaptureResult::default(), &id("empty"), dir.path()).unwrap();

        assert_eq!(outcome, PersistOutcome::NothingObserved);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_only_errors_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let mut result = CaptureResult::default();
        result.tally.increment(ErrorKind::NotJson);
        result.tally.increment(ErrorKind::ClientError);

        let outcome = persist(&result, &id("errs"), dir.path()).unwrap();

        assert_eq!(outcome, PersistOutcome::NoEndpoints { rejected: 2 });
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_artifacts_are_aligned() {
        let dir = tempfile::tempdir().unwrap();
        let result = CaptureResult {
            records: vec![
                record("https://x.test/a", json!({"x": 1})),
                record("https://x.test/b", json!([1, 2])),
                record("https://x.test/a", json!({"x": 2})),
            ],
            ..Default::default()
        };

        let outcome = persist(&result, &id("site"), dir.path()).unwrap();
        let PersistOutcome::Written {
            responses,
            urls,
            count,
        } = outcome
        else {
            panic!("expected files to be written");
        };
        assert_eq!(count, 3);
        assert_eq!(responses, dir.path().join("site_responses.json"));
        assert_eq!(urls, dir.path().join("site_urls.txt"));

        let listing = std::fs::read_to_string(&urls).unwrap();
        assert_eq!(
            listing,
            "https://x.test/a\nhttps://x.test/b\nhttps://x.test/a"
        );

        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&responses).unwrap()).unwrap();
        let array = written.as_array().unwrap();
        assert_eq!(array.len(), listing.lines().count());
        for (entry, line) in array.iter().zip(listing.lines()) {
            assert_eq!(entry["url"], line);
        }
        assert_eq!(array[2]["json_response"], json!({"x": 2}));
    }

    #[test]
    fn test_missing_directory_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("does/not/exist");
        let result = CaptureResult {
            records: vec![record("/a", json!(1))],
            ..Default::default()
        };

        let err = persist(&result, &id("x"), &missing).unwrap_err();
        assert!(matches!(err, PersistError::Io { .. }));
    }
}
