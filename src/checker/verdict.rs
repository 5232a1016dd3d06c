// src/checker/verdict.rs
// =============================================================================
// The result of checking one link.
//
// A Verdict is what ends up in the document under `status`:
//
//   status:
//     ok: true
//     code: 200
//     reason: OK
//     final_url: https://example.com/ok
//
// Rust concepts:
// - Option<T>: code and final_url are absent on transport failures
// - #[derive(Serialize)]: the struct is written straight into the document
// =============================================================================

use super::classify::{classify, TransportFailure};
use serde::Serialize;

/// What the server answered (after following redirects)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpOutcome {
    pub status: u16,
    /// Reason phrase; empty when the status code has none
    pub reason: String,
    pub final_url: String,
}

/// Reachability verdict for one link
///
/// `ok` is true exactly when `code` is present and in `200..400`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Verdict {
    pub ok: bool,
    pub code: Option<u16>,
    pub reason: String,
    pub final_url: Option<String>,
}

impl Verdict {
    /// Builds a verdict from an HTTP response, whatever its status
    pub fn from_outcome(outcome: HttpOutcome) -> Self {
        let ok = is_success(outcome.status);
        let reason = if !outcome.reason.is_empty() {
            outcome.reason
        } else if ok {
            "OK".to_string()
        } else {
            "HTTP error".to_string()
        };

        Verdict {
            ok,
            code: Some(outcome.status),
            reason,
            final_url: Some(outcome.final_url),
        }
    }

    pub fn from_failure(failure: &TransportFailure) -> Self {
        Verdict {
            ok: false,
            code: None,
            reason: classify(failure),
            final_url: None,
        }
    }

    /// The link field was missing, empty, or not a string
    pub fn empty_url() -> Self {
        Verdict {
            ok: false,
            code: None,
            reason: "empty url".to_string(),
            final_url: None,
        }
    }
}

// 2xx and 3xx both count as reachable
fn is_success(status: u16) -> bool {
    (200..400).contains(&status)
}
