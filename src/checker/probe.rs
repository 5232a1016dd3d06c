// src/checker/probe.rs
// =============================================================================
// Checks whether one URL is alive.
//
// How it works:
// 1. Normalize the URL (add https:// if there is no scheme)
// 2. Try each strategy in order:
//      HEAD                     (cheap, no body)
//      GET with Range: bytes=0-0 (for servers that mishandle HEAD)
// 3. A strategy's answer is final unless its status is in that strategy's
//    `retry_on` set, or the request failed at the transport level
// 4. Turn the final answer (or failure) into a Verdict
//
// This is a method-selection policy, not a retry policy: each strategy runs
// at most once.
// =============================================================================

use super::classify::{FailureKind, TransportFailure};
use super::http::{ProbeMethod, ProbeRequest, Transport};
use super::normalize::normalize;
use super::verdict::{HttpOutcome, Verdict};
use tracing::trace;

/// Statuses for which a HEAD answer is not trusted
pub const HEAD_UNRELIABLE: &[u16] = &[400, 401, 403, 404, 405, 500, 501, 502, 503, 504];

/// One attempt in the fallback chain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Strategy {
    pub method: ProbeMethod,
    pub range: Option<&'static str>,
    /// Statuses that move on to the next strategy instead of being final
    pub retry_on: &'static [u16],
}

impl Strategy {
    fn trusts(&self, status: u16) -> bool {
        !self.retry_on.contains(&status)
    }

    fn request<'a>(&self, url: &'a str) -> ProbeRequest<'a> {
        ProbeRequest {
            method: self.method,
            url,
            range: self.range,
        }
    }
}

/// HEAD first, then a one-byte GET that is always final
pub const DEFAULT_STRATEGIES: &[Strategy] = &[
    Strategy {
        method: ProbeMethod::Head,
        range: None,
        retry_on: HEAD_UNRELIABLE,
    },
    Strategy {
        method: ProbeMethod::Get,
        range: Some("bytes=0-0"),
        retry_on: &[],
    },
];

/// Runs the strategy table against a transport
pub struct Prober<T> {
    transport: T,
    strategies: &'static [Strategy],
}

impl<T: Transport> Prober<T> {
    pub fn new(transport: T) -> Self {
        Self::with_strategies(transport, DEFAULT_STRATEGIES)
    }

    pub fn with_strategies(transport: T, strategies: &'static [Strategy]) -> Self {
        Self {
            transport,
            strategies,
        }
    }

    // Produces a verdict for a raw link. Never fails: transport problems
    // become failing verdicts with a classified reason.
    pub async fn probe(&self, raw: &str) -> Verdict {
        let url = normalize(raw);
        if url.is_empty() {
            return Verdict::empty_url();
        }

        match self.fetch(&url).await {
            Ok(outcome) => Verdict::from_outcome(outcome),
            Err(failure) => Verdict::from_failure(&failure),
        }
    }

    // Walks the strategy table. The last strategy's result is returned as is,
    // whether it is a response or a failure.
    pub async fn fetch(&self, url: &str) -> Result<HttpOutcome, TransportFailure> {
        let Some((last, fallbacks)) = self.strategies.split_last() else {
            return Err(TransportFailure::new(
                FailureKind::Other("probe"),
                "no strategies configured",
            ));
        };

        for strategy in fallbacks {
            match self.transport.send(&strategy.request(url)).await {
                Ok(outcome) if strategy.trusts(outcome.status) => return Ok(outcome),
                Ok(outcome) => {
                    trace!(url, method = ?strategy.method, status = outcome.status, "untrusted status, falling back");
                }
                Err(failure) => {
                    trace!(url, method = ?strategy.method, %failure, "transport failure, falling back");
                }
            }
        }

        self.transport.send(&last.request(url)).await
    }
}
