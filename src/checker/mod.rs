// src/checker/mod.rs
// =============================================================================
// This module contains all link checking logic.
//
// Submodules:
// - normalize: adds a default scheme to bare links
// - classify: transport failure kinds and their reason strings
// - verdict: the per-link result written into the document
// - http: the Transport trait and the reqwest-backed implementation
// - probe: HEAD, then ranged GET, for one URL
// - limiter: caps the number of probes in flight
// =============================================================================

mod classify;
mod http;
mod limiter;
mod normalize;
mod probe;
mod verdict;

pub use classify::{classify, FailureKind, TransportFailure};
pub use http::{HttpTransport, ProbeMethod, ProbeRequest, Transport};
pub use limiter::{Limiter, Permit};
pub use normalize::normalize;
pub use probe::{Prober, Strategy, DEFAULT_STRATEGIES, HEAD_UNRELIABLE};
pub use verdict::{HttpOutcome, Verdict};
