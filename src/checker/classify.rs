// src/checker/classify.rs
// =============================================================================
// Transport-level failures and the short reasons we report for them.
//
// A transport failure means "no HTTP status came back at all": the request
// timed out, the TCP connection failed, TLS negotiation failed, and so on.
// An HTTP 404 is NOT a transport failure (see verdict.rs).
//
// Rust concepts:
// - Enums with data: the Other variant carries the category name
// - impl Display: lets us format! a failure in log lines
// =============================================================================

use std::fmt;

/// What kind of transport failure happened
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The per-request deadline elapsed
    Timeout,
    /// DNS lookup or TCP connect failed
    Connect,
    /// TLS handshake or certificate validation failed
    Tls,
    /// The redirect chain was longer than the configured limit
    TooManyRedirects,
    /// The URL could not be parsed
    InvalidUrl,
    /// Anything else; the name is used in the reason string
    Other(&'static str),
}

impl FailureKind {
    pub fn name(&self) -> &'static str {
        match self {
            FailureKind::Timeout => "timeout",
            FailureKind::Connect => "connect",
            FailureKind::Tls => "tls",
            FailureKind::TooManyRedirects => "redirect",
            FailureKind::InvalidUrl => "invalid_url",
            FailureKind::Other(name) => *name,
        }
    }
}

/// A request that produced no HTTP response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportFailure {
    pub kind: FailureKind,
    /// Underlying cause as text; may be empty
    pub detail: String,
}

impl TransportFailure {
    pub fn new(kind: FailureKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
        }
    }
}

impl fmt::Display for TransportFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.detail.is_empty() {
            write!(f, "{}", self.kind.name())
        } else {
            write!(f, "{}: {}", self.kind.name(), self.detail)
        }
    }
}

// Maps a failure to the reason string stored in the verdict.
// Pure function: same failure in, same string out.
pub fn classify(failure: &TransportFailure) -> String {
    match failure.kind {
        FailureKind::Timeout => "timeout".to_string(),
        FailureKind::Connect => format!("connection error: {}", failure.detail),
        FailureKind::Tls => "ssl error".to_string(),
        FailureKind::TooManyRedirects => "too many redirects".to_string(),
        FailureKind::InvalidUrl => "invalid url".to_string(),
        FailureKind::Other(_) => failure.to_string(),
    }
}
