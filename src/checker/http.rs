// src/checker/http.rs
// =============================================================================
// Sends the actual HTTP requests.
//
// Key functionality:
// - The Transport trait: "send this request, tell me the status or why not"
// - HttpTransport: the real implementation on top of one shared reqwest Client
// - Turning reqwest errors into our TransportFailure categories
//
// Everything above this module (probe, orchestrator) only talks to the
// Transport trait, so tests can plug in a fake that never touches the network.
//
// Rust concepts:
// - Traits: an interface that several types can implement
// - async_trait: lets a trait have async methods
// - Error source chains: walking .source() to find the root cause
// =============================================================================

use super::classify::{FailureKind, TransportFailure};
use super::verdict::HttpOutcome;
use crate::config::CheckerConfig;
use crate::error::CheckError;
use async_trait::async_trait;
use hyper::ext::ReasonPhrase;
use reqwest::{header::RANGE, redirect::Policy, Client, Method};
use std::error::Error as StdError;
use std::sync::Arc;
use url::Url;

/// HTTP method used by one probe attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProbeMethod {
    Head,
    Get,
}

impl ProbeMethod {
    fn as_reqwest(self) -> Method {
        match self {
            ProbeMethod::Head => Method::HEAD,
            ProbeMethod::Get => Method::GET,
        }
    }
}

/// One request to send
#[derive(Debug, Clone, Copy)]
pub struct ProbeRequest<'a> {
    pub method: ProbeMethod,
    pub url: &'a str,
    /// Value for the Range header, if any
    pub range: Option<&'static str>,
}

// Anything that can send a ProbeRequest.
//
// Implementations must be shareable between many concurrent probes
// (Send + Sync), because one transport serves the whole batch.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Ok: the server answered with some status (any status).
    /// Err: no HTTP answer at all.
    async fn send(&self, request: &ProbeRequest<'_>) -> Result<HttpOutcome, TransportFailure>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for &T {
    async fn send(&self, request: &ProbeRequest<'_>) -> Result<HttpOutcome, TransportFailure> {
        (**self).send(request).await
    }
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn send(&self, request: &ProbeRequest<'_>) -> Result<HttpOutcome, TransportFailure> {
        (**self).send(request).await
    }
}

/// Transport backed by a single reqwest Client (one connection pool)
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    // Builds the shared client:
    // - total deadline per request
    // - fixed User-Agent header
    // - follow redirects up to a limit
    pub fn new(cfg: &CheckerConfig) -> Result<Self, CheckError> {
        let client = Client::builder()
            .timeout(cfg.timeout())
            .user_agent(cfg.user_agent.clone())
            .redirect(Policy::limited(cfg.max_redirects))
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: &ProbeRequest<'_>) -> Result<HttpOutcome, TransportFailure> {
        // Reject malformed URLs before reqwest ever sees them
        let url = Url::parse(request.url)
            .map_err(|e| TransportFailure::new(FailureKind::InvalidUrl, e.to_string()))?;

        let mut builder = self.client.request(request.method.as_reqwest(), url);
        if let Some(range) = request.range {
            builder = builder.header(RANGE, range);
        }

        // We never read the body: status and final URL are all we need.
        // Dropping the response closes (or recycles) the connection.
        let response = builder.send().await.map_err(categorize_error)?;

        Ok(HttpOutcome {
            status: response.status().as_u16(),
            reason: reason_phrase(&response),
            final_url: response.url().to_string(),
        })
    }
}

// The phrase from the status line. hyper only records it when it differs
// from the standard one, so fall back to the canonical phrase.
fn reason_phrase(response: &reqwest::Response) -> String {
    match response.extensions().get::<ReasonPhrase>() {
        Some(phrase) => String::from_utf8_lossy(phrase.as_bytes()).into_owned(),
        None => response
            .status()
            .canonical_reason()
            .unwrap_or("")
            .to_string(),
    }
}

// Categorizes reqwest errors into failure kinds
//
// Order matters: a connect timeout is both is_connect() and is_timeout(),
// and we want to report it as a timeout.
fn categorize_error(error: reqwest::Error) -> TransportFailure {
    if error.is_timeout() {
        return TransportFailure::new(FailureKind::Timeout, error.to_string());
    }
    if error.is_redirect() {
        return TransportFailure::new(FailureKind::TooManyRedirects, error.to_string());
    }
    if error.is_builder() {
        return TransportFailure::new(FailureKind::InvalidUrl, error.to_string());
    }
    if error.is_connect() {
        if is_tls_failure(&error) {
            return TransportFailure::new(FailureKind::Tls, error.to_string());
        }
        return TransportFailure::new(FailureKind::Connect, connect_detail(&error));
    }

    let category = if error.is_request() {
        "request"
    } else if error.is_body() {
        "body"
    } else if error.is_decode() {
        "decode"
    } else if error.is_status() {
        "status"
    } else {
        "error"
    };
    TransportFailure::new(FailureKind::Other(category), error.to_string())
}

// Looks at the causes only, not reqwest's own message: that one contains
// the URL, and a host like "tls.example.com" must not count as a TLS error.
fn is_tls_failure(error: &reqwest::Error) -> bool {
    let mut source = error.source();
    while let Some(cause) = source {
        let text = cause.to_string().to_lowercase();
        if ["certificate", "tls", "ssl", "handshake", "corrupt message"]
            .iter()
            .any(|needle| text.contains(needle))
        {
            return true;
        }
        source = cause.source();
    }
    false
}

// Prefers the OS-level message ("Connection refused") over reqwest's
// wrapper text
fn connect_detail(error: &reqwest::Error) -> String {
    let mut source = error.source();
    while let Some(cause) = source {
        if let Some(io_error) = cause.downcast_ref::<std::io::Error>() {
            let text = io_error.to_string();
            // strerror only, without the " (os error 111)" suffix
            return match text.find(" (os error") {
                Some(idx) => text[..idx].to_string(),
                None => text,
            };
        }
        source = cause.source();
    }
    error.to_string()
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why a trait instead of calling reqwest directly?
//    - The probe logic (HEAD, then maybe GET) is the interesting part
//    - With a trait, tests can script "HEAD returns 405, GET returns 200"
//      without a real server
//
// 2. What does Send + Sync mean on the trait?
//    - Send: the value can move to another thread
//    - Sync: &value can be shared between threads
//    - tokio may poll our futures on any worker thread
//
// 3. What is .source()?
//    - Errors in Rust can wrap other errors
//    - .source() returns the wrapped ("inner") error, if any
//    - Walking the chain finds the root cause (e.g. an io::Error)
//
// 4. What is downcast_ref?
//    - Converts a &dyn Error back into a concrete type if it really is one
//    - Returns None when the types don't match
// -----------------------------------------------------------------------------
