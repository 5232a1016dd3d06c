// src/orchestrator.rs
// =============================================================================
// Checks every link in a document and writes the verdicts back.
//
// How a run works:
// 1. Walk the document once and collect (location, url) tasks
// 2. Start one probe per task; the limiter lets at most N run at once and
//    all of them share one HTTP client (connection reuse)
// 3. Wait for every probe: a dead link is a failing verdict, not an error,
//    so nothing stops the batch early
// 4. Write each verdict to the location its task came from
//
// The document is only touched in step 4, after all probes are done, so the
// concurrent part never needs a lock.
// =============================================================================

use crate::checker::{HttpTransport, Limiter, Prober, Transport, Verdict};
use crate::config::CheckerConfig;
use crate::document::{collect_tasks, write_back, CheckTask, Document, Location};
use crate::error::Result;
use futures::future;
use serde::Serialize;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// The outcome for one link, in task order
#[derive(Debug, Clone, Serialize)]
pub struct LinkReport {
    pub location: Location,
    pub url: String,
    #[serde(flatten)]
    pub verdict: Verdict,
}

#[derive(Debug, Clone)]
pub struct RunReport {
    /// The input document with `status` added to every link record
    pub document: Document,
    pub links: Vec<LinkReport>,
    pub elapsed: Duration,
}

impl RunReport {
    pub fn ok_count(&self) -> usize {
        self.links.iter().filter(|link| link.verdict.ok).count()
    }

    pub fn broken_count(&self) -> usize {
        self.links.len() - self.ok_count()
    }
}

pub struct Orchestrator<T> {
    prober: Prober<T>,
    limiter: Limiter,
}

impl Orchestrator<HttpTransport> {
    /// Orchestrator with a real HTTP client built from `cfg`
    pub fn new(cfg: &CheckerConfig) -> Result<Self> {
        let transport = HttpTransport::new(cfg)?;
        Ok(Self::with_transport(cfg, transport))
    }
}

impl<T: Transport> Orchestrator<T> {
    pub fn with_transport(cfg: &CheckerConfig, transport: T) -> Self {
        Self {
            prober: Prober::new(transport),
            limiter: Limiter::new(cfg.effective_concurrency()),
        }
    }

    /// Annotates the document; see `run_report` for per-link results
    pub async fn run(&self, document: Document) -> Result<Document> {
        Ok(self.run_report(document).await?.document)
    }

    pub async fn run_report(&self, mut document: Document) -> Result<RunReport> {
        let started = Instant::now();

        // The only fatal step: fails before any request is sent
        let tasks = collect_tasks(&document)?;
        info!(
            links = tasks.len(),
            concurrency = self.limiter.capacity(),
            "checking links"
        );

        let verdicts = self.check_all(&tasks).await?;

        let mut links = Vec::with_capacity(tasks.len());
        for (task, verdict) in tasks.into_iter().zip(verdicts) {
            if !write_back(&mut document, &task.location, &verdict)? {
                warn!(location = %task.location, "location vanished before write-back");
            }
            links.push(LinkReport {
                location: task.location,
                url: task.url,
                verdict,
            });
        }

        let report = RunReport {
            document,
            links,
            elapsed: started.elapsed(),
        };
        info!(
            total = report.links.len(),
            ok = report.ok_count(),
            broken = report.broken_count(),
            elapsed_ms = report.elapsed.as_millis() as u64,
            "finished checking links"
        );

        Ok(report)
    }

    // Verdicts come back in the same order as `tasks`, however the probes
    // happen to finish.
    pub async fn check_all(&self, tasks: &[CheckTask]) -> Result<Vec<Verdict>> {
        future::try_join_all(tasks.iter().map(|task| self.check_one(task))).await
    }

    async fn check_one(&self, task: &CheckTask) -> Result<Verdict> {
        // Held across HEAD and the fallback GET; released on drop
        let _permit = self.limiter.acquire().await?;
        let verdict = self.prober.probe(&task.url).await;

        debug!(
            location = %task.location,
            url = %task.url,
            ok = verdict.ok,
            code = ?verdict.code,
            reason = %verdict.reason,
            "checked"
        );
        Ok(verdict)
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why try_join_all instead of buffer_unordered?
//    - try_join_all keeps results in the same order as the input
//    - That order is what lets us zip verdicts back with their tasks
//    - The limiter (not the stream) decides how many run at once
//
// 2. Why is Orchestrator generic over T?
//    - In production T is HttpTransport (real network)
//    - In tests T is a fake that counts calls or sleeps
//    - The compiler generates a specialized version for each T
//
// 3. What does `let _permit = ...` do?
//    - Binds the permit to a variable so it lives until the end of the scope
//    - `let _ = ...` (no name) would drop it immediately!
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checker::{FailureKind, HttpOutcome, ProbeMethod, ProbeRequest, TransportFailure};
    use crate::error::CheckError;
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    // Answers based on the URL:
    //   .../dead     -> connection refused
    //   .../slow     -> timeout
    //   .../code/NNN -> status NNN
    //   otherwise    -> 200
    // and counts concurrent entries.
    #[derive(Default)]
    struct FakeTransport {
        calls: AtomicUsize,
        in_flight: AtomicUsize,
        peak: AtomicUsize,
        delay_ms: u64,
    }

    #[async_trait]
    impl Transport for FakeTransport {
        async fn send(&self, request: &ProbeRequest<'_>) -> std::result::Result<HttpOutcome, TransportFailure> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            if self.delay_ms > 0 {
                tokio::time::sleep(Duration::from_millis(self.delay_ms)).await;
            } else {
                tokio::task::yield_now().await;
            }
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            let url = request.url;
            if url.ends_with("/dead") {
                return Err(TransportFailure::new(FailureKind::Connect, "Connection refused"));
            }
            if url.ends_with("/slow") {
                return Err(TransportFailure::new(FailureKind::Timeout, ""));
            }
            let status = url
                .rsplit_once("/code/")
                .and_then(|(_, code)| code.parse().ok())
                .unwrap_or(200);
            // GET recovers servers that reject HEAD
            let status = if status == 405 && request.method == ProbeMethod::Get {
                200
            } else {
                status
            };

            Ok(HttpOutcome {
                status,
                reason: String::new(),
                final_url: url.to_string(),
            })
        }
    }

    fn config(concurrency: usize) -> CheckerConfig {
        CheckerConfig {
            concurrency,
            ..CheckerConfig::default()
        }
    }

    fn strip_status(value: &mut Value) {
        match value {
            Value::Object(map) => {
                map.remove("status");
                map.values_mut().for_each(strip_status);
            }
            Value::Array(items) => items.iter_mut().for_each(strip_status),
            _ => {}
        }
    }

    #[tokio::test]
    async fn test_annotates_every_link() {
        let doc = json!([
            {"Europe": [
                {"Alpha": {"link": "alpha.example/ok", "note": "keep me"}},
                {"Beta": {"link": "https://beta.example/code/404"}},
                {"Plain": {"name": "no link"}}
            ]},
            {"Asia": [
                {"Gamma": {"link": "https://gamma.example/dead"}},
                {"Delta": {"link": ""}},
                {"Eps": {"link": "https://eps.example/slow"}}
            ]}
        ]);

        let orchestrator = Orchestrator::with_transport(&config(4), FakeTransport::default());
        let out = orchestrator.run(doc.clone()).await.unwrap();

        assert_eq!(
            out[0]["Europe"][0]["Alpha"]["status"],
            json!({"ok": true, "code": 200, "reason": "OK", "final_url": "https://alpha.example/ok"})
        );
        assert_eq!(out[0]["Europe"][1]["Beta"]["status"]["code"], 404);
        assert_eq!(out[0]["Europe"][1]["Beta"]["status"]["ok"], false);
        assert!(out[0]["Europe"][2]["Plain"].get("status").is_none());
        assert_eq!(
            out[1]["Asia"][0]["Gamma"]["status"],
            json!({"ok": false, "code": null, "reason": "connection error: Connection refused", "final_url": null})
        );
        assert_eq!(out[1]["Asia"][1]["Delta"]["status"]["reason"], "empty url");
        assert_eq!(out[1]["Asia"][2]["Eps"]["status"]["reason"], "timeout");

        let mut stripped = out.clone();
        strip_status(&mut stripped);
        assert_eq!(stripped, doc);
    }

    #[tokio::test]
    async fn test_verdicts_land_on_their_own_location() {
        let sites: Vec<Value> = (0..50)
            .map(|i| json!({ format!("site-{i}"): {"link": format!("https://s{i}.example/code/{}", 200 + i)} }))
            .collect();
        let doc = json!([{"All": sites}]);

        let orchestrator = Orchestrator::with_transport(&config(7), FakeTransport::default());
        let report = orchestrator.run_report(doc).await.unwrap();

        assert_eq!(report.links.len(), 50);
        for i in 0..50 {
            let status = &report.document[0]["All"][i][format!("site-{i}")]["status"];
            assert_eq!(status["code"], 200 + i as u64);
            assert_eq!(status["final_url"], format!("https://s{i}.example/code/{}", 200 + i));
            assert_eq!(report.links[i].location.site_index, i);
        }
    }

    #[tokio::test]
    async fn test_large_batch_respects_concurrency_ceiling() {
        let sites: Vec<Value> = (0..500)
            .map(|i| json!({ format!("site-{i}"): {"link": format!("site{i}.example")} }))
            .collect();
        let doc = json!([{"Big": sites}]);

        let transport = Arc::new(FakeTransport {
            delay_ms: 2,
            ..FakeTransport::default()
        });
        let orchestrator = Orchestrator::with_transport(&config(80), Arc::clone(&transport));
        let report = orchestrator.run_report(doc.clone()).await.unwrap();

        assert_eq!(report.links.len(), 500);
        assert_eq!(report.ok_count(), 500);
        assert_eq!(transport.calls.load(Ordering::SeqCst), 500);
        let peak = transport.peak.load(Ordering::SeqCst);
        assert!(peak <= 80, "peak concurrency {peak} exceeded ceiling");
        assert!(peak > 1, "probes did not overlap");

        let mut stripped = report.document.clone();
        strip_status(&mut stripped);
        assert_eq!(
            serde_json::to_string(&stripped).unwrap(),
            serde_json::to_string(&doc).unwrap()
        );
    }

    #[tokio::test]
    async fn test_ceiling_of_one_serializes_probes() {
        let sites: Vec<Value> = (0..10)
            .map(|i| json!({ format!("s{i}"): {"link": format!("https://s{i}.example/code/405")} }))
            .collect();
        let transport = Arc::new(FakeTransport {
            delay_ms: 1,
            ..FakeTransport::default()
        });
        let orchestrator = Orchestrator::with_transport(&config(1), Arc::clone(&transport));
        let report = orchestrator.run_report(json!([{"R": sites}])).await.unwrap();

        // HEAD 405 then GET 200 for each link, one probe at a time
        assert_eq!(transport.calls.load(Ordering::SeqCst), 20);
        assert_eq!(transport.peak.load(Ordering::SeqCst), 1);
        assert_eq!(report.broken_count(), 0);
    }

    #[tokio::test]
    async fn test_structural_error_sends_nothing() {
        let transport = Arc::new(FakeTransport::default());
        let orchestrator = Orchestrator::with_transport(&config(4), Arc::clone(&transport));

        let err = orchestrator
            .run(json!({"Europe": [{"A": {"link": "a.example"}}]}))
            .await
            .unwrap_err();

        assert!(matches!(err, CheckError::Structure(_)));
        assert_eq!(transport.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_empty_document() {
        let orchestrator = Orchestrator::with_transport(&config(4), FakeTransport::default());
        let report = orchestrator.run_report(json!([])).await.unwrap();
        assert!(report.links.is_empty());
        assert_eq!(report.document, json!([]));
    }

    #[test]
    fn test_link_report_serializes_flat() {
        let report = LinkReport {
            location: Location {
                region_index: 0,
                region: "R".to_string(),
                site_index: 1,
                site: "S".to_string(),
            },
            url: "s.example".to_string(),
            verdict: Verdict::empty_url(),
        };
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["reason"], "empty url");
        assert_eq!(value["location"]["site"], "S");
    }
}
