// src/lib.rs
// =============================================================================
// Library root for link-warden.
//
// The binary (src/main.rs) is a thin shell around these modules; everything
// that does real work lives here so it can be tested and reused.
//
// Modules:
// - checker: normalizing, probing, and classifying one URL
// - document: finding links in the region/site document and writing back
// - orchestrator: running all probes under the concurrency limit
// - cli, config, logging, error: the ambient pieces
// =============================================================================

pub mod checker;
pub mod cli;
pub mod config;
pub mod document;
pub mod error;
pub mod logging;
pub mod orchestrator;

pub use error::{CheckError, Result};
pub use orchestrator::{LinkReport, Orchestrator, RunReport};
