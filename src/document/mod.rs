// src/document/mod.rs
// =============================================================================
// The region/site document and how we find links inside it.
//
// Expected shape (YAML shown, JSON works the same):
//
//   - Europe:                      <- region record (one key)
//       - Example Site:            <- site record (one key)
//           link: example.com/ok   <- metadata with a `link` field
//
// Submodules:
// - io: loading and saving JSON / YAML files
// - html: building a document from HTML "sections"
// - markdown: building a document from Markdown headings and links
//
// Walking the document gives a flat list of CheckTasks. Each remembers the
// Location it came from so the verdict can be written back to the exact same
// record after all checks have finished.
// =============================================================================

mod html;
mod io;
mod markdown;

pub use html::extract_sections;
pub use io::{load, save, Format};
pub use markdown::extract_markdown;

use crate::checker::Verdict;
use crate::error::{CheckError, Result};
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use tracing::debug;

/// In-memory document; key order is preserved (serde_json "preserve_order")
pub type Document = Value;

pub const LINK_FIELD: &str = "link";
pub const STATUS_FIELD: &str = "status";

/// Path from the document root to one link-bearing record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Location {
    pub region_index: usize,
    pub region: String,
    pub site_index: usize,
    pub site: String,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}].{}[{}].{}",
            self.region_index, self.region, self.site_index, self.site
        )
    }
}

/// One link to check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckTask {
    pub location: Location,
    /// Raw link text; empty when the field was empty or not a string
    pub url: String,
}

// Walks the document depth-first and collects one task per `link` field.
//
// Only a non-list top level is an error. Anything unexpected further down
// (a region that is not a mapping, sites that are not a list, ...) is
// skipped.
pub fn collect_tasks(document: &Document) -> Result<Vec<CheckTask>> {
    let regions = document.as_array().ok_or_else(|| {
        CheckError::Structure(format!(
            "expected a list of region records, found {}",
            kind_name(document)
        ))
    })?;

    let mut tasks = Vec::new();

    for (region_index, region_record) in regions.iter().enumerate() {
        let Some(region_record) = region_record.as_object() else {
            debug!(region_index, "skipping region that is not a mapping");
            continue;
        };

        for (region, sites) in region_record {
            let Some(sites) = sites.as_array() else {
                debug!(region_index, region = %region, "skipping region whose sites are not a list");
                continue;
            };

            for (site_index, site_record) in sites.iter().enumerate() {
                let Some(site_record) = site_record.as_object() else {
                    debug!(region = %region, site_index, "skipping site that is not a mapping");
                    continue;
                };

                for (site, meta) in site_record {
                    let Some(link) = meta.as_object().and_then(|m| m.get(LINK_FIELD)) else {
                        continue;
                    };

                    tasks.push(CheckTask {
                        location: Location {
                            region_index,
                            region: region.clone(),
                            site_index,
                            site: site.clone(),
                        },
                        url: link.as_str().unwrap_or_default().to_string(),
                    });
                }
            }
        }
    }

    Ok(tasks)
}

// Stores the verdict as `status` on the record at `location`.
//
// Returns false when the location does not exist (the document was changed
// after the tasks were collected).
pub fn write_back(document: &mut Document, location: &Location, verdict: &Verdict) -> Result<bool> {
    let meta = document
        .get_mut(location.region_index)
        .and_then(|record| record.get_mut(location.region.as_str()))
        .and_then(|sites| sites.get_mut(location.site_index))
        .and_then(|record| record.get_mut(location.site.as_str()))
        .and_then(Value::as_object_mut);

    match meta {
        Some(meta) => {
            meta.insert(STATUS_FIELD.to_string(), serde_json::to_value(verdict)?);
            Ok(true)
        }
        None => Ok(false),
    }
}

fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "a mapping",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Document {
        json!([
            {"Europe": [
                {"Alpha": {"link": "alpha.example", "note": "first"}},
                {"Beta": {"name": "no link here"}},
                {"Gamma": {"link": "https://gamma.example/"}}
            ]},
            {"Asia": [
                {"Delta": {"link": ""}}
            ]}
        ])
    }

    #[test]
    fn test_collects_links_in_document_order() {
        let tasks = collect_tasks(&sample()).unwrap();
        let urls: Vec<_> = tasks.iter().map(|t| t.url.as_str()).collect();
        assert_eq!(urls, vec!["alpha.example", "https://gamma.example/", ""]);

        assert_eq!(
            tasks[1].location,
            Location {
                region_index: 0,
                region: "Europe".to_string(),
                site_index: 2,
                site: "Gamma".to_string(),
            }
        );
        assert_eq!(tasks[2].location.region_index, 1);
    }

    #[test]
    fn test_skips_malformed_branches() {
        let doc = json!([
            "not a mapping",
            {"Broken": "sites should be a list"},
            {"Mixed": [
                42,
                {"Plain": "metadata should be a mapping"},
                {"Good": {"link": "good.example"}}
            ]}
        ]);

        let tasks = collect_tasks(&doc).unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].location.region_index, 2);
        assert_eq!(tasks[0].location.site_index, 2);
    }

    #[test]
    fn test_non_string_link_becomes_empty() {
        let doc = json!([{"R": [{"S": {"link": null}}, {"T": {"link": 7}}]}]);
        let tasks = collect_tasks(&doc).unwrap();
        assert_eq!(tasks.len(), 2);
        assert!(tasks.iter().all(|t| t.url.is_empty()));
    }

    #[test]
    fn test_top_level_must_be_a_list() {
        let err = collect_tasks(&json!({"Europe": []})).unwrap_err();
        assert!(matches!(err, CheckError::Structure(_)));
        assert!(err.to_string().contains("a mapping"));

        assert!(collect_tasks(&Value::Null).is_err());
    }

    #[test]
    fn test_write_back_touches_only_target_record() {
        let mut doc = sample();
        let tasks = collect_tasks(&doc).unwrap();
        let verdict = Verdict::empty_url();

        assert!(write_back(&mut doc, &tasks[0].location, &verdict).unwrap());

        let mut expected = sample();
        expected[0]["Europe"][0]["Alpha"]["status"] = serde_json::to_value(&verdict).unwrap();
        assert_eq!(doc, expected);

        // status lands after the existing keys
        let keys: Vec<_> = doc[0]["Europe"][0]["Alpha"]
            .as_object()
            .unwrap()
            .keys()
            .cloned()
            .collect();
        assert_eq!(keys, vec!["link", "note", "status"]);
    }

    #[test]
    fn test_write_back_overwrites_existing_status() {
        let mut doc = json!([{"R": [{"S": {"link": "x", "status": "stale"}}]}]);
        let tasks = collect_tasks(&doc).unwrap();
        write_back(&mut doc, &tasks[0].location, &Verdict::empty_url()).unwrap();
        assert_eq!(doc[0]["R"][0]["S"]["status"]["reason"], "empty url");
    }

    #[test]
    fn test_write_back_missing_location() {
        let mut doc = json!([]);
        let location = Location {
            region_index: 3,
            region: "Nowhere".to_string(),
            site_index: 0,
            site: "Ghost".to_string(),
        };
        assert!(!write_back(&mut doc, &location, &Verdict::empty_url()).unwrap());
        assert_eq!(doc, json!([]));
    }

    #[test]
    fn test_location_display() {
        let location = Location {
            region_index: 1,
            region: "Asia".to_string(),
            site_index: 0,
            site: "Delta".to_string(),
        };
        assert_eq!(location.to_string(), "[1].Asia[0].Delta");
    }
}
