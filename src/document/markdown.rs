// src/document/markdown.rs
// =============================================================================
// Builds a region/site document from Markdown.
//
// Every heading starts a region; every link below it becomes a site:
//
//   ## Europe
//   - [Alpha](https://alpha.example)
//
// becomes
//
//   [{"Europe": [{"Alpha": {"link": "https://alpha.example"}}]}]
//
// We use the `pulldown-cmark` crate which:
// - Parses Markdown into events (heading, paragraph, link, etc.)
// - Follows the CommonMark specification
// =============================================================================

use super::html::site_record;
use super::Document;
use pulldown_cmark::{Event, Parser, Tag};
use serde_json::{Map, Value};

const UNKNOWN_REGION: &str = "Unknown";

pub fn extract_markdown(markdown: &str) -> Document {
    // (region name, sites) in the order the headings appear
    let mut regions: Vec<(String, Vec<Value>)> = Vec::new();

    // pulldown-cmark emits Start(..), then Text events, then End(..).
    // A region is opened as soon as its heading starts, so a link inside
    // the heading itself lands in that region.
    let mut in_heading = false;
    let mut link: Option<(String, String)> = None;

    for event in Parser::new(markdown) {
        match event {
            Event::Start(Tag::Heading(..)) => {
                in_heading = true;
                regions.push((String::new(), Vec::new()));
            }
            Event::End(Tag::Heading(..)) => {
                in_heading = false;
                if let Some((name, _)) = regions.last_mut() {
                    let trimmed = name.trim();
                    *name = if trimmed.is_empty() {
                        UNKNOWN_REGION.to_string()
                    } else {
                        trimmed.to_string()
                    };
                }
            }
            Event::Start(Tag::Link(_link_type, dest_url, _title)) => {
                link = Some((dest_url.to_string(), String::new()));
            }
            Event::End(Tag::Link(..)) => {
                if let Some((dest, text)) = link.take() {
                    let name = text.trim();
                    let dest = dest.trim();
                    if name.is_empty() || !is_checkable(dest) {
                        continue;
                    }
                    if regions.is_empty() {
                        regions.push((UNKNOWN_REGION.to_string(), Vec::new()));
                    }
                    if let Some((_, sites)) = regions.last_mut() {
                        sites.push(site_record(name.to_string(), dest));
                    }
                }
            }
            Event::Text(text) | Event::Code(text) => {
                if let Some((_, name)) = link.as_mut() {
                    name.push_str(&text);
                }
                if in_heading {
                    if let Some((name, _)) = regions.last_mut() {
                        name.push_str(&text);
                    }
                }
            }
            _ => {}
        }
    }

    let regions = regions
        .into_iter()
        .filter(|(_, sites)| !sites.is_empty())
        .map(|(name, sites)| {
            let mut record = Map::new();
            record.insert(name, Value::Array(sites));
            Value::Object(record)
        })
        .collect();

    Value::Array(regions)
}

// Skip:
// - empty destinations
// - in-page anchors (#section)
// - mailto: and tel: links
// Relative or scheme-less links are kept; the normalizer adds https://.
fn is_checkable(dest: &str) -> bool {
    !(dest.is_empty()
        || dest.starts_with('#')
        || dest.starts_with("mailto:")
        || dest.starts_with("tel:"))
}
