// src/document/html.rs
// =============================================================================
// Builds a region/site document from an HTML page made of "sections".
//
// Expected markup:
//
//   <div class="section">
//     <h2>Europe</h2>
//     <div class="card-container">
//       <div class="card"><a href="https://alpha.example">Alpha</a></div>
//     </div>
//   </div>
//
// becomes
//
//   [{"Europe": [{"Alpha": {"link": "https://alpha.example"}}]}]
//
// We use the `scraper` crate which:
// - Parses HTML into a DOM (full documents and fragments alike)
// - Supports CSS selectors for finding elements
//
// Rust concepts:
// - Iterators: For walking the selected elements
// - Closures: Anonymous functions (|x| ...)
// =============================================================================

use super::{Document, LINK_FIELD};
use scraper::{ElementRef, Html, Selector};
use serde_json::{Map, Value};

const SECTION_SELECTOR: &str = "div.section";
const HEADING_SELECTOR: &str = "h2";
const LINK_SELECTOR: &str = ".card-container .card a[href]";
const UNKNOWN_REGION: &str = "Unknown";

// Extracts one region per section that contains at least one usable link
//
// Parameters:
//   html: the HTML content to parse (borrowed as &str)
//
// Returns: a document ready for the orchestrator
pub fn extract_sections(html: &str) -> Document {
    let document = Html::parse_document(html);

    // Our selectors are constants and known to be valid, so a parse failure
    // is a programmer error
    let section_selector = Selector::parse(SECTION_SELECTOR).expect("valid section selector");
    let heading_selector = Selector::parse(HEADING_SELECTOR).expect("valid heading selector");
    let link_selector = Selector::parse(LINK_SELECTOR).expect("valid link selector");

    let mut regions = Vec::new();

    for section in document.select(&section_selector) {
        let region = section
            .select(&heading_selector)
            .next()
            .map(stripped_text)
            .unwrap_or_else(|| UNKNOWN_REGION.to_string());

        let mut sites = Vec::new();
        for anchor in section.select(&link_selector) {
            let name = stripped_text(anchor);
            let href = anchor.value().attr("href").unwrap_or("").trim();

            if name.is_empty() || href.is_empty() {
                continue;
            }
            sites.push(site_record(name, href));
        }

        if !sites.is_empty() {
            let mut record = Map::new();
            record.insert(region, Value::Array(sites));
            regions.push(Value::Object(record));
        }
    }

    Value::Array(regions)
}

// Text of an element with every text node trimmed, then joined
fn stripped_text(element: ElementRef<'_>) -> String {
    element.text().map(str::trim).collect()
}

// {name: {"link": href}}
pub(super) fn site_record(name: String, href: &str) -> Value {
    let mut meta = Map::new();
    meta.insert(LINK_FIELD.to_string(), Value::String(href.to_string()));

    let mut record = Map::new();
    record.insert(name, Value::Object(meta));
    Value::Object(record)
}
