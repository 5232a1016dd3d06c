// src/checker/normalize.rs
// =============================================================================
// Makes a user-written link usable as an absolute URL.
//
// People write "example.com/page" in their documents all the time. Without a
// scheme the HTTP client cannot send anything, so we assume https.
//
// Rust concepts:
// - &str in, String out: we only read the input and return new data
// =============================================================================

const SCHEME_DELIMITER: &str = "://";
const DEFAULT_SCHEME: &str = "https://";

// Returns the link with a scheme, or the empty string unchanged
//
// Examples:
//   "example.com/ok"      -> "https://example.com/ok"
//   "http://example.com"  -> "http://example.com"
//   ""                    -> ""
pub fn normalize(raw: &str) -> String {
    if raw.is_empty() || raw.contains(SCHEME_DELIMITER) {
        raw.to_string()
    } else {
        format!("{DEFAULT_SCHEME}{raw}")
    }
}
