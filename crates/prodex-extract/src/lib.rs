//! Product extraction from rendered e-commerce HTML.
//!
//! [`extract`] turns one HTML document plus the URL it was served from into a
//! [`ProductRecord`]. Schema.org JSON-LD is consulted first
//! ([`structured`]); page metadata fills whatever it leaves empty
//! ([`heuristic`]). Both feed [`merge`], which also resolves the image URL.
//!
//! Extraction is a pure function of its inputs: no I/O, no shared state, and
//! no failure path. Malformed markup or JSON degrades to empty fields.

pub mod currency;
pub mod heuristic;
pub mod merge;
pub mod numeric;
pub mod structured;

use scraper::Html;

pub use currency::detect_currency;
pub use heuristic::{extract_heuristic, HeuristicFields};
pub use merge::{merge_fields, resolve_url};
pub use numeric::{normalize_number, parse_price};
pub use prodex_core::ProductRecord;
pub use structured::{extract_structured, StructuredFields};

/// Extracts a best-effort product record from `html`.
///
/// `base_url` is the final (post-redirect) URL of the page and is used to
/// absolutize a relative image reference.
#[must_use]
pub fn extract(html: &str, base_url: &str) -> ProductRecord {
    let document = Html::parse_document(html);

    let structured = structured::extract_from_document(&document);
    let heuristic = heuristic::extract_from_document(&document);

    tracing::debug!(
        base_url,
        structured_complete = structured.is_complete(),
        "extracted candidate fields"
    );

    merge_fields(structured, &heuristic, base_url)
}
