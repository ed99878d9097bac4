//! Schema.org JSON-LD extraction.
//!
//! Every `<script type="application/ld+json">` block is decoded and flattened
//! into an ordered candidate list. Container relationships (`@graph`,
//! `mainEntity`, `itemListElement`, nested `offers`) are unwrapped into
//! sibling candidates that follow their parent. Fields are then taken from the
//! first candidate that carries them, so document order is priority order.

use std::ops::ControlFlow;
use std::sync::LazyLock;

use scraper::{Html, Selector};
use serde_json::Value;

use crate::numeric::normalize_number;

static SCRIPT_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("script[type]").expect("valid selector"));

const LD_JSON_MIME: &str = "application/ld+json";

/// Offer keys tried in order when looking for a price.
const PRICE_KEYS: [&str; 3] = ["price", "lowPrice", "highPrice"];

/// Fields derived from structured data. `None` means no candidate supplied it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StructuredFields {
    pub title: Option<String>,
    pub image: Option<String>,
    pub price: Option<f64>,
    pub currency: Option<String>,
}

impl StructuredFields {
    /// The candidate scan stops once title, image and price are all known.
    /// Currency does not participate.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.title.is_some() && self.image.is_some() && self.price.is_some()
    }

    fn absorb(&mut self, node: &Value) {
        if self.title.is_none() {
            self.title = node_name(node);
        }
        if self.image.is_none() {
            self.image = image_reference(node);
        }
        if let Some(offer) = first_offer(node) {
            if self.price.is_none() {
                self.price = offer_price(offer);
            }
            if self.currency.is_none() {
                self.currency = offer_currency(offer);
            }
        }
    }
}

/// Parses `html` and derives structured fields from its JSON-LD blocks.
#[must_use]
pub fn extract_structured(html: &str) -> StructuredFields {
    let document = Html::parse_document(html);
    extract_from_document(&document)
}

pub(crate) fn extract_from_document(document: &Html) -> StructuredFields {
    let candidates = collect_candidates(document);
    derive_fields(&select_working_set(&candidates))
}

/// Decodes every JSON-LD block in `document` and returns the flattened
/// candidate sequence in document order. Blocks that fail to parse are skipped.
#[must_use]
pub fn collect_candidates(document: &Html) -> Vec<Value> {
    let mut candidates = Vec::new();

    for (index, script) in document.select(&SCRIPT_SELECTOR).enumerate() {
        let is_ld_json = script
            .value()
            .attr("type")
            .is_some_and(|t| t.trim().to_ascii_lowercase().starts_with(LD_JSON_MIME));
        if !is_ld_json {
            continue;
        }

        let raw = script.text().collect::<String>();
        let raw = raw.trim();
        if raw.is_empty() {
            continue;
        }

        match serde_json::from_str::<Value>(raw) {
            Ok(value) => flatten_node(&value, &mut candidates),
            Err(error) => {
                tracing::debug!(script_index = index, %error, "skipping malformed JSON-LD block");
            }
        }
    }

    candidates
}

/// Appends `value` and its unwrapped children to `out`, parent first.
///
/// Arrays contribute their elements but never themselves; scalars are dropped.
pub fn flatten_node(value: &Value, out: &mut Vec<Value>) {
    match value {
        Value::Array(items) => {
            for item in items {
                flatten_node(item, out);
            }
        }
        Value::Object(map) => {
            out.push(value.clone());

            let children = [
                map.get("@graph").or_else(|| map.get("graph")),
                map.get("mainEntity"),
                map.get("itemListElement"),
                map.get("offers"),
            ];
            for child in children.into_iter().flatten() {
                flatten_node(child, out);
            }
        }
        _ => {}
    }
}

/// Restricts `candidates` to `Product` nodes when any exist.
fn select_working_set(candidates: &[Value]) -> Vec<&Value> {
    let products: Vec<&Value> = candidates.iter().filter(|n| is_product_node(n)).collect();
    if products.is_empty() {
        candidates.iter().collect()
    } else {
        products
    }
}

/// Scans `candidates` in order, keeping the first value seen for each field.
#[must_use]
pub fn derive_fields(candidates: &[&Value]) -> StructuredFields {
    let outcome = candidates
        .iter()
        .try_fold(StructuredFields::default(), |mut acc, node| {
            acc.absorb(node);
            if acc.is_complete() {
                ControlFlow::Break(acc)
            } else {
                ControlFlow::Continue(acc)
            }
        });

    match outcome {
        ControlFlow::Break(fields) | ControlFlow::Continue(fields) => fields,
    }
}

/// Type names from `@type` (or a bare `type`), which may be a string or a list.
fn node_types(node: &Value) -> Vec<&str> {
    match node.get("@type").or_else(|| node.get("type")) {
        Some(Value::String(s)) => vec![s.as_str()],
        Some(Value::Array(items)) => items.iter().filter_map(Value::as_str).collect(),
        _ => Vec::new(),
    }
}

#[must_use]
pub fn is_product_node(node: &Value) -> bool {
    node_types(node)
        .iter()
        .any(|t| t.eq_ignore_ascii_case("Product"))
}

fn node_name(node: &Value) -> Option<String> {
    node.get("name")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
}

/// `image` as a plain string, or the first entry of a list when that entry is a string.
fn image_reference(node: &Value) -> Option<String> {
    let image = match node.get("image")? {
        Value::String(s) => s.as_str(),
        Value::Array(items) => items.first()?.as_str()?,
        _ => return None,
    };
    let image = image.trim();
    (!image.is_empty()).then(|| image.to_owned())
}

fn first_offer(node: &Value) -> Option<&Value> {
    match node.get("offers")? {
        Value::Array(items) => items.first(),
        offer => Some(offer),
    }
}

/// `price`, else `lowPrice`, else `highPrice`. Only a missing or `null` key
/// falls through to the next one.
fn offer_price(offer: &Value) -> Option<f64> {
    PRICE_KEYS
        .iter()
        .find_map(|key| offer.get(key).filter(|v| !v.is_null()))
        .and_then(normalize_number)
}

fn offer_currency(offer: &Value) -> Option<String> {
    offer
        .get("priceCurrency")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
}

#[cfg(test)]
#[path = "structured_test.rs"]
mod tests;
