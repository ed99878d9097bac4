//! Fallback extraction from page metadata.
//!
//! Reads Open Graph and Twitter Card `<meta>` tags, `product:`/`og:` price
//! tags, microdata `itemprop` annotations and the document `<title>`. Each
//! field has a fixed priority list of sources; the first non-blank value wins.

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

static META_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("meta").expect("valid selector"));
static TITLE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("title").expect("valid selector"));
static ITEMPROP_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("[itemprop]").expect("valid selector"));

/// Where a raw value can be read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetaSource {
    /// `<meta>` whose `property` or `name` equals the key; value is `content`.
    Meta(&'static str),
    /// Text of the document `<title>`.
    DocumentTitle,
    /// `content` attribute of an element annotated with this `itemprop`.
    ItempropContent(&'static str),
    /// Text of an element annotated with this `itemprop`.
    ItempropText(&'static str),
}

pub const TITLE_SOURCES: &[MetaSource] = &[
    MetaSource::Meta("og:title"),
    MetaSource::Meta("twitter:title"),
    MetaSource::DocumentTitle,
];

pub const IMAGE_SOURCES: &[MetaSource] = &[
    MetaSource::Meta("og:image"),
    MetaSource::Meta("twitter:image"),
];

pub const PRICE_SOURCES: &[MetaSource] = &[
    MetaSource::Meta("product:price:amount"),
    MetaSource::Meta("og:price:amount"),
    MetaSource::ItempropContent("price"),
    MetaSource::ItempropText("price"),
];

pub const CURRENCY_SOURCES: &[MetaSource] = &[
    MetaSource::Meta("product:price:currency"),
    MetaSource::Meta("og:price:currency"),
    MetaSource::ItempropContent("priceCurrency"),
    MetaSource::ItempropText("priceCurrency"),
];

/// Raw, trimmed metadata strings. Empty means no source had a value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeuristicFields {
    pub title: String,
    pub image: String,
    pub price: String,
    pub currency: String,
}

/// Parses `html` and reads the fallback fields from its metadata.
#[must_use]
pub fn extract_heuristic(html: &str) -> HeuristicFields {
    let document = Html::parse_document(html);
    extract_from_document(&document)
}

pub(crate) fn extract_from_document(document: &Html) -> HeuristicFields {
    HeuristicFields {
        title: first_value(document, TITLE_SOURCES),
        image: first_value(document, IMAGE_SOURCES),
        price: first_value(document, PRICE_SOURCES),
        currency: first_value(document, CURRENCY_SOURCES),
    }
}

/// Tries `sources` in order and returns the first non-blank value, trimmed.
#[must_use]
pub fn first_value(document: &Html, sources: &[MetaSource]) -> String {
    sources
        .iter()
        .find_map(|source| read_source(document, *source))
        .unwrap_or_default()
}

fn read_source(document: &Html, source: MetaSource) -> Option<String> {
    match source {
        MetaSource::Meta(key) => document
            .select(&META_SELECTOR)
            .filter(|el| meta_key_matches(el, key))
            .find_map(|el| non_blank(el.value().attr("content")?)),
        MetaSource::DocumentTitle => document
            .select(&TITLE_SELECTOR)
            .next()
            .and_then(|el| non_blank(&element_text(el))),
        MetaSource::ItempropContent(prop) => document
            .select(&ITEMPROP_SELECTOR)
            .filter(|el| has_itemprop(el, prop))
            .find_map(|el| non_blank(el.value().attr("content")?)),
        MetaSource::ItempropText(prop) => document
            .select(&ITEMPROP_SELECTOR)
            .filter(|el| has_itemprop(el, prop))
            .find_map(|el| non_blank(&element_text(el))),
    }
}

fn meta_key_matches(el: &ElementRef<'_>, key: &str) -> bool {
    ["property", "name"].iter().any(|attr| {
        el.value()
            .attr(attr)
            .is_some_and(|v| v.trim().eq_ignore_ascii_case(key))
    })
}

/// `itemprop` holds a space-separated token list.
fn has_itemprop(el: &ElementRef<'_>, prop: &str) -> bool {
    el.value()
        .attr("itemprop")
        .is_some_and(|v| v.split_ascii_whitespace().any(|token| token == prop))
}

fn element_text(el: ElementRef<'_>) -> String {
    el.text().collect::<String>()
}

fn non_blank(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}
