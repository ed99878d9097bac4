use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Best-effort product data extracted from a single rendered page.
///
/// Every field is independently optional: a page that only exposes a price
/// still yields a record with that price set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    /// Product title; empty when nothing usable was found.
    pub title: String,
    /// Absolute URL of the primary product image; empty when absent or unresolvable.
    pub image_url: String,
    pub price: Option<f64>,
    /// Three-letter currency code, e.g. `"EUR"`.
    pub currency: Option<String>,
}

impl ProductRecord {
    /// Returns `true` if no field carries a value.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.title.is_empty()
            && self.image_url.is_empty()
            && self.price.is_none()
            && self.currency.is_none()
    }

    /// Number of populated fields, from 0 to 4.
    #[must_use]
    pub fn populated_fields(&self) -> usize {
        [
            !self.title.is_empty(),
            !self.image_url.is_empty(),
            self.price.is_some(),
            self.currency.is_some(),
        ]
        .into_iter()
        .filter(|set| *set)
        .count()
    }
}

/// Outcome of rendering one URL and extracting from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionReport {
    /// URL as requested.
    pub url: String,
    /// URL the page was finally served from.
    pub final_url: String,
    pub product: ProductRecord,
    /// At least one product field was populated.
    pub success: bool,
    pub elapsed_ms: u64,
}

impl ExtractionReport {
    #[must_use]
    pub fn new(
        url: impl Into<String>,
        final_url: impl Into<String>,
        product: ProductRecord,
        elapsed: Duration,
    ) -> Self {
        Self {
            url: url.into(),
            final_url: final_url.into(),
            success: !product.is_empty(),
            product,
            elapsed_ms: u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
        }
    }
}
