//! Field-by-field merge of structured and heuristic results.

use prodex_core::ProductRecord;
use url::Url;

use crate::currency::detect_currency;
use crate::heuristic::HeuristicFields;
use crate::numeric::parse_price;
use crate::structured::StructuredFields;

/// Combines both extractor outputs into the final record.
///
/// Structured data wins wherever it produced a value; heuristic strings fill
/// the gaps. The image is resolved against `base_url`. When neither source
/// names a currency, it is sniffed from the raw heuristic price text.
#[must_use]
pub fn merge_fields(
    structured: StructuredFields,
    heuristic: &HeuristicFields,
    base_url: &str,
) -> ProductRecord {
    let title = structured
        .title
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| heuristic.title.clone());

    let image_ref = structured
        .image
        .filter(|i| !i.is_empty())
        .unwrap_or_else(|| heuristic.image.clone());
    let image_url = resolve_url(&image_ref, base_url);

    let price = structured.price.or_else(|| parse_price(&heuristic.price));

    let currency = structured
        .currency
        .or_else(|| {
            let explicit = heuristic.currency.trim();
            (!explicit.is_empty()).then(|| explicit.to_owned())
        })
        .or_else(|| detect_currency(&heuristic.price).map(str::to_owned));

    ProductRecord {
        title,
        image_url,
        price,
        currency,
    }
}

/// Resolves `reference` against `base_url`.
///
/// Absolute references come back as-is (in normalized form), relative ones
/// are joined onto the base. An empty reference, or one that cannot be
/// resolved, yields an empty string.
#[must_use]
pub fn resolve_url(reference: &str, base_url: &str) -> String {
    let reference = reference.trim();
    if reference.is_empty() {
        return String::new();
    }

    let resolved = match Url::parse(base_url.trim()) {
        Ok(base) => base.join(reference),
        Err(_) => Url::parse(reference),
    };

    match resolved {
        Ok(url) => url.to_string(),
        Err(error) => {
            tracing::debug!(reference, base_url, %error, "could not resolve image URL");
            String::new()
        }
    }
}
