//! Locale-tolerant price parsing.
//!
//! Accepts the shapes prices take in the wild (`"€1.234,56"`, `"$1,234.56"`,
//! `"19,99"`, bare JSON numbers) and reduces them to an `f64`.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

static NON_NUMERIC_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^0-9.,]").expect("valid regex"));

/// Normalizes a structured-data price value.
///
/// Finite JSON numbers pass through unchanged and JSON strings go through
/// [`parse_price`]. Every other shape (null, bool, object, array) is absent.
#[must_use]
pub fn normalize_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|v| v.is_finite()),
        Value::String(s) => parse_price(s),
        _ => None,
    }
}

/// Parses free-form price text into a number.
///
/// Everything except digits, `,` and `.` is discarded. When both separators
/// occur, whichever appears last is the decimal separator and the other is
/// dropped as a grouping mark. A comma with no period is always read as a
/// decimal separator, so `"1,234"` parses as `1.234`.
///
/// Returns `None` for empty input, input without a parseable number, or a
/// non-finite result.
#[must_use]
pub fn parse_price(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }

    let kept = NON_NUMERIC_RE.replace_all(trimmed, "");
    if kept.is_empty() {
        return None;
    }

    let canonical = canonicalize_separators(&kept);
    canonical.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Rewrites `digits` (already limited to `[0-9.,]`) so the decimal separator
/// is `.` and grouping marks are gone.
fn canonicalize_separators(digits: &str) -> String {
    match (digits.rfind(','), digits.rfind('.')) {
        (Some(comma), Some(period)) => {
            let (decimal, grouping) = if comma > period {
                (',', '.')
            } else {
                ('.', ',')
            };
            digits
                .chars()
                .filter(|c| *c != grouping)
                .map(|c| if c == decimal { '.' } else { c })
                .collect()
        }
        (Some(_), None) => digits.replace(',', "."),
        _ => digits.to_owned(),
    }
}
