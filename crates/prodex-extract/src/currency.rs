//! Currency sniffing from free text such as `"$19.99"` or `"19,99 EUR"`.

/// One row of the detection table: any marker present in the text yields `code`.
#[derive(Debug, Clone, Copy)]
pub struct CurrencyRule {
    pub code: &'static str,
    /// Matched case-insensitively against the uppercased text.
    pub markers: &'static [&'static str],
}

/// Detection order. Earlier rows win when a text carries several markers.
pub const CURRENCY_RULES: &[CurrencyRule] = &[
    CurrencyRule {
        code: "EUR",
        markers: &["EUR", "€"],
    },
    CurrencyRule {
        code: "USD",
        markers: &["USD", "$"],
    },
    CurrencyRule {
        code: "GBP",
        markers: &["GBP", "£"],
    },
];

/// Returns the code of the first rule in [`CURRENCY_RULES`] with a marker in `text`.
#[must_use]
pub fn detect_currency(text: &str) -> Option<&'static str> {
    if text.is_empty() {
        return None;
    }
    let upper = text.to_uppercase();
    CURRENCY_RULES
        .iter()
        .find(|rule| rule.markers.iter().any(|marker| upper.contains(marker)))
        .map(|rule| rule.code)
}
