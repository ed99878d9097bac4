//! Target URL validation and host extraction.

use reqwest::Url;

use crate::error::RenderError;

/// Parses `raw` as an absolute `http`/`https` URL with a host.
///
/// # Errors
///
/// Returns [`RenderError::InvalidUrl`] for relative URLs, other schemes, or
/// URLs without a host.
pub fn validate_target_url(raw: &str) -> Result<Url, RenderError> {
    let trimmed = raw.trim();
    let invalid = |reason: &str| RenderError::InvalidUrl {
        url: trimmed.to_owned(),
        reason: reason.to_owned(),
    };

    if trimmed.is_empty() {
        return Err(invalid("URL is empty"));
    }

    let url = Url::parse(trimmed).map_err(|e| invalid(&e.to_string()))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(&format!(
            "unsupported scheme \"{}\" (expected http or https)",
            url.scheme()
        )));
    }
    if url.host_str().unwrap_or_default().is_empty() {
        return Err(invalid("URL has no host"));
    }

    Ok(url)
}

/// Hostname of `url` for log fields and error messages.
///
/// Falls back to the full URL string if parsing fails.
#[must_use]
pub fn extract_domain(url: &str) -> String {
    Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_owned))
        .unwrap_or_else(|| url.to_owned())
}

#[cfg(test)]
#[path = "target_test.rs"]
mod tests;
