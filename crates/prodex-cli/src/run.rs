//! Command handlers. Each returns the value to print so tests can inspect it.

use std::path::Path;
use std::time::Instant;

use anyhow::Context;
use prodex_core::{ExtractionReport, ProductRecord};
use prodex_render::{validate_target_url, Renderer};
use serde::Serialize;

/// Reads `path` and extracts from it as if it had been served from `base_url`.
pub(crate) fn run_file(path: &Path, base_url: &str) -> anyhow::Result<ProductRecord> {
    let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let html = String::from_utf8_lossy(&bytes);
    let record = prodex_extract::extract(&html, base_url);
    tracing::info!(
        path = %path.display(),
        populated = record.populated_fields(),
        "extracted product from file"
    );
    Ok(record)
}

/// Renders `url` and extracts from the resulting page.
pub(crate) async fn run_url(
    renderer: &dyn Renderer,
    url: &str,
) -> anyhow::Result<ExtractionReport> {
    let started = Instant::now();
    let target = validate_target_url(url)?;
    let page = renderer
        .render(target.as_str())
        .await
        .with_context(|| format!("rendering {url}"))?;

    let product = prodex_extract::extract(&page.html, &page.final_url);
    Ok(ExtractionReport::new(
        url,
        page.final_url,
        product,
        started.elapsed(),
    ))
}

pub(crate) fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
