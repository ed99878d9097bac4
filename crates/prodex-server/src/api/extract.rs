use std::time::Instant;

use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};
use prodex_core::ExtractionReport;
use prodex_render::{validate_target_url, RenderError};
use serde::Deserialize;

use crate::middleware::RequestId;

use super::{ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(super) struct ExtractRequest {
    url: String,
}

/// `POST /api/v1/extract`: render the page, then run extraction on it.
pub(super) async fn extract_product(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    payload: Result<Json<ExtractRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<ExtractionReport>>, ApiError> {
    let started = Instant::now();

    let Json(request) = payload.map_err(|rejection| {
        ApiError::new(req_id.0.clone(), "validation_error", rejection.body_text())
    })?;

    let target = validate_target_url(&request.url)
        .map_err(|e| ApiError::new(req_id.0.clone(), "validation_error", e.to_string()))?;

    let page = state
        .renderer
        .render(target.as_str())
        .await
        .map_err(|e| map_render_error(req_id.0.clone(), &e))?;

    let final_url = page.final_url.clone();
    let product = tokio::task::spawn_blocking(move || {
        prodex_extract::extract(&page.html, &page.final_url)
    })
    .await
    .map_err(|e| {
        tracing::error!(error = %e, "extraction task failed");
        ApiError::new(req_id.0.clone(), "internal_error", "extraction failed")
    })?;

    let populated = product.populated_fields();
    let report = ExtractionReport::new(request.url, final_url, product, started.elapsed());

    tracing::info!(
        url = %report.url,
        final_url = %report.final_url,
        success = report.success,
        populated,
        elapsed_ms = report.elapsed_ms,
        "extracted product"
    );

    Ok(Json(ApiResponse {
        data: report,
        meta: ResponseMeta::new(req_id.0),
    }))
}

fn map_render_error(request_id: String, error: &RenderError) -> ApiError {
    if error.is_timeout() {
        tracing::warn!(error = %error, "render timed out");
        ApiError::new(request_id, "render_timeout", error.to_string())
    } else {
        tracing::warn!(error = %error, "render failed");
        ApiError::new(request_id, "render_failed", error.to_string())
    }
}
