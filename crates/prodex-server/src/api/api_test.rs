use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::Request;
use prodex_render::{RenderError, RenderedPage, StaticRenderer};
use tower::ServiceExt;

use super::*;

const WIDGET_PAGE: &str = r#"<html><head>
<script type="application/ld+json">
{"@type":"Product","name":"Widget","image":"/img/widget.jpg",
 "offers":{"price":"19,99","priceCurrency":"EUR"}}
</script></head></html>"#;

/// Renderer that fails every call with a fixed error and counts invocations.
struct FailingRenderer {
    calls: Arc<AtomicUsize>,
    timeout: bool,
}

#[async_trait]
impl Renderer for FailingRenderer {
    async fn render(&self, url: &str) -> Result<RenderedPage, RenderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.timeout {
            Err(RenderError::Timeout {
                url: url.to_owned(),
                timeout_secs: 30,
            })
        } else {
            Err(RenderError::UnexpectedStatus {
                status: 503,
                url: url.to_owned(),
            })
        }
    }
}

fn open_auth() -> AuthState {
    AuthState::from_keys(&[], true).expect("auth")
}

fn app_with(renderer: Arc<dyn Renderer>, auth: AuthState) -> Router {
    build_app(
        AppState { renderer },
        auth,
        RateLimitState::new(100, Duration::from_secs(60)),
    )
}

fn static_app(html: &str) -> Router {
    app_with(
        Arc::new(StaticRenderer::new(html).with_final_url("https://shop.example/p/widget")),
        open_auth(),
    )
}

fn extract_request(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/v1/extract")
        .header("content-type", "application/json")
        .body(Body::from(body.to_owned()))
        .expect("request")
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    serde_json::from_slice(&body).expect("json parse")
}

#[test]
fn api_error_codes_map_to_statuses() {
    let cases = [
        ("validation_error", StatusCode::BAD_REQUEST),
        ("unauthorized", StatusCode::UNAUTHORIZED),
        ("render_failed", StatusCode::BAD_GATEWAY),
        ("render_timeout", StatusCode::GATEWAY_TIMEOUT),
        ("something_else", StatusCode::INTERNAL_SERVER_ERROR),
    ];
    for (code, expected) in cases {
        let response = ApiError::new("req-1", code, "msg").into_response();
        assert_eq!(response.status(), expected, "code {code}");
    }
}

#[tokio::test]
async fn health_is_public_and_echoes_request_id() {
    let auth = AuthState::from_keys(&["secret".to_owned()], false).expect("auth");
    let app = app_with(Arc::new(StaticRenderer::new("")), auth);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/health")
                .header("x-request-id", "req-health")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("x-request-id").map(|v| v.as_bytes()),
        Some(&b"req-health"[..])
    );
    let json = json_body(response).await;
    assert_eq!(json["data"]["status"], "ok");
    assert_eq!(json["meta"]["request_id"], "req-health");
}

#[tokio::test]
async fn extract_returns_product_and_metadata() {
    let response = static_app(WIDGET_PAGE)
        .oneshot(extract_request(r#"{"url":"https://shop.example/p/widget?ref=1"}"#))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    let data = &json["data"];
    assert_eq!(data["url"], "https://shop.example/p/widget?ref=1");
    assert_eq!(data["final_url"], "https://shop.example/p/widget");
    assert_eq!(data["success"], true);
    assert!(data["elapsed_ms"].is_u64());
    assert_eq!(data["product"]["title"], "Widget");
    assert_eq!(
        data["product"]["image_url"],
        "https://shop.example/img/widget.jpg"
    );
    assert_eq!(data["product"]["price"].as_f64(), Some(19.99));
    assert_eq!(data["product"]["currency"], "EUR");
    assert!(json["meta"]["request_id"].is_string());
}

#[tokio::test]
async fn extract_reports_failure_flag_for_empty_page() {
    let response = static_app("<html><body>nothing here</body></html>")
        .oneshot(extract_request(r#"{"url":"https://shop.example/blank"}"#))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["data"]["success"], false);
    assert_eq!(json["data"]["product"]["title"], "");
    assert!(json["data"]["product"]["price"].is_null());
}

#[tokio::test]
async fn extract_rejects_malformed_url_before_rendering() {
    let calls = Arc::new(AtomicUsize::new(0));
    let app = app_with(
        Arc::new(FailingRenderer {
            calls: Arc::clone(&calls),
            timeout: false,
        }),
        open_auth(),
    );

    let response = app
        .oneshot(extract_request(r#"{"url":"not a url"}"#))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = json_body(response).await;
    assert_eq!(json["error"]["code"], "validation_error");
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn extract_rejects_missing_url_field() {
    let response = static_app(WIDGET_PAGE)
        .oneshot(extract_request(r#"{"link":"https://shop.example/"}"#))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = json_body(response).await;
    assert_eq!(json["error"]["code"], "validation_error");
}

#[tokio::test]
async fn extract_maps_render_failure_to_bad_gateway() {
    let calls = Arc::new(AtomicUsize::new(0));
    let app = app_with(
        Arc::new(FailingRenderer {
            calls: Arc::clone(&calls),
            timeout: false,
        }),
        open_auth(),
    );

    let response = app
        .oneshot(extract_request(r#"{"url":"https://shop.example/p/1"}"#))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let json = json_body(response).await;
    assert_eq!(json["error"]["code"], "render_failed");
    assert!(json["error"]["message"]
        .as_str()
        .is_some_and(|m| m.contains("503")));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn extract_maps_render_timeout_to_gateway_timeout() {
    let app = app_with(
        Arc::new(FailingRenderer {
            calls: Arc::new(AtomicUsize::new(0)),
            timeout: true,
        }),
        open_auth(),
    );

    let response = app
        .oneshot(extract_request(r#"{"url":"https://shop.example/p/1"}"#))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::GATEWAY_TIMEOUT);
    let json = json_body(response).await;
    assert_eq!(json["error"]["code"], "render_timeout");
}

#[tokio::test]
async fn extract_requires_bearer_token_when_auth_enabled() {
    let auth = AuthState::from_keys(&["secret".to_owned()], false).expect("auth");
    let app = app_with(Arc::new(StaticRenderer::new(WIDGET_PAGE)), auth);

    let unauthorized = app
        .clone()
        .oneshot(extract_request(r#"{"url":"https://shop.example/p/1"}"#))
        .await
        .expect("response");
    assert_eq!(unauthorized.status(), StatusCode::UNAUTHORIZED);

    let mut request = extract_request(r#"{"url":"https://shop.example/p/1"}"#);
    request.headers_mut().insert(
        header::AUTHORIZATION,
        axum::http::HeaderValue::from_static("Bearer secret"),
    );
    let authorized = app.oneshot(request).await.expect("response");
    assert_eq!(authorized.status(), StatusCode::OK);
}

#[tokio::test]
async fn extract_is_rate_limited() {
    let app = build_app(
        AppState {
            renderer: Arc::new(StaticRenderer::new(WIDGET_PAGE)),
        },
        open_auth(),
        RateLimitState::new(1, Duration::from_secs(60)),
    );

    let first = app
        .clone()
        .oneshot(extract_request(r#"{"url":"https://shop.example/p/1"}"#))
        .await
        .expect("response");
    assert_eq!(first.status(), StatusCode::OK);

    let second = app
        .oneshot(extract_request(r#"{"url":"https://shop.example/p/1"}"#))
        .await
        .expect("response");
    assert_eq!(second.status(), StatusCode::TOO_MANY_REQUESTS);
}
