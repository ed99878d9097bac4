//! [`Renderer`] backed by a plain HTTP GET.
//!
//! Serves server-rendered storefronts. Pages that only assemble their product
//! data in client-side JavaScript come back without it; extraction then falls
//! back to whatever metadata the initial document carries.

use std::time::Duration;

use async_trait::async_trait;
use prodex_core::AppConfig;
use reqwest::{redirect, Client, StatusCode};

use crate::error::RenderError;
use crate::renderer::{RenderedPage, Renderer};
use crate::retry::retry_with_backoff;
use crate::target::{extract_domain, validate_target_url};

const CONNECT_TIMEOUT_SECS: u64 = 10;
const MAX_REDIRECTS: usize = 10;
/// Used when a 429 carries no parseable `Retry-After`.
const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

/// Fetch policy for [`HttpRenderer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderSettings {
    pub timeout_secs: u64,
    pub user_agent: String,
    /// Additional attempts after the first failure for retriable errors.
    pub max_retries: u32,
    /// Base delay for exponential backoff: `backoff_base_ms * 2^(n-1)`.
    pub backoff_base_ms: u64,
}

impl RenderSettings {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            timeout_secs: config.render_timeout_secs,
            user_agent: config.render_user_agent.clone(),
            max_retries: config.render_max_retries,
            backoff_base_ms: config.render_backoff_base_ms,
        }
    }
}

pub struct HttpRenderer {
    client: Client,
    settings: RenderSettings,
}

impl HttpRenderer {
    /// Builds the underlying `reqwest::Client` with the configured timeout,
    /// `User-Agent` and redirect policy.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Http`] if the client cannot be constructed
    /// (e.g., invalid TLS config).
    pub fn new(settings: RenderSettings) -> Result<Self, RenderError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .user_agent(&settings.user_agent)
            .redirect(redirect::Policy::limited(MAX_REDIRECTS))
            .build()?;
        Ok(Self { client, settings })
    }

    #[must_use]
    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    async fn fetch_once(&self, url: &str) -> Result<RenderedPage, RenderError> {
        let response = self
            .client
            .get(url)
            .header(
                reqwest::header::ACCEPT,
                "text/html,application/xhtml+xml;q=0.9,*/*;q=0.8",
            )
            .header(reqwest::header::ACCEPT_LANGUAGE, "en-US,en;q=0.9")
            .send()
            .await
            .map_err(|e| self.classify(url, e))?;

        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after_secs = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.trim().parse::<u64>().ok())
                .unwrap_or(DEFAULT_RETRY_AFTER_SECS);
            return Err(RenderError::RateLimited {
                domain: extract_domain(url),
                retry_after_secs,
            });
        }

        if status == StatusCode::NOT_FOUND {
            return Err(RenderError::NotFound {
                url: url.to_owned(),
            });
        }

        if !status.is_success() {
            return Err(RenderError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_owned(),
            });
        }

        let final_url = response.url().to_string();
        let html = response.text().await.map_err(|e| self.classify(url, e))?;

        Ok(RenderedPage {
            html,
            final_url,
            status: status.as_u16(),
        })
    }

    fn classify(&self, url: &str, error: reqwest::Error) -> RenderError {
        if error.is_timeout() {
            RenderError::Timeout {
                url: url.to_owned(),
                timeout_secs: self.settings.timeout_secs,
            }
        } else {
            RenderError::Http(error)
        }
    }
}

#[async_trait]
impl Renderer for HttpRenderer {
    async fn render(&self, url: &str) -> Result<RenderedPage, RenderError> {
        let target = validate_target_url(url)?;
        let target = target.as_str();

        let page = retry_with_backoff(
            self.settings.max_retries,
            self.settings.backoff_base_ms,
            || self.fetch_once(target),
        )
        .await?;

        tracing::info!(
            url = target,
            final_url = %page.final_url,
            status = page.status,
            bytes = page.html.len(),
            "rendered page"
        );
        Ok(page)
    }
}
