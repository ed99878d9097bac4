//! The page-rendering seam.
//!
//! Extraction only needs final HTML and the URL it was served from. How that
//! HTML is obtained (plain HTTP, a headless browser, a fixture) sits behind
//! [`Renderer`].

use async_trait::async_trait;

use crate::error::RenderError;

/// A fetched page, ready for extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPage {
    pub html: String,
    /// URL after redirects; use it as the base for relative references.
    pub final_url: String,
    pub status: u16,
}

#[async_trait]
pub trait Renderer: Send + Sync {
    /// Produces the final HTML for `url`.
    ///
    /// # Errors
    ///
    /// Returns a [`RenderError`] when no usable page could be obtained.
    async fn render(&self, url: &str) -> Result<RenderedPage, RenderError>;
}

/// Serves a fixed document for every URL.
///
/// Useful in tests and for piping already-downloaded HTML through the same
/// code path as live fetches.
#[derive(Debug, Clone)]
pub struct StaticRenderer {
    html: String,
    final_url: Option<String>,
}

impl StaticRenderer {
    #[must_use]
    pub fn new(html: impl Into<String>) -> Self {
        Self {
            html: html.into(),
            final_url: None,
        }
    }

    /// Reports `final_url` instead of echoing the requested URL.
    #[must_use]
    pub fn with_final_url(mut self, final_url: impl Into<String>) -> Self {
        self.final_url = Some(final_url.into());
        self
    }
}

#[async_trait]
impl Renderer for StaticRenderer {
    async fn render(&self, url: &str) -> Result<RenderedPage, RenderError> {
        Ok(RenderedPage {
            html: self.html.clone(),
            final_url: self.final_url.clone().unwrap_or_else(|| url.to_owned()),
            status: 200,
        })
    }
}
