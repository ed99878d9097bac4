use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid target URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("rate limited by {domain} (retry after {retry_after_secs}s)")]
    RateLimited {
        domain: String,
        retry_after_secs: u64,
    },

    #[error("page not found: {url}")]
    NotFound { url: String },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("timed out after {timeout_secs}s fetching {url}")]
    Timeout { url: String, timeout_secs: u64 },
}

impl RenderError {
    /// `true` when the page never arrived because the per-request deadline passed.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        match self {
            RenderError::Timeout { .. } => true,
            RenderError::Http(e) => e.is_timeout(),
            _ => false,
        }
    }
}
