//! Page rendering for the extraction pipeline.
//!
//! A [`Renderer`] turns a product-page URL into final HTML plus the URL it
//! was ultimately served from. [`HttpRenderer`] fetches over HTTP with
//! redirect following and retry/backoff; [`StaticRenderer`] serves a fixed
//! document.

pub mod error;
pub mod http;
pub mod renderer;
mod retry;
pub mod target;

pub use error::RenderError;
pub use http::{HttpRenderer, RenderSettings};
pub use renderer::{RenderedPage, Renderer, StaticRenderer};
pub use target::{extract_domain, validate_target_url};
