//! Page retrieval strategies.
//!
//! Both strategies satisfy [`PageFetcher`]; the pipeline holds them as values
//! and tries them in order.

mod browser;
mod http;

pub use browser::BrowserFetcher;
pub use http::HttpFetcher;

use crate::{extract, Result};
use async_trait::async_trait;
use url::Url;

/// A way of obtaining a page's markup and visible text.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// A short name for logs, e.g. `http` or `browser`.
    fn name(&self) -> &'static str;

    /// Retrieves the page markup.
    async fn fetch_html(&self, url: &Url) -> Result<String>;

    /// Retrieves the page and flattens it to visible text.
    ///
    /// An empty string means the page loaded but had no visible text.
    async fn fetch_text(&self, url: &Url) -> Result<String> {
        let html = self.fetch_html(url).await?;
        Ok(extract::visible_text(&html))
    }
}
