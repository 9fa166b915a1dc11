use super::PageFetcher;
use crate::{Result, ScraperConfig, ScraperError};
use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, instrument};
use url::Url;

/// The lightweight strategy: one plain GET per page with browser-like headers.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    /// The HTTP client used for making requests.
    client: Client,
}

impl HttpFetcher {
    /// Creates a new `HttpFetcher` with the given configuration.
    ///
    /// # Arguments
    ///
    /// * `config` - The configuration settings for the scraper.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `HttpFetcher` instance, or an error if the client could not be created.
    pub fn new(config: &ScraperConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout())
            .gzip(true)
            .build()
            .map_err(ScraperError::RequestError)?;

        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    fn name(&self) -> &'static str {
        "http"
    }

    #[instrument(skip_all, fields(url = %url))]
    async fn fetch_html(&self, url: &Url) -> Result<String> {
        let response = self
            .client
            .get(url.clone())
            .header("Accept", "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8")
            .header("Accept-Language", "en-US,en;q=0.5")
            .header("Connection", "keep-alive")
            .header("Upgrade-Insecure-Requests", "1")
            .header("Sec-Fetch-Dest", "document")
            .header("Sec-Fetch-Mode", "navigate")
            .header("Sec-Fetch-Site", "none")
            .header("Sec-Fetch-User", "?1")
            .send()
            .await?
            .error_for_status()?;

        debug!("Response status: {}", response.status());

        Ok(response.text().await?)
    }
}
