use crate::discovery::discover;
use crate::fetch::{BrowserFetcher, HttpFetcher, PageFetcher};
use crate::llm::{LLMProcessor, Summarizer};
use crate::types::{DiscoveryResult, ExtractionOutcome, KeywordTaxonomy, PageSummary, SummaryDocument};
use crate::{Result, ScraperConfig, ScraperError};
use indicatif::ProgressBar;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, instrument, warn};
use url::Url;

/// The `Extractor` runs discovery, fetching and summarization for one company at a time.
///
/// Fetch strategies are tried in order for discovery; the first one that
/// reaches the homepage is used for every page after it. Holds no per-request
/// state, so one instance can serve concurrent extractions; the progress bar
/// is the exception and shows messages from every run sharing it.
pub struct Extractor {
    /// Fetch strategies in order of preference.
    strategies: Vec<Arc<dyn PageFetcher>>,
    summarizer: Arc<dyn Summarizer>,
    keywords: KeywordTaxonomy,
    /// The pause before every page fetch.
    page_delay: Duration,
    progress: ProgressBar,
}

impl Extractor {
    /// Creates a new `Extractor` from explicit strategies and a summarizer.
    ///
    /// # Arguments
    ///
    /// * `strategies` - The fetch strategies, most capable first.
    /// * `summarizer` - The summarizer applied to each page's text.
    pub fn new(strategies: Vec<Arc<dyn PageFetcher>>, summarizer: Arc<dyn Summarizer>) -> Self {
        Self {
            strategies,
            summarizer,
            keywords: KeywordTaxonomy::default(),
            page_delay: crate::DEFAULT_PAGE_DELAY,
            progress: ProgressBar::hidden(),
        }
    }

    /// Wires the browser (when enabled) and HTTP strategies and the LLM summarizer from `config`.
    pub fn from_config(config: &ScraperConfig) -> Result<Self> {
        let mut strategies: Vec<Arc<dyn PageFetcher>> = Vec::new();
        if config.browser.enabled {
            strategies.push(Arc::new(BrowserFetcher::new(config)));
        }
        strategies.push(Arc::new(HttpFetcher::new(config)?));

        let summarizer = Arc::new(LLMProcessor::new(config.llm_config.clone())?);

        Ok(Self::new(strategies, summarizer)
            .with_keywords(config.keywords.clone())
            .with_page_delay(config.rate_limit.page_delay()))
    }

    pub fn with_keywords(mut self, keywords: KeywordTaxonomy) -> Self {
        self.keywords = keywords;
        self
    }

    pub fn with_page_delay(mut self, page_delay: Duration) -> Self {
        self.page_delay = page_delay;
        self
    }

    /// Reports page-by-page progress on `progress`.
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = progress;
        self
    }

    /// Answers an extraction request with either the document or a single error message.
    pub async fn extract_company_info(&self, url: &str) -> ExtractionOutcome {
        if url.trim().is_empty() {
            return ExtractionOutcome::Error {
                error: "Missing URL".to_string(),
            };
        }

        match self.extract(url.trim()).await {
            Ok(document) => ExtractionOutcome::Document(document),
            Err(e) => ExtractionOutcome::Error {
                error: e.to_string(),
            },
        }
    }

    /// Extracts a company profile from its homepage.
    ///
    /// # Returns
    ///
    /// A `SummaryDocument` holding every page that was fetched and summarized,
    /// or a `DiscoveryError` when no strategy could retrieve the homepage.
    #[instrument(skip(self))]
    pub async fn extract(&self, root_url: &str) -> Result<SummaryDocument> {
        let (discovery, fetcher) = self.discover(root_url).await?;
        let total = discovery.pages.len();
        let mut document = SummaryDocument::new(discovery.company);

        for (label, url) in &discovery.pages {
            sleep(self.page_delay).await;
            self.progress.set_message(format!("Summarizing {label}: {url}"));
            info!("Summarizing {}: {}", label, url);

            if let Some(summary) = self.summarize_page(fetcher, url).await {
                document.summaries.insert(label.clone(), summary);
            }
        }

        self.progress.finish_with_message(format!(
            "Completed: {} of {} pages summarized",
            document.summaries.len(),
            total
        ));
        Ok(document)
    }

    /// Runs discovery with each strategy in turn and returns the first success
    /// together with the strategy that produced it.
    async fn discover(&self, root_url: &str) -> Result<(DiscoveryResult, &dyn PageFetcher)> {
        let mut last_error =
            ScraperError::DiscoveryError("No fetch strategy configured".to_string());

        for fetcher in &self.strategies {
            self.progress
                .set_message(format!("Discovering pages via {}...", fetcher.name()));

            match discover(fetcher.as_ref(), root_url, &self.keywords).await {
                Ok(discovery) => {
                    info!(
                        "Discovery via {} found {} pages",
                        fetcher.name(),
                        discovery.pages.len()
                    );
                    return Ok((discovery, fetcher.as_ref()));
                }
                Err(e) => {
                    warn!("Discovery via {} failed: {}", fetcher.name(), e);
                    last_error = e;
                }
            }
        }

        Err(last_error)
    }

    /// Fetches and summarizes one page. Every failure is logged and yields `None`.
    async fn summarize_page(&self, fetcher: &dyn PageFetcher, url: &Url) -> Option<PageSummary> {
        let text = match fetcher.fetch_text(url).await {
            Ok(text) if text.trim().is_empty() => {
                warn!("No text content at {}, skipping", url);
                return None;
            }
            Ok(text) => text,
            Err(e) => {
                warn!("Failed to scrape {}: {}", url, e);
                return None;
            }
        };

        match self.summarizer.summarize(&text).await {
            Ok(summary) => Some(PageSummary {
                url: url.to_string(),
                summary,
            }),
            Err(e) => {
                warn!("Failed to summarize {}: {}", url, e);
                None
            }
        }
    }
}
