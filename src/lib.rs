use std::time::Duration;
use thiserror::Error;

pub mod config;
pub mod discovery;
pub mod extract;
pub mod fetch;
pub mod llm;
pub mod pipeline;
pub mod prompt;
pub mod report;
pub mod types;

// Re-export commonly used types
pub use config::ScraperConfig;
pub use fetch::{BrowserFetcher, HttpFetcher, PageFetcher};
pub use llm::{LLMProcessor, Summarizer};
pub use pipeline::Extractor;
pub use types::{DiscoveryResult, ExtractionOutcome, KeywordTaxonomy, PageSummary, SummaryDocument};

/// The `ScraperError` enum represents various errors that can occur while extracting a company profile.
#[derive(Error, Debug)]
pub enum ScraperError {
    /// Represents an error that occurs during an HTTP request.
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),
    /// Represents a WebDriver session or navigation failure.
    #[error("Browser automation failed: {0}")]
    BrowserError(String),
    /// Represents an error that occurs during content extraction.
    #[error("Content extraction failed: {0}")]
    ExtractionError(String),
    /// The homepage could not be retrieved. Fatal for an extraction request.
    #[error("{0}")]
    DiscoveryError(String),
    /// Represents an error that occurs during LLM processing.
    #[error("LLM processing failed: {0}")]
    LLMError(String),
    /// Represents an invalid or unreadable configuration.
    #[error("Configuration error: {0}")]
    ConfigError(#[from] ::config::ConfigError),
    /// Represents a failure reading or writing a report file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Represents a document that could not be encoded or decoded as JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A type alias for `Result` with the `ScraperError` error type.
pub type Result<T> = std::result::Result<T, ScraperError>;

// Constants

/// The default timeout duration for HTTP requests.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
/// The default pause before each discovered page is fetched.
pub const DEFAULT_PAGE_DELAY: Duration = Duration::from_millis(2000);
/// The default time a rendered page is given to run its scripts.
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_millis(3000);
/// The number of characters of page text sent to the completion service.
pub const DEFAULT_TEXT_BUDGET: usize = 4000;
/// The browser user agent presented by both fetch strategies.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/122.0.0.0 Safari/537.36";
