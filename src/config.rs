use crate::types::KeywordTaxonomy;
use crate::Result;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// The `ScraperConfig` struct holds the configuration settings for an extraction run.
/// It includes the HTTP client settings, pacing, browser automation, LLM configuration and keyword taxonomy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScraperConfig {
    /// The timeout for plain HTTP requests, in seconds.
    pub timeout_secs: u64,
    /// The user agent string presented to target sites.
    pub user_agent: String,
    /// The pacing applied between page fetches.
    pub rate_limit: RateLimit,
    /// The headless browser settings for the rendering strategy.
    pub browser: BrowserConfig,
    /// The configuration settings for the Language Model (LLM).
    pub llm_config: LLMConfig,
    /// The topic labels used to pick pages.
    pub keywords: KeywordTaxonomy,
}

/// The `RateLimit` struct holds the pacing applied before every page fetch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimit {
    /// The pause before each discovered page is fetched, in milliseconds.
    pub page_delay_ms: u64,
}

/// The `BrowserConfig` struct holds the WebDriver settings for the rendering strategy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserConfig {
    /// Whether to try the rendering strategy before plain HTTP.
    pub enabled: bool,
    /// The WebDriver endpoint, e.g. a local chromedriver.
    pub webdriver_url: String,
    pub headless: bool,
    pub window_width: u32,
    pub window_height: u32,
    /// How long to wait for the document body to appear, in seconds.
    pub load_timeout_secs: u64,
    /// How long to let client-side scripts run after the body appears, in milliseconds.
    pub settle_ms: u64,
}

/// The `LLMConfig` struct holds the configuration settings for the Language Model (LLM).
/// It includes the endpoint URL, model, temperature, and maximum number of tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LLMConfig {
    /// The chat-completions endpoint URL.
    pub endpoint: String,
    pub model: String,
    /// The bearer token; falls back to `OPENAI_API_KEY` when loading.
    pub api_key: Option<String>,
    /// The temperature setting for the LLM. Zero keeps summaries repeatable.
    pub temperature: f32,
    /// The maximum number of tokens allowed in the LLM response.
    pub max_tokens: u32,
    /// The timeout for one completion call, in seconds.
    pub timeout_secs: u64,
    /// The number of characters of page text submitted for summarization.
    pub text_budget: usize,
}

impl Default for ScraperConfig {
    /// Provides default values for the `ScraperConfig` struct.
    ///
    /// # Returns
    ///
    /// A `ScraperConfig` instance with default settings.
    fn default() -> Self {
        Self {
            timeout_secs: crate::DEFAULT_TIMEOUT.as_secs(),
            user_agent: String::from(crate::DEFAULT_USER_AGENT),
            rate_limit: RateLimit {
                page_delay_ms: crate::DEFAULT_PAGE_DELAY.as_millis() as u64,
            },
            browser: BrowserConfig {
                enabled: true,
                webdriver_url: String::from("http://localhost:9515"),
                headless: true,
                window_width: 1920,
                window_height: 1080,
                load_timeout_secs: crate::DEFAULT_TIMEOUT.as_secs(),
                settle_ms: crate::DEFAULT_SETTLE_DELAY.as_millis() as u64,
            },
            llm_config: LLMConfig {
                endpoint: String::from("https://api.openai.com/v1/chat/completions"),
                model: String::from("gpt-4"),
                api_key: None,
                temperature: 0.0,
                max_tokens: 1024,
                timeout_secs: 60,
                text_budget: crate::DEFAULT_TEXT_BUDGET,
            },
            keywords: KeywordTaxonomy::default(),
        }
    }
}

impl ScraperConfig {
    /// Loads the configuration from the defaults, an optional file and the environment.
    ///
    /// Environment variables use the `SITEBRIEF_` prefix and `__` for nesting,
    /// e.g. `SITEBRIEF_LLM_CONFIG__MODEL=gpt-4o`. When no API key is configured,
    /// `OPENAI_API_KEY` is used.
    ///
    /// # Arguments
    ///
    /// * `path` - An optional TOML/YAML/JSON file; the format is inferred from the suffix.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder().add_source(Config::try_from(&Self::default())?);

        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(true));
        }

        let mut config: Self = builder
            .add_source(
                Environment::with_prefix("SITEBRIEF")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        if config.llm_config.api_key.is_none() {
            config.llm_config.api_key = std::env::var("OPENAI_API_KEY")
                .ok()
                .filter(|key| !key.trim().is_empty());
        }

        Ok(config)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl RateLimit {
    pub fn page_delay(&self) -> Duration {
        Duration::from_millis(self.page_delay_ms)
    }
}

impl BrowserConfig {
    pub fn load_timeout(&self) -> Duration {
        Duration::from_secs(self.load_timeout_secs)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }
}

impl LLMConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = ScraperConfig::default();

        assert_eq!(config.timeout(), Duration::from_secs(10));
        assert_eq!(config.rate_limit.page_delay(), Duration::from_secs(2));
        assert_eq!(config.llm_config.temperature, 0.0);
        assert_eq!(config.llm_config.text_budget, 4000);
        assert!(config.browser.enabled);
        assert_eq!(config.keywords.len(), 18);
    }

    #[test]
    fn test_load_merges_file_over_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
keywords = ["about", "careers"]

[rate_limit]
page_delay_ms = 0

[browser]
enabled = false

[llm_config]
model = "gpt-4o-mini"
"#
        )
        .unwrap();

        let config = ScraperConfig::load(Some(file.path())).unwrap();

        assert_eq!(config.rate_limit.page_delay(), Duration::ZERO);
        assert!(!config.browser.enabled);
        assert_eq!(config.browser.webdriver_url, "http://localhost:9515");
        assert_eq!(config.llm_config.model, "gpt-4o-mini");
        assert_eq!(config.llm_config.max_tokens, 1024);
        assert_eq!(config.keywords, KeywordTaxonomy::new(["about", "careers"]));
    }

    #[test]
    fn test_load_missing_file_fails() {
        let result = ScraperConfig::load(Some(Path::new("/nonexistent/sitebrief.toml")));
        assert!(matches!(result, Err(crate::ScraperError::ConfigError(_))));
    }
}
