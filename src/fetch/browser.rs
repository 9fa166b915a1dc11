use super::PageFetcher;
use crate::{Result, ScraperConfig, ScraperError};
use async_trait::async_trait;
use fantoccini::wd::Capabilities;
use fantoccini::{Client, ClientBuilder, Locator};
use serde_json::json;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, instrument, warn};
use url::Url;

/// Evasion applied once the page has loaded.
const HIDE_WEBDRIVER: &str =
    "Object.defineProperty(navigator, 'webdriver', { get: () => undefined });";

/// The rendering strategy: drives a WebDriver browser so client-side scripts run.
///
/// Each fetch opens its own session and closes it before returning, whatever
/// the outcome.
#[derive(Debug, Clone)]
pub struct BrowserFetcher {
    webdriver_url: String,
    headless: bool,
    window: (u32, u32),
    user_agent: String,
    load_timeout: Duration,
    settle_delay: Duration,
}

impl BrowserFetcher {
    pub fn new(config: &ScraperConfig) -> Self {
        let browser = &config.browser;
        Self {
            webdriver_url: browser.webdriver_url.clone(),
            headless: browser.headless,
            window: (browser.window_width, browser.window_height),
            user_agent: config.user_agent.clone(),
            load_timeout: browser.load_timeout(),
            settle_delay: browser.settle_delay(),
        }
    }

    /// Chrome options that suppress the usual automation fingerprints.
    fn capabilities(&self) -> Capabilities {
        let mut args = vec![
            "--disable-blink-features=AutomationControlled".to_string(),
            "--disable-extensions".to_string(),
            "--disable-infobars".to_string(),
            "--disable-dev-shm-usage".to_string(),
            "--no-sandbox".to_string(),
            format!("--window-size={},{}", self.window.0, self.window.1),
            format!("--user-agent={}", self.user_agent),
        ];
        if self.headless {
            args.push("--headless=new".to_string());
            args.push("--disable-gpu".to_string());
        }

        let mut caps = Capabilities::new();
        caps.insert(
            "goog:chromeOptions".to_string(),
            json!({
                "args": args,
                "excludeSwitches": ["enable-automation"],
                "useAutomationExtension": false,
            }),
        );
        caps
    }

    async fn connect(&self) -> Result<Client> {
        ClientBuilder::native()
            .capabilities(self.capabilities())
            .connect(&self.webdriver_url)
            .await
            .map_err(|e| {
                ScraperError::BrowserError(format!(
                    "no WebDriver session at {}: {e}",
                    self.webdriver_url
                ))
            })
    }

    async fn render(&self, client: &Client, url: &Url) -> Result<String> {
        client.goto(url.as_str()).await.map_err(browser_error)?;
        client
            .execute(HIDE_WEBDRIVER, vec![])
            .await
            .map_err(browser_error)?;
        client
            .wait()
            .at_most(self.load_timeout)
            .for_element(Locator::Css("body"))
            .await
            .map_err(browser_error)?;

        // Give client-side rendering a moment to fill the body.
        sleep(self.settle_delay).await;

        client.source().await.map_err(browser_error)
    }
}

fn browser_error(e: fantoccini::error::CmdError) -> ScraperError {
    ScraperError::BrowserError(e.to_string())
}

#[async_trait]
impl PageFetcher for BrowserFetcher {
    fn name(&self) -> &'static str {
        "browser"
    }

    #[instrument(skip_all, fields(url = %url))]
    async fn fetch_html(&self, url: &Url) -> Result<String> {
        let client = self.connect().await?;
        let result = self.render(&client, url).await;

        if let Err(e) = client.close().await {
            warn!("Failed to close browser session: {}", e);
        }

        if let Ok(html) = &result {
            debug!("Rendered {} bytes of markup", html.len());
        }
        result
    }
}
