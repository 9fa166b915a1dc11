use crate::config::LLMConfig;
use crate::prompt::PromptBuilder;
use crate::{Result, ScraperError};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use url::Url;

/// The hosted service that rejects every request without a bearer token.
const OPENAI_HOST: &str = "api.openai.com";

/// Turns page text into a summary.
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, text: &str) -> Result<String>;
}

// --- OpenAI-compatible request and response structures ---

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: Vec<Message>,
    temperature: f32,
    max_tokens: u32,
    stream: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
struct Message {
    #[serde(default)]
    role: String,
    content: String,
}

#[derive(Deserialize, Debug)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize, Debug)]
struct Choice {
    message: Message,
}

/// The `LLMProcessor` struct sends prompts to a chat-completions endpoint.
#[derive(Debug, Clone)]
pub struct LLMProcessor {
    client: Client,
    config: LLMConfig,
    prompt: PromptBuilder,
}

impl LLMProcessor {
    /// Creates a new `LLMProcessor` with the given configuration.
    ///
    /// # Arguments
    ///
    /// * `config` - The configuration settings for the LLM.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `LLMProcessor`, or an error if the HTTP client could not be built
    /// or the OpenAI endpoint is configured without an API key.
    pub fn new(config: LLMConfig) -> Result<Self> {
        let host = Url::parse(&config.endpoint)
            .ok()
            .and_then(|url| url.host_str().map(str::to_string));
        if config.api_key.is_none() && host.as_deref() == Some(OPENAI_HOST) {
            return Err(ScraperError::LLMError(
                "no API key configured for api.openai.com; set OPENAI_API_KEY or llm_config.api_key"
                    .to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(ScraperError::RequestError)?;
        let prompt = PromptBuilder::default().with_budget(config.text_budget);

        Ok(Self {
            client,
            config,
            prompt,
        })
    }

    /// Sends a single prompt and returns the generated text.
    ///
    /// # Arguments
    ///
    /// * `prompt` - The complete prompt.
    ///
    /// # Returns
    ///
    /// A `Result` containing the completion text, or an `LLMError` if the service fails or answers with nothing.
    #[instrument(skip_all, fields(model = %self.config.model, prompt_length = prompt.len()))]
    pub async fn process(&self, prompt: &str) -> Result<String> {
        let body = CompletionRequest {
            model: &self.config.model,
            messages: vec![Message {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
            stream: false,
        };

        let mut request = self.client.post(&self.config.endpoint).json(&body);
        if let Some(key) = &self.config.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        let status = response.status();
        debug!("Completion status: {}", status);

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(ScraperError::LLMError(format!(
                "service returned {status}: {error_text}"
            )));
        }

        let completion: CompletionResponse = response
            .json()
            .await
            .map_err(|e| ScraperError::LLMError(format!("malformed response: {e}")))?;

        let text = completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content.trim().to_string())
            .ok_or_else(|| ScraperError::LLMError("response has no choices".to_string()))?;

        if text.is_empty() {
            return Err(ScraperError::LLMError("empty completion".to_string()));
        }
        Ok(text)
    }
}

#[async_trait]
impl Summarizer for LLMProcessor {
    async fn summarize(&self, text: &str) -> Result<String> {
        self.process(&self.prompt.build(text)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ScraperConfig;
    use mockito::Matcher;
    use serde_json::json;

    fn processor(endpoint: String) -> LLMProcessor {
        let mut config = ScraperConfig::default().llm_config;
        config.endpoint = endpoint;
        config.api_key = Some("test-key".to_string());
        LLMProcessor::new(config).unwrap()
    }

    #[tokio::test]
    async fn test_summarize_sends_deterministic_request() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/chat/completions")
            .match_header("authorization", "Bearer test-key")
            .match_body(Matcher::AllOf(vec![
                Matcher::PartialJson(json!({
                    "model": "gpt-4",
                    "temperature": 0.0,
                    "stream": false,
                })),
                Matcher::Regex("Acme builds rockets".to_string()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "choices": [{ "message": { "role": "assistant", "content": "  Acme makes rockets.\n" } }]
                })
                .to_string(),
            )
            .create_async()
            .await;

        let summary = processor(format!("{}/v1/chat/completions", server.url()))
            .summarize("Acme builds rockets")
            .await
            .unwrap();

        assert_eq!(summary, "Acme makes rockets.");
        mock.assert_async().await;
    }

    #[test]
    fn test_openai_endpoint_requires_a_key() {
        let mut config = ScraperConfig::default().llm_config;
        config.api_key = None;

        match LLMProcessor::new(config) {
            Err(ScraperError::LLMError(message)) => assert!(message.contains("OPENAI_API_KEY")),
            other => panic!("expected a missing key error, got {other:?}"),
        }
    }

    #[test]
    fn test_self_hosted_endpoint_works_without_a_key() {
        let mut config = ScraperConfig::default().llm_config;
        config.api_key = None;
        config.endpoint = "http://localhost:11434/v1/chat/completions".to_string();

        assert!(LLMProcessor::new(config).is_ok());
    }

    #[tokio::test]
    async fn test_text_past_the_budget_never_reaches_the_service() {
        let shared = "Acme builds rockets. ".repeat(200);
        let prefix: String = shared.chars().take(crate::DEFAULT_TEXT_BUDGET).collect();
        let expected_prompt = PromptBuilder::default().build(&prefix);

        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/chat/completions")
            .match_body(Matcher::PartialJson(json!({
                "messages": [{ "role": "user", "content": expected_prompt }],
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(json!({ "choices": [{ "message": { "content": "Rockets." } }] }).to_string())
            .expect(2)
            .create_async()
            .await;

        let processor = processor(format!("{}/v1/chat/completions", server.url()));
        processor
            .summarize(&format!("{shared}Tail about a merger."))
            .await
            .unwrap();
        processor
            .summarize(&format!("{shared}A different tail about layoffs."))
            .await
            .unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_service_error_is_reported() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/v1/chat/completions")
            .with_status(500)
            .with_body("overloaded")
            .create_async()
            .await;

        let result = processor(format!("{}/v1/chat/completions", server.url()))
            .summarize("text")
            .await;

        match result {
            Err(ScraperError::LLMError(message)) => assert!(message.contains("overloaded")),
            other => panic!("expected an LLM error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_malformed_response_is_reported() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/v1/chat/completions")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"choices": []}"#)
            .create_async()
            .await;

        let result = processor(format!("{}/v1/chat/completions", server.url()))
            .summarize("text")
            .await;

        assert!(matches!(result, Err(ScraperError::LLMError(_))));
    }
}
