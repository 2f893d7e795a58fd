//! The language-model client and builder.

use std::time::Duration;

use reqwest::Client;

use crate::annotate::AnnotateActions;
use crate::error::{Error, Result};
use crate::request::{ChatRequest, ChatResponse};

/// Default base URL for the chat completions API.
const DEFAULT_URL: &str = "https://api.openai.com/v1";

/// Default model used for annotations.
const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Default timeout for requests.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for an OpenAI-compatible chat completions endpoint.
///
/// Every call is a single-shot exchange: one fixed system prompt, one user
/// message, one answer.
///
/// # Example
///
/// ```no_run
/// use frasecard::LlmClient;
///
/// # async fn example() -> frasecard::Result<()> {
/// let client = LlmClient::builder()
///     .api_key(std::env::var("OPENAI_API_KEY").unwrap_or_default())
///     .build();
///
/// let ipa = client.annotate().ipa("gato").await?;
/// println!("{}", ipa);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct LlmClient {
    http_client: Client,
    base_url: String,
    api_key: Option<String>,
    model: String,
}

impl LlmClient {
    /// Create a new client with default settings and no API key.
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Create a builder for custom client configuration.
    pub fn builder() -> LlmClientBuilder {
        LlmClientBuilder::new()
    }

    /// Access the linguistic annotation prompts.
    pub fn annotate(&self) -> AnnotateActions<'_> {
        AnnotateActions { client: self }
    }

    /// The model name sent with each request.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Run one completion and return the trimmed answer text.
    ///
    /// An empty string is a valid answer. A response without any choice is
    /// reported as [`Error::EmptyResponse`].
    pub async fn complete(&self, system: &str, input: &str) -> Result<String> {
        let request = ChatRequest::new(&self.model, system, input);
        let url = format!("{}/chat/completions", self.base_url.trim_end_matches('/'));

        let mut builder = self.http_client.post(url).json(&request);
        if let Some(ref key) = self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(Error::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let parsed: ChatResponse = serde_json::from_str(&body)?;
        let choice = parsed.choices.into_iter().next().ok_or(Error::EmptyResponse)?;

        Ok(choice
            .message
            .content
            .map(|c| c.trim().to_string())
            .unwrap_or_default())
    }
}

impl Default for LlmClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for creating a customized [`LlmClient`].
///
/// # Example
///
/// ```no_run
/// use std::time::Duration;
/// use frasecard::LlmClient;
///
/// let client = LlmClient::builder()
///     .url("http://localhost:11434/v1")
///     .model("llama3")
///     .timeout(Duration::from_secs(60))
///     .build();
/// ```
#[derive(Debug, Clone)]
pub struct LlmClientBuilder {
    base_url: String,
    api_key: Option<String>,
    model: String,
    timeout: Duration,
}

impl LlmClientBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_URL.to_string(),
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Set the API base URL (without the `/chat/completions` suffix).
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the bearer token.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set the model name.
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the request timeout.
    ///
    /// Defaults to 30 seconds.
    pub fn timeout(mut self, duration: Duration) -> Self {
        self.timeout = duration;
        self
    }

    /// Build the client.
    pub fn build(self) -> LlmClient {
        let http_client = Client::builder()
            .timeout(self.timeout)
            .build()
            .expect("Failed to build HTTP client");

        LlmClient {
            http_client,
            base_url: self.base_url,
            api_key: self.api_key,
            model: self.model,
        }
    }
}

impl Default for LlmClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
