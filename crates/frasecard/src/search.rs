//! Image search client.

use std::time::Duration;

use reqwest::Client;

use crate::error::{Error, Result};
use crate::request::SearchResponse;

/// Default endpoint of the Custom Search JSON API.
const DEFAULT_URL: &str = "https://www.googleapis.com/customsearch/v1";

/// The search API refuses `num` values above this.
pub const MAX_RESULTS_LIMIT: u8 = 10;

/// Default timeout for requests.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Hosts whose image links rarely load outside their own site.
pub const DEFAULT_DENYLIST: &[&str] = &["instagram.com", "facebook.com", "lookaside", "media_id"];

/// Client for the Custom Search JSON API in image mode.
///
/// # Example
///
/// ```no_run
/// use frasecard::ImageSearchClient;
///
/// # async fn example() -> frasecard::Result<()> {
/// let client = ImageSearchClient::builder()
///     .api_key("key")
///     .engine_id("cx")
///     .max_results(5)
///     .build();
///
/// for url in client.search("black cat").await? {
///     println!("{}", url);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ImageSearchClient {
    http_client: Client,
    base_url: String,
    api_key: Option<String>,
    engine_id: Option<String>,
    max_results: u8,
    denylist: Vec<String>,
}

impl ImageSearchClient {
    /// Create a builder for custom client configuration.
    pub fn builder() -> ImageSearchClientBuilder {
        ImageSearchClientBuilder::new()
    }

    /// Maximum number of links returned per search.
    pub fn max_results(&self) -> u8 {
        self.max_results
    }

    /// Search for images and return their links in ranking order.
    ///
    /// Links containing any denylisted fragment are dropped. A query with no
    /// hits yields an empty list.
    pub async fn search(&self, query: &str) -> Result<Vec<String>> {
        let key = self
            .api_key
            .as_deref()
            .ok_or_else(|| Error::Config("image search API key is not set".to_string()))?;
        let cx = self
            .engine_id
            .as_deref()
            .ok_or_else(|| Error::Config("image search engine id is not set".to_string()))?;
        let num = self.max_results.to_string();

        let response = self
            .http_client
            .get(&self.base_url)
            .query(&[
                ("q", query),
                ("key", key),
                ("cx", cx),
                ("searchType", "image"),
                ("num", num.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(Error::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let parsed: SearchResponse = serde_json::from_str(&body)?;
        Ok(parsed
            .items
            .into_iter()
            .map(|item| item.link)
            .filter(|link| self.is_allowed(link))
            .take(self.max_results as usize)
            .collect())
    }

    /// Whether a link passes the denylist.
    pub fn is_allowed(&self, link: &str) -> bool {
        !self.denylist.iter().any(|fragment| link.contains(fragment.as_str()))
    }
}

/// Builder for creating a customized [`ImageSearchClient`].
#[derive(Debug, Clone)]
pub struct ImageSearchClientBuilder {
    base_url: String,
    api_key: Option<String>,
    engine_id: Option<String>,
    max_results: u8,
    denylist: Vec<String>,
    timeout: Duration,
}

impl ImageSearchClientBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_URL.to_string(),
            api_key: None,
            engine_id: None,
            max_results: MAX_RESULTS_LIMIT,
            denylist: DEFAULT_DENYLIST.iter().map(|s| s.to_string()).collect(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Set the endpoint URL.
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the API key.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set the search engine id (`cx`).
    pub fn engine_id(mut self, id: impl Into<String>) -> Self {
        self.engine_id = Some(id.into());
        self
    }

    /// Set the number of results, clamped to `1..=10`.
    pub fn max_results(mut self, n: u8) -> Self {
        self.max_results = n.clamp(1, MAX_RESULTS_LIMIT);
        self
    }

    /// Replace the host denylist.
    pub fn denylist<I, S>(mut self, fragments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.denylist = fragments.into_iter().map(Into::into).collect();
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, duration: Duration) -> Self {
        self.timeout = duration;
        self
    }

    /// Build the client.
    pub fn build(self) -> ImageSearchClient {
        let http_client = Client::builder()
            .timeout(self.timeout)
            .build()
            .expect("Failed to build HTTP client");

        ImageSearchClient {
            http_client,
            base_url: self.base_url,
            api_key: self.api_key,
            engine_id: self.engine_id,
            max_results: self.max_results,
            denylist: self.denylist,
        }
    }
}

impl Default for ImageSearchClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
