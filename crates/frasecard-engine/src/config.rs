//! Configuration.
//!
//! Settings come from an optional TOML file; every key has a default, so an
//! empty or missing file is valid. API credentials are read from the
//! environment only.
//!
//! ```toml
//! [llm]
//! base_url = "https://api.openai.com/v1"
//! model = "gpt-4o-mini"
//! timeout_secs = 30
//!
//! [images]
//! base_url = "https://www.googleapis.com/customsearch/v1"
//! max_results = 10
//! denylist = ["instagram.com", "facebook.com", "lookaside", "media_id"]
//!
//! [deck]
//! name = "Exported Spanish Deck"
//!
//! [media]
//! dir = "media"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use frasecard::{DEFAULT_DENYLIST, ImageSearchClient, LlmClient, MAX_RESULTS_LIMIT};
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::export::{DEFAULT_DECK_NAME, DeckExporter};
use crate::media::MediaStore;
use crate::provider::WebImageProvider;

/// File looked up in the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "frasecard.toml";

/// Environment variable holding the language-model API key.
pub const OPENAI_API_KEY: &str = "OPENAI_API_KEY";
/// Environment variable holding the image search API key.
pub const GOOGLE_API_KEY: &str = "GOOGLE_API_KEY";
/// Environment variable holding the search engine id.
pub const GOOGLE_CSE_ID: &str = "GOOGLE_CSE_ID";

/// All settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Language-model backend.
    pub llm: LlmConfig,
    /// Image search backend.
    pub images: ImageConfig,
    /// Exported deck.
    pub deck: DeckConfig,
    /// Uploaded media.
    pub media: MediaConfig,
}

/// `[llm]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LlmConfig {
    /// API root, without `/chat/completions`.
    pub base_url: String,
    /// Model name.
    pub model: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            timeout_secs: 30,
        }
    }
}

/// `[images]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImageConfig {
    /// Search endpoint.
    pub base_url: String,
    /// Results per search, clamped to `1..=10`.
    pub max_results: u8,
    /// Link substrings to drop from results.
    pub denylist: Vec<String>,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.googleapis.com/customsearch/v1".to_string(),
            max_results: MAX_RESULTS_LIMIT,
            denylist: DEFAULT_DENYLIST.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// `[deck]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DeckConfig {
    /// Deck name inside the package.
    pub name: String,
}

impl Default for DeckConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_DECK_NAME.to_string(),
        }
    }
}

/// `[media]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MediaConfig {
    /// Root directory for uploads.
    pub dir: PathBuf,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("media"),
        }
    }
}

impl Config {
    /// Parse a TOML string.
    pub fn parse(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Read a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Load `path` if given, else [`DEFAULT_CONFIG_FILE`] if it exists,
    /// else defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None if Path::new(DEFAULT_CONFIG_FILE).is_file() => {
                Self::from_file(DEFAULT_CONFIG_FILE)
            }
            None => Ok(Self::default()),
        }
    }

    /// Check values a default can't fix.
    pub fn validate(&self) -> Result<()> {
        if self.llm.model.trim().is_empty() {
            return Err(Error::Config("llm.model must not be empty".to_string()));
        }
        if self.llm.timeout_secs == 0 {
            return Err(Error::Config("llm.timeout_secs must be positive".to_string()));
        }
        if self.deck.name.trim().is_empty() {
            return Err(Error::Config("deck.name must not be empty".to_string()));
        }
        Ok(())
    }

    /// Language-model client for these settings.
    pub fn llm_client(&self, credentials: &Credentials) -> LlmClient {
        LlmClient::builder()
            .url(&self.llm.base_url)
            .api_key(&credentials.openai_api_key)
            .model(&self.llm.model)
            .timeout(Duration::from_secs(self.llm.timeout_secs))
            .build()
    }

    /// Image search client for these settings.
    pub fn image_search_client(&self, credentials: &Credentials) -> ImageSearchClient {
        ImageSearchClient::builder()
            .url(&self.images.base_url)
            .api_key(&credentials.google_api_key)
            .engine_id(&credentials.google_cse_id)
            .max_results(self.images.max_results)
            .denylist(self.images.denylist.iter().cloned())
            .build()
    }

    /// Image provider combining both clients.
    pub fn image_provider(&self, credentials: &Credentials) -> WebImageProvider {
        WebImageProvider::new(
            self.llm_client(credentials),
            self.image_search_client(credentials),
        )
    }

    /// Media store rooted at `[media] dir`.
    pub fn media_store(&self) -> MediaStore {
        MediaStore::new(&self.media.dir)
    }

    /// Exporter for `[deck] name`.
    pub fn deck_exporter(&self) -> DeckExporter {
        DeckExporter::new(&self.deck.name)
    }
}

/// API credentials.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Language-model key.
    pub openai_api_key: String,
    /// Image search key.
    pub google_api_key: String,
    /// Image search engine id.
    pub google_cse_id: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("openai_api_key", &"<redacted>")
            .field("google_api_key", &"<redacted>")
            .field("google_cse_id", &self.google_cse_id)
            .finish()
    }
}

impl Credentials {
    /// Read all three variables from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read credentials through `lookup`. Missing or blank values are
    /// reported together.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut missing = Vec::new();
        let mut get = |name: &'static str| match lookup(name) {
            Some(v) if !v.trim().is_empty() => v.trim().to_string(),
            _ => {
                missing.push(name);
                String::new()
            }
        };

        let credentials = Self {
            openai_api_key: get(OPENAI_API_KEY),
            google_api_key: get(GOOGLE_API_KEY),
            google_cse_id: get(GOOGLE_CSE_ID),
        };

        if missing.is_empty() {
            Ok(credentials)
        } else {
            Err(Error::Config(format!(
                "missing environment variable(s): {}",
                missing.join(", ")
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_empty_file_gives_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.deck.name, "Exported Spanish Deck");
        assert_eq!(config.images.max_results, 10);
        assert_eq!(config.media.dir, PathBuf::from("media"));
    }

    #[test]
    fn test_partial_sections() {
        let config = Config::parse(
            r#"
[llm]
model = "gpt-4o"

[images]
max_results = 5
denylist = ["pinterest"]

[deck]
name = "Mis frases"
"#,
        )
        .unwrap();

        assert_eq!(config.llm.model, "gpt-4o");
        assert_eq!(config.llm.timeout_secs, 30);
        assert_eq!(config.images.max_results, 5);
        assert_eq!(config.images.denylist, ["pinterest"]);
        assert_eq!(config.deck.name, "Mis frases");
        assert_eq!(config.deck_exporter().deck_name(), "Mis frases");
    }

    #[test]
    fn test_invalid_toml() {
        let err = Config::parse("[llm\nmodel = 1").unwrap_err();
        assert!(matches!(err, Error::TomlParse(_)));
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = Config::parse("[deck]\ntitle = \"x\"").unwrap_err();
        assert!(matches!(err, Error::TomlParse(_)));
    }

    #[test]
    fn test_validation() {
        let err = Config::parse("[deck]\nname = \"  \"").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        let err = Config::parse("[llm]\ntimeout_secs = 0").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_max_results_clamped_by_client() {
        let config = Config::parse("[images]\nmax_results = 50").unwrap();
        let credentials = Credentials {
            openai_api_key: "k".into(),
            google_api_key: "g".into(),
            google_cse_id: "cx".into(),
        };
        assert_eq!(config.image_search_client(&credentials).max_results(), 10);
    }

    #[test]
    fn test_load_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "[media]\ndir = \"uploads\"").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.media_store().root(), Path::new("uploads"));

        let err = Config::load(Some(&dir.path().join("missing.toml"))).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_credentials_reports_all_missing() {
        let env: HashMap<&str, &str> = [(OPENAI_API_KEY, "sk"), (GOOGLE_API_KEY, " ")].into();
        let err = Credentials::from_lookup(|k| env.get(k).map(|v| v.to_string())).unwrap_err();
        let message = err.to_string();
        assert!(message.contains(GOOGLE_API_KEY));
        assert!(message.contains(GOOGLE_CSE_ID));
        assert!(!message.contains(OPENAI_API_KEY));
    }

    #[test]
    fn test_credentials_debug_hides_keys() {
        let credentials = Credentials::from_lookup(|k| Some(format!("secret-{}", k))).unwrap();
        let debug = format!("{:?}", credentials);
        assert!(!debug.contains("secret-OPENAI"));
        assert!(!debug.contains("secret-GOOGLE_API"));
    }
}
