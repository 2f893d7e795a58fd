//! Common test utilities for session and export tests.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use frasecard::{ImageSearchClient, LlmClient};
use frasecard_engine::{CardSessionController, ImageProvider, LinguisticAnnotator, Result};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Deterministic annotator with canned answers and a call log.
///
/// `calls` and `fail` are shared handles so a test can keep them after the
/// fake moves into a controller.
#[derive(Debug, Default)]
pub struct FakeAnnotator {
    pub clues: HashMap<String, String>,
    pub base_forms: HashMap<String, String>,
    pub pronunciations: HashMap<String, (String, String)>,
    pub calls: Rc<RefCell<Vec<String>>>,
    pub fail: Rc<Cell<bool>>,
}

#[allow(dead_code)]
impl FakeAnnotator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clue(mut self, word: &str, clue: &str) -> Self {
        self.clues.insert(word.to_string(), clue.to_string());
        self
    }

    pub fn base_form(mut self, word: &str, base: &str) -> Self {
        self.base_forms.insert(word.to_string(), base.to_string());
        self
    }

    pub fn pronunciation(mut self, word: &str, article: &str, ipa: &str) -> Self {
        self.pronunciations
            .insert(word.to_string(), (article.to_string(), ipa.to_string()));
        self
    }

    fn record(&self, call: String) -> Result<()> {
        self.calls.borrow_mut().push(call);
        if self.fail.get() {
            return Err(frasecard::Error::EmptyResponse.into());
        }
        Ok(())
    }
}

impl LinguisticAnnotator for FakeAnnotator {
    async fn clue_for(&self, word: &str) -> Result<String> {
        self.record(format!("clue:{}", word))?;
        Ok(self.clues.get(word).cloned().unwrap_or_default())
    }

    async fn ipa_and_article_for(&self, word: &str) -> Result<(String, String)> {
        self.record(format!("ipa:{}", word))?;
        Ok(self.pronunciations.get(word).cloned().unwrap_or_default())
    }

    async fn base_form_of(&self, word: &str, sentence: Option<&str>) -> Result<String> {
        self.record(format!("base:{}|{}", word, sentence.unwrap_or_default()))?;
        Ok(self.base_forms.get(word).cloned().unwrap_or_default())
    }
}

/// Image provider returning `<query>/1.jpg`, `<query>/2.jpg`, ...
#[derive(Debug)]
pub struct FakeImages {
    pub per_query: usize,
    pub queries: Rc<RefCell<Vec<String>>>,
    pub fail: Rc<Cell<bool>>,
}

impl Default for FakeImages {
    fn default() -> Self {
        Self {
            per_query: 3,
            queries: Rc::default(),
            fail: Rc::default(),
        }
    }
}

#[allow(dead_code)]
impl FakeImages {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ImageProvider for FakeImages {
    async fn refine_query(&self, text: &str) -> Result<String> {
        Ok(format!("q({})", text))
    }

    async fn search_images(&self, query: &str) -> Result<Vec<String>> {
        self.queries.borrow_mut().push(query.to_string());
        if self.fail.get() {
            return Err(frasecard::Error::Api {
                status: 429,
                message: "rate limited".to_string(),
            }
            .into());
        }
        Ok((1..=self.per_query)
            .map(|n| format!("https://img.test/{}/{}.jpg", query, n))
            .collect())
    }
}

pub type FakeSession = CardSessionController<FakeAnnotator, FakeImages>;

/// Handles into the fakes of a [`FakeSession`].
#[allow(dead_code)]
pub struct Handles {
    pub annotator_calls: Rc<RefCell<Vec<String>>>,
    pub annotator_fail: Rc<Cell<bool>>,
    pub image_queries: Rc<RefCell<Vec<String>>>,
    pub images_fail: Rc<Cell<bool>>,
}

#[allow(dead_code)]
impl Handles {
    pub fn annotator_calls(&self) -> Vec<String> {
        self.annotator_calls.borrow().clone()
    }

    pub fn image_queries(&self) -> Vec<String> {
        self.image_queries.borrow().clone()
    }
}

/// Controller over `annotator` and a default [`FakeImages`].
#[allow(dead_code)]
pub fn session_with(annotator: FakeAnnotator) -> (FakeSession, Handles) {
    let images = FakeImages::new();
    let handles = Handles {
        annotator_calls: annotator.calls.clone(),
        annotator_fail: annotator.fail.clone(),
        image_queries: images.queries.clone(),
        images_fail: images.fail.clone(),
    };
    (CardSessionController::new(annotator, images), handles)
}

/// Start a new mock server for testing.
#[allow(dead_code)]
pub async fn setup_mock_server() -> MockServer {
    MockServer::start().await
}

/// LLM client pointed at the mock server.
#[allow(dead_code)]
pub fn llm_for_mock(server: &MockServer) -> LlmClient {
    LlmClient::builder()
        .url(server.uri())
        .api_key("test-key")
        .build()
}

/// Search client pointed at the mock server.
#[allow(dead_code)]
pub fn search_for_mock(server: &MockServer) -> ImageSearchClient {
    ImageSearchClient::builder()
        .url(format!("{}/customsearch/v1", server.uri()))
        .api_key("test-key")
        .engine_id("test-cx")
        .build()
}

/// Answer every completion request with `content`.
#[allow(dead_code)]
pub async fn mock_completions(server: &MockServer, content: &str) {
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "choices": [{"message": {"role": "assistant", "content": content}}]
        })))
        .mount(server)
        .await;
}

/// Answer every image search with `links`.
#[allow(dead_code)]
pub async fn mock_search(server: &MockServer, links: &[&str]) {
    let items: Vec<_> = links
        .iter()
        .map(|link| serde_json::json!({ "link": link }))
        .collect();
    Mock::given(method("GET"))
        .and(path("/customsearch/v1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "items": items
        })))
        .mount(server)
        .await;
}
