//! Seams to the external services.
//!
//! The session only talks to these two traits, so tests can swap in
//! deterministic fakes. The production implementations wrap the
//! [`frasecard`] clients.

use std::future::Future;

use frasecard::{ImageSearchClient, LlmClient};

use crate::Result;

/// Short linguistic facts about a word.
///
/// An empty string always means "no data" and is never an error.
pub trait LinguisticAnnotator {
    /// Infinitive when `word` is a conjugated verb, otherwise empty.
    fn clue_for(&self, word: &str) -> impl Future<Output = Result<String>>;

    /// `(article, ipa)` for a word.
    fn ipa_and_article_for(&self, word: &str) -> impl Future<Output = Result<(String, String)>>;

    /// Dictionary form, optionally scoped by the sentence it appears in.
    fn base_form_of(
        &self,
        word: &str,
        sentence: Option<&str>,
    ) -> impl Future<Output = Result<String>>;
}

/// Candidate pictures for a piece of text.
pub trait ImageProvider {
    /// Turn free text into a search query.
    fn refine_query(&self, text: &str) -> impl Future<Output = Result<String>>;

    /// Image URLs for a query, best first.
    fn search_images(&self, query: &str) -> impl Future<Output = Result<Vec<String>>>;
}

impl LinguisticAnnotator for LlmClient {
    async fn clue_for(&self, word: &str) -> Result<String> {
        Ok(self.annotate().clue(word).await?)
    }

    async fn ipa_and_article_for(&self, word: &str) -> Result<(String, String)> {
        let article = self.annotate().article(word).await?;
        let ipa = self.annotate().ipa(word).await?;
        Ok((article, ipa))
    }

    async fn base_form_of(&self, word: &str, sentence: Option<&str>) -> Result<String> {
        Ok(self.annotate().base_form(word, sentence).await?)
    }
}

/// Image provider backed by the language model (query refinement) and the
/// image search API.
#[derive(Debug, Clone)]
pub struct WebImageProvider {
    llm: LlmClient,
    search: ImageSearchClient,
}

impl WebImageProvider {
    /// Combine a language-model client and a search client.
    pub fn new(llm: LlmClient, search: ImageSearchClient) -> Self {
        Self { llm, search }
    }
}

impl ImageProvider for WebImageProvider {
    async fn refine_query(&self, text: &str) -> Result<String> {
        let query = self.llm.annotate().image_query(text).await?;
        // An empty refinement is still searchable as the original text.
        if query.is_empty() {
            Ok(text.trim().to_string())
        } else {
            Ok(query)
        }
    }

    async fn search_images(&self, query: &str) -> Result<Vec<String>> {
        Ok(self.search.search(query).await?)
    }
}
