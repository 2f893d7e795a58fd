//! Linguistic annotation prompts.
//!
//! Each operation sends one word (or phrase) to the language model under a
//! fixed system prompt and returns the bare answer. An empty answer means the
//! model had nothing to say, which is not an error.
//!
//! # Example
//!
//! ```no_run
//! use frasecard::LlmClient;
//!
//! # async fn example() -> frasecard::Result<()> {
//! let client = LlmClient::new();
//!
//! let base = client.annotate().base_form("compañeros", None).await?;
//! assert_eq!(base, "compañero / compañera");
//! # Ok(())
//! # }
//! ```

use crate::client::LlmClient;
use crate::error::Result;

const CLUE_PROMPT: &str = "\
You receive a single Spanish word. If it is a conjugated form of a verb, \
answer with that verb's infinitive. Otherwise answer with nothing at all. \
Never add explanations.";

const IPA_PROMPT: &str = "\
You receive a single Spanish word as spoken in Spain. Answer with its IPA \
transcription and nothing else.";

const ARTICLE_PROMPT: &str = "\
You receive a single Spanish word. Answer with the definite article or \
articles used with it (for example \"el\", \"la\" or \"el / la\") and \
nothing else.";

const BASE_FORM_PROMPT: &str = "\
You receive a Spanish word, sometimes followed by the sentence it appears in. \
Answer with its dictionary form. Plurals become singular. When the word has a \
masculine and a feminine form, answer with both separated by a slash, for \
example \"compañero / compañera\" for \"compañeros\". Answer with the form \
only.";

const IMAGE_QUERY_PROMPT: &str = "\
You receive a sentence or a word. Answer with a short English image search \
query (a word or a short phrase, at most 100 characters) that captures the \
main visual idea. Answer with the query only.";

/// Provides access to the annotation prompts.
///
/// Obtained via [`LlmClient::annotate()`].
#[derive(Debug)]
pub struct AnnotateActions<'a> {
    pub(crate) client: &'a LlmClient,
}

impl AnnotateActions<'_> {
    /// Infinitive of a conjugated verb, or an empty string.
    pub async fn clue(&self, word: &str) -> Result<String> {
        self.client.complete(CLUE_PROMPT, word).await
    }

    /// IPA transcription of a word.
    pub async fn ipa(&self, word: &str) -> Result<String> {
        self.client.complete(IPA_PROMPT, word).await
    }

    /// Grammatical article(s) for a word.
    pub async fn article(&self, word: &str) -> Result<String> {
        self.client.complete(ARTICLE_PROMPT, word).await
    }

    /// Dictionary form of a word, optionally disambiguated by its sentence.
    pub async fn base_form(&self, word: &str, sentence: Option<&str>) -> Result<String> {
        match sentence {
            Some(sentence) if !sentence.trim().is_empty() => {
                let input = format!("Word: {}\nSentence: {}", word, sentence);
                self.client.complete(BASE_FORM_PROMPT, &input).await
            }
            _ => self.client.complete(BASE_FORM_PROMPT, word).await,
        }
    }

    /// Turn free text into a concise image search query.
    pub async fn image_query(&self, text: &str) -> Result<String> {
        self.client.complete(IMAGE_QUERY_PROMPT, text).await
    }
}
