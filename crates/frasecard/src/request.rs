//! Internal request and response types for the backend protocols.

use serde::{Deserialize, Serialize};

/// Chat completion request body.
#[derive(Debug, Serialize)]
pub(crate) struct ChatRequest<'a> {
    pub model: &'a str,
    pub messages: [ChatMessage<'a>; 2],
    pub temperature: f32,
}

impl<'a> ChatRequest<'a> {
    /// Build a single-shot request: one system prompt, one user message.
    pub fn new(model: &'a str, system: &'a str, input: &'a str) -> Self {
        Self {
            model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: input,
                },
            ],
            temperature: 0.0,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct ChatMessage<'a> {
    pub role: &'a str,
    pub content: &'a str,
}

/// Chat completion response body. Only the parts we read.
#[derive(Debug, Deserialize)]
pub(crate) struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatChoice {
    pub message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatChoiceMessage {
    /// Null when the model refuses or returns tool calls.
    #[serde(default)]
    pub content: Option<String>,
}

/// Image search response body.
///
/// The `items` key is absent entirely when a query has no hits.
#[derive(Debug, Deserialize)]
pub(crate) struct SearchResponse {
    #[serde(default)]
    pub items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SearchItem {
    pub link: String,
}
