//! Async clients for the backends behind frasecard.
//!
//! Two services are involved when authoring a card:
//!
//! - a language model behind an OpenAI-compatible chat completions API, used
//!   for short linguistic annotations (verb infinitive, IPA, article,
//!   dictionary form) and for turning a sentence into an image search query;
//! - the Custom Search JSON API in image mode, used to find candidate
//!   pictures.
//!
//! # Quick Start
//!
//! ```no_run
//! use frasecard::{ImageSearchClient, LlmClient};
//!
//! # async fn example() -> frasecard::Result<()> {
//! let llm = LlmClient::builder().api_key("sk-...").build();
//! let search = ImageSearchClient::builder()
//!     .api_key("key")
//!     .engine_id("cx")
//!     .build();
//!
//! let query = llm.annotate().image_query("El gato duerme en el sofá").await?;
//! let links = search.search(&query).await?;
//! println!("{} candidates for {:?}", links.len(), query);
//! # Ok(())
//! # }
//! ```

pub mod annotate;
pub mod client;
pub mod error;
mod request;
pub mod search;

pub use annotate::AnnotateActions;
pub use client::{LlmClient, LlmClientBuilder};
pub use error::{Error, Result};
pub use search::{DEFAULT_DENYLIST, ImageSearchClient, ImageSearchClientBuilder, MAX_RESULTS_LIMIT};
