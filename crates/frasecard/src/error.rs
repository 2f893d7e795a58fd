//! Error types for the frasecard backend clients.
//!
//! Every failure talking to the language model or the image search service
//! ends up here. Callers generally treat all of these as "the backend is
//! unavailable right now" and let the user retry.
//!
//! # Example
//!
//! ```no_run
//! use frasecard::{Error, LlmClient};
//!
//! # async fn example() {
//! let client = LlmClient::new();
//!
//! match client.annotate().clue("comemos").await {
//!     Ok(clue) if clue.is_empty() => println!("not a verb"),
//!     Ok(clue) => println!("infinitive: {}", clue),
//!     Err(Error::Api { status: 429, .. }) => eprintln!("rate limited, try again"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! # }
//! ```

use thiserror::Error;

/// The error type for backend operations.
#[derive(Debug, Error)]
pub enum Error {
    /// HTTP/network error from reqwest.
    ///
    /// Covers DNS failures, refused connections and timeouts.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-success status code.
    ///
    /// `message` holds the response body as returned by the service.
    #[error("API error (status {status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body.
        message: String,
    },

    /// The response body could not be decoded.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The language model returned no choices at all.
    #[error("language model returned an empty response")]
    EmptyResponse,

    /// Missing or invalid client configuration (e.g. no API key).
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// A specialized Result type for backend operations.
pub type Result<T> = std::result::Result<T, Error>;
