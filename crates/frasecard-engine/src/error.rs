//! Error types for frasecard-engine.
//!
//! Errors fall into the categories a session reports to the user:
//!
//! 1. **Service errors**: the language model or image search failed. The
//!    session is left exactly as it was and the action can be retried.
//! 2. **Validation errors**: the action does not apply to the current state
//!    (no draft, index out of range, wrong field for the card type).
//! 3. **I/O and export errors**: writing media or the package failed.
//!
//! # Example
//!
//! ```no_run
//! use frasecard_engine::{CardSessionController, Error};
//! # use frasecard_engine::provider::{LinguisticAnnotator, ImageProvider};
//!
//! # async fn example<A: LinguisticAnnotator, P: ImageProvider>(
//! #     session: &mut CardSessionController<A, P>,
//! # ) {
//! match session.start_blank(2).await {
//!     Ok(draft) => println!("{}", draft.headline()),
//!     Err(e) if e.is_retryable() => eprintln!("backend hiccup, try again: {}", e),
//!     Err(Error::Validation(msg)) => eprintln!("{}", msg),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! # }
//! ```

use std::fmt;

/// Result type for frasecard-engine operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during a session.
#[derive(Debug)]
pub enum Error {
    /// A backend call failed (network, rate limit, malformed response).
    Service(frasecard::Error),

    /// The action is not valid in the current state.
    Validation(String),

    /// An I/O error occurred.
    Io(std::io::Error),

    /// Writing the deck package failed.
    Export(frasecard_builder::Error),

    /// Configuration is missing or inconsistent.
    Config(String),

    /// The configuration file is not valid TOML.
    TomlParse(toml::de::Error),
}

impl Error {
    /// Whether re-invoking the same action may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::Service(_))
    }

    pub(crate) fn validation(msg: impl Into<String>) -> Self {
        Error::Validation(msg.into())
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Service(e) => Some(e),
            Error::Io(e) => Some(e),
            Error::Export(e) => Some(e),
            Error::TomlParse(e) => Some(e),
            _ => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Service(e) => write!(f, "service error: {}", e),
            Error::Validation(msg) => write!(f, "validation error: {}", msg),
            Error::Io(e) => write!(f, "I/O error: {}", e),
            Error::Export(e) => write!(f, "export failed: {}", e),
            Error::Config(msg) => write!(f, "configuration error: {}", msg),
            Error::TomlParse(e) => write!(f, "config parse error: {}", e),
        }
    }
}

impl From<frasecard::Error> for Error {
    fn from(err: frasecard::Error) -> Self {
        match err {
            frasecard::Error::Config(msg) => Error::Config(msg),
            other => Error::Service(other),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<frasecard_builder::Error> for Error {
    fn from(err: frasecard_builder::Error) -> Self {
        Error::Export(err)
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::TomlParse(err)
    }
}
