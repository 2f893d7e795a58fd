//! Card authoring for frasecard.
//!
//! This crate turns a sentence into flashcards. It sits on top of the
//! [`frasecard`] clients, which talk to the language model and the image
//! search backend, and [`frasecard_builder`], which writes `.apkg` files.
//!
//! A run goes: enter a sentence, pick a token, start a fill-in-the-blank or
//! a definition draft, adjust it (image, audio, fields), commit it, and
//! finally export every committed card as one deck.
//!
//! # Quick Start
//!
//! ```no_run
//! use frasecard_engine::{CardSessionController, Config, Credentials};
//!
//! # async fn example() -> frasecard_engine::Result<()> {
//! let config = Config::load(None)?;
//! let credentials = Credentials::from_env()?;
//!
//! let mut session = CardSessionController::new(
//!     config.llm_client(&credentials),
//!     config.image_provider(&credentials),
//! )
//! .with_media_store(config.media_store());
//!
//! let tokens = session.set_sentence("Mis compañeros vienen mañana")?;
//! println!("{} tokens", tokens.len());
//!
//! session.start_definition(1).await?;
//! session.lookup_pronunciation().await?;
//! session.select_candidate(0)?;
//! session.commit()?;
//!
//! let summary = config.deck_exporter().export(session.cards(), "deck.apkg")?;
//! println!("{} notes written to {}", summary.notes, summary.path.display());
//! # Ok(())
//! # }
//! ```
//!
//! # Testing
//!
//! The controller is generic over [`LinguisticAnnotator`] and
//! [`ImageProvider`], so sessions can run against in-memory fakes.

mod error;

pub mod card;
pub mod config;
pub mod export;
pub mod media;
pub mod provider;
pub mod session;
pub mod tokenizer;

pub use card::{BLANK_MARKER, BlankDraft, CardDraft, CommittedCard, DefinitionDraft, DraftField};
pub use config::{Config, Credentials};
pub use error::{Error, Result};
pub use export::{DEFAULT_DECK_NAME, DeckExporter, ExportSummary, unique_output_path};
pub use media::{MediaKind, MediaStore};
pub use provider::{ImageProvider, LinguisticAnnotator, WebImageProvider};
pub use session::{CardSessionController, ImageCandidates, Session, SessionState};
pub use tokenizer::{Token, tokenize};
