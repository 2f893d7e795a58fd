//! Anki `.apkg` generation for frasecard decks.
//!
//! The builder knows two note types, a four-field fill-in-the-blank type and
//! a seven-field vocabulary type, and writes packages Anki can import
//! directly via File > Import.
//!
//! # Usage
//!
//! ```no_run
//! use frasecard_builder::{ApkgBuilder, DeckPackage, MediaCollector, Note, NoteType, FILL_IN_BLANK_ID};
//!
//! # fn main() -> frasecard_builder::Result<()> {
//! let mut package = DeckPackage::new(1_500_000_000, "Spanish");
//! package.add_note_type(NoteType::fill_in_blank());
//!
//! let mut media = MediaCollector::new();
//! let image = media.add("media/images/cat.jpg");
//!
//! package.add_note(Note::new(
//!     FILL_IN_BLANK_ID,
//!     vec![
//!         "El _____ duerme".to_string(),
//!         String::new(),
//!         format!("<img src=\"{}\">", image),
//!         "gato".to_string(),
//!     ],
//! ))?;
//! for file in media.into_files() {
//!     package.add_media(file);
//! }
//!
//! ApkgBuilder::new(package).write_to_file("spanish.apkg")?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod media;
pub mod schema;

mod apkg;
mod sql;

pub use apkg::ApkgBuilder;
pub use error::{Error, Result};
pub use media::{MediaCollector, basename, is_remote_url};
pub use schema::{
    CardTemplate, DeckPackage, FILL_IN_BLANK_ID, MediaFile, Note, NoteType, VOCAB_ID,
};
