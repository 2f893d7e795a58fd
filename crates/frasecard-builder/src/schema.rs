//! Package contents: note types, notes and media.
//!
//! A [`DeckPackage`] is the logical content of one `.apkg` file: a single deck,
//! the note types its notes use, the notes themselves and the media files to
//! bundle. Two note types ship built in, see [`NoteType::fill_in_blank`] and
//! [`NoteType::vocab`].

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Fixed id of the fill-in-the-blank note type.
pub const FILL_IN_BLANK_ID: i64 = 1_749_236_500_001;

/// Fixed id of the vocabulary note type.
pub const VOCAB_ID: i64 = 1_749_236_500_002;

const CARD_CSS: &str = r#".card {
  font-family: arial;
  font-size: 20px;
  text-align: center;
  color: black;
  background-color: white;
}"#;

/// A note type (Anki "model"): field names plus card templates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoteType {
    /// Stable id. Anki merges imports by this value.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Field names in order.
    pub fields: Vec<String>,
    /// One card is generated per template.
    pub templates: Vec<CardTemplate>,
    /// Styling shared by all templates.
    pub css: String,
}

/// A card template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardTemplate {
    /// Template name.
    pub name: String,
    /// Question side.
    pub front: String,
    /// Answer side.
    pub back: String,
}

impl CardTemplate {
    fn new(name: &str, front: &str, back: &str) -> Self {
        Self {
            name: name.to_string(),
            front: front.to_string(),
            back: back.to_string(),
        }
    }
}

impl NoteType {
    /// Sentence with a gap, a clue, an image and the missing word.
    pub fn fill_in_blank() -> Self {
        Self {
            id: FILL_IN_BLANK_ID,
            name: "Fill-in-the-Blank".to_string(),
            fields: vec![
                "Sentence".to_string(),
                "Clue".to_string(),
                "Image".to_string(),
                "Filler".to_string(),
            ],
            templates: vec![CardTemplate::new(
                "Fill in the blank",
                "<div>Fill in the blank</div><br>\n<div>{{Sentence}} ({{Clue}})</div><br>\n<div>{{Image}}</div><br>",
                "<div>{{Filler}}</div><br>",
            )],
            css: CARD_CSS.to_string(),
        }
    }

    /// A word with article, IPA, picture and pronunciation.
    ///
    /// Generates three cards per note: meaning, recall from picture and
    /// spelling.
    pub fn vocab() -> Self {
        let answer = "<div>{{Article (for nouns)}} {{Word}}</div><br>";
        Self {
            id: VOCAB_ID,
            name: "Vocab".to_string(),
            fields: vec![
                "Word".to_string(),
                "Article (for nouns)".to_string(),
                "IPA spelling".to_string(),
                "Image".to_string(),
                "Pronunciation audio".to_string(),
                "Additional hint".to_string(),
                "Additional info".to_string(),
            ],
            templates: vec![
                CardTemplate::new(
                    "Meaning",
                    "<div>What does this mean?</div><br>\n<div>{{Word}}</div><br>\n<div>{{Additional hint}}</div><br>",
                    &format!(
                        "{answer}\n<div>{{{{IPA spelling}}}}</div><br>\n<div>{{{{Image}}}}</div><br>\n<div>{{{{Pronunciation audio}}}}</div><br>\n<div>{{{{Additional info}}}}</div><br>"
                    ),
                ),
                CardTemplate::new(
                    "Word recall",
                    "<div>What's the word for this picture?</div><br>\n<div>{{Image}}</div><br>\n<div>{{Additional hint}}</div><br>",
                    &format!(
                        "{answer}\n<div>{{{{IPA spelling}}}}</div><br>\n<div>{{{{Pronunciation audio}}}}</div><br>\n<div>{{{{Additional info}}}}</div><br>"
                    ),
                ),
                CardTemplate::new(
                    "Spelling",
                    "<div>How do you spell this word?</div><br>\n<div>{{Image}}</div><br>\n<div>{{IPA spelling}}</div><br>\n<div>{{Pronunciation audio}}</div><br>",
                    answer,
                ),
            ],
            css: CARD_CSS.to_string(),
        }
    }

    /// Index of the field Anki sorts and checksums by.
    pub fn sort_field_index(&self) -> usize {
        0
    }
}

/// One note instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    /// Id of the note type this note uses.
    pub note_type: i64,
    /// Field values, in the note type's field order.
    pub fields: Vec<String>,
    /// Tags.
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Note {
    /// Create a note without tags.
    pub fn new(note_type: i64, fields: Vec<String>) -> Self {
        Self {
            note_type,
            fields,
            tags: Vec::new(),
        }
    }

    /// Tags as Anki stores them: space separated with surrounding spaces.
    pub fn tags_string(&self) -> String {
        if self.tags.is_empty() {
            String::new()
        } else {
            format!(" {} ", self.tags.join(" "))
        }
    }
}

/// A media file to bundle, with the name it gets inside the package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaFile {
    /// File name referenced from note fields.
    pub name: String,
    /// Where the bytes are read from.
    pub path: PathBuf,
}

/// Everything that goes into one package.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeckPackage {
    /// Deck id.
    pub deck_id: i64,
    /// Deck name shown in Anki.
    pub deck_name: String,
    /// Note types used by the notes.
    pub note_types: Vec<NoteType>,
    /// Notes, in insertion order.
    pub notes: Vec<Note>,
    /// Media files to bundle.
    pub media: Vec<MediaFile>,
}

impl DeckPackage {
    /// Create an empty package for one deck.
    pub fn new(deck_id: i64, deck_name: impl Into<String>) -> Self {
        Self {
            deck_id,
            deck_name: deck_name.into(),
            note_types: Vec::new(),
            notes: Vec::new(),
            media: Vec::new(),
        }
    }

    /// Register a note type. Registering the same id twice replaces it.
    pub fn add_note_type(&mut self, note_type: NoteType) {
        match self.note_types.iter_mut().find(|t| t.id == note_type.id) {
            Some(existing) => *existing = note_type,
            None => self.note_types.push(note_type),
        }
    }

    /// Look up a note type by id.
    pub fn note_type(&self, id: i64) -> Option<&NoteType> {
        self.note_types.iter().find(|t| t.id == id)
    }

    /// Add a note after checking it against its note type.
    pub fn add_note(&mut self, note: Note) -> Result<()> {
        let note_type = self
            .note_type(note.note_type)
            .ok_or(Error::UnknownNoteType(note.note_type))?;

        if note.fields.len() != note_type.fields.len() {
            return Err(Error::FieldCount {
                note_type: note_type.name.clone(),
                expected: note_type.fields.len(),
                actual: note.fields.len(),
            });
        }

        self.notes.push(note);
        Ok(())
    }

    /// Add a media file to bundle.
    pub fn add_media(&mut self, media: MediaFile) {
        self.media.push(media);
    }
}
