//! Deck export.
//!
//! Turns committed cards into notes of the two fixed note types and writes
//! them as one `.apkg`. Local pictures and recordings are bundled; remote
//! URLs are referenced as-is.

use std::path::{Path, PathBuf};

use frasecard_builder::{
    ApkgBuilder, DeckPackage, FILL_IN_BLANK_ID, MediaCollector, Note, NoteType, VOCAB_ID,
    is_remote_url,
};
use rand::Rng;
use serde::Serialize;
use tracing::{debug, info};

use crate::card::{BlankDraft, CardDraft, CommittedCard, DefinitionDraft};
use crate::error::Result;

/// Deck name used when none is configured.
pub const DEFAULT_DECK_NAME: &str = "Exported Spanish Deck";

/// What an export produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportSummary {
    /// The written package.
    pub path: PathBuf,
    /// Deck id used for this export.
    pub deck_id: i64,
    /// Number of notes written.
    pub notes: usize,
    /// Number of media files bundled.
    pub media_files: usize,
}

/// Writes committed cards to a deck package.
#[derive(Debug, Clone)]
pub struct DeckExporter {
    deck_name: String,
    deck_id: Option<i64>,
}

impl Default for DeckExporter {
    fn default() -> Self {
        Self::new(DEFAULT_DECK_NAME)
    }
}

impl DeckExporter {
    /// Exporter for a deck called `deck_name`. Every export draws a fresh
    /// deck id.
    pub fn new(deck_name: impl Into<String>) -> Self {
        Self {
            deck_name: deck_name.into(),
            deck_id: None,
        }
    }

    /// Use a fixed deck id instead of a random one.
    pub fn with_deck_id(mut self, deck_id: i64) -> Self {
        self.deck_id = Some(deck_id);
        self
    }

    /// The deck name.
    pub fn deck_name(&self) -> &str {
        &self.deck_name
    }

    /// Map cards to notes and collect their local media.
    pub fn build_package(&self, cards: &[CommittedCard]) -> Result<DeckPackage> {
        let deck_id = self
            .deck_id
            .unwrap_or_else(|| rand::rng().random_range(1_i64 << 30..1_i64 << 31));

        let mut package = DeckPackage::new(deck_id, self.deck_name.clone());
        package.add_note_type(NoteType::fill_in_blank());
        package.add_note_type(NoteType::vocab());

        let mut media = MediaCollector::new();
        for card in cards {
            let note = match card.card() {
                CardDraft::Blank(d) => blank_note(d, &mut media),
                CardDraft::Definition(d) => vocab_note(d, &mut media),
            };
            package.add_note(note)?;
        }

        debug!(
            deck_id,
            notes = package.notes.len(),
            media = media.len(),
            "Built deck package"
        );
        for file in media.into_files() {
            package.add_media(file);
        }
        Ok(package)
    }

    /// Write `cards` to `path`, overwriting it if it exists.
    ///
    /// Fails when a referenced local file cannot be read or the output
    /// cannot be written. An empty card list still produces a valid package.
    pub fn export(&self, cards: &[CommittedCard], path: impl AsRef<Path>) -> Result<ExportSummary> {
        let path = path.as_ref();
        let package = self.build_package(cards)?;
        let summary = ExportSummary {
            path: path.to_path_buf(),
            deck_id: package.deck_id,
            notes: package.notes.len(),
            media_files: package.media.len(),
        };

        ApkgBuilder::new(package).write_to_file(path)?;

        info!(
            path = %path.display(),
            notes = summary.notes,
            media = summary.media_files,
            "Deck exported"
        );
        Ok(summary)
    }
}

/// `dir/stem.ext`, or `dir/stem-N.ext` with the smallest `N >= 1` that does
/// not exist yet.
pub fn unique_output_path(dir: impl AsRef<Path>, stem: &str, ext: &str) -> PathBuf {
    let dir = dir.as_ref();
    let first = dir.join(format!("{}.{}", stem, ext));
    if !first.exists() {
        return first;
    }
    (1..)
        .map(|n| dir.join(format!("{}-{}.{}", stem, n, ext)))
        .find(|p| !p.exists())
        .unwrap_or(first)
}

fn blank_note(draft: &BlankDraft, media: &mut MediaCollector) -> Note {
    Note::new(
        FILL_IN_BLANK_ID,
        vec![
            draft.front.clone(),
            draft.clue.clone(),
            image_field(draft.image_url.as_deref(), media),
            draft.back.clone(),
        ],
    )
}

fn vocab_note(draft: &DefinitionDraft, media: &mut MediaCollector) -> Note {
    Note::new(
        VOCAB_ID,
        vec![
            draft.base_form.clone(),
            draft.article.clone().unwrap_or_default(),
            draft.ipa.clone().unwrap_or_default(),
            image_field(draft.image_url.as_deref(), media),
            audio_field(draft.audio_url.as_deref(), media),
            draft.hint.clone(),
            draft.info.clone(),
        ],
    )
}

fn image_field(url: Option<&str>, media: &mut MediaCollector) -> String {
    match url.map(str::trim).filter(|u| !u.is_empty()) {
        None => String::new(),
        Some(url) if is_remote_url(url) => format!("<img src=\"{}\">", escape_attr(url)),
        Some(path) => format!("<img src=\"{}\">", escape_attr(&media.add(path))),
    }
}

// Remote recordings are not downloaded, so there is nothing to play.
fn audio_field(url: Option<&str>, media: &mut MediaCollector) -> String {
    match url.map(str::trim).filter(|u| !u.is_empty()) {
        Some(path) if !is_remote_url(path) => format!("[sound:{}]", media.add(path)),
        _ => String::new(),
    }
}

fn escape_attr(value: &str) -> String {
    value.replace('&', "&amp;").replace('"', "&quot;")
}
