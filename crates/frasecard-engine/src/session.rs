//! The card authoring session.
//!
//! A [`Session`] holds everything one authoring run works on: the sentence,
//! its tokens, the current selection, at most one pending draft with its
//! image candidates, and the committed cards. Its methods are the pure state
//! transitions.
//!
//! [`CardSessionController`] owns a session plus the two external services
//! and drives the transitions that need them. Every backend call finishes
//! before the session is touched, so a failed call leaves the session
//! exactly as it was.
//!
//! ```text
//!   Idle ──select──▶ Selected(i) ──start_blank / start_definition──▶ DraftPending
//!    ▲                                                                  │
//!    └───────────────────────── commit / discard ◀──────────────────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use frasecard::{ImageSearchClient, LlmClient};
//! use frasecard_engine::{CardSessionController, DraftField, WebImageProvider};
//!
//! # async fn example() -> frasecard_engine::Result<()> {
//! let llm = LlmClient::builder().api_key("sk-...").build();
//! let search = ImageSearchClient::builder().api_key("key").engine_id("cx").build();
//! let mut session = CardSessionController::new(llm.clone(), WebImageProvider::new(llm, search));
//!
//! session.set_sentence("El gato duerme en el sofá")?;
//! session.start_blank(1).await?;
//! session.select_candidate(0)?;
//! session.edit_field(DraftField::Clue, "animal")?;
//! session.commit()?;
//!
//! assert_eq!(session.cards().len(), 1);
//! # Ok(())
//! # }
//! ```

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info};

use crate::card::{
    BLANK_MARKER, BlankDraft, CardDraft, CommittedCard, DefinitionDraft, DraftField,
};
use crate::error::{Error, Result};
use crate::media::MediaStore;
use crate::provider::{ImageProvider, LinguisticAnnotator};
use crate::tokenizer::{Token, join_tokens, tokenize};

/// Where the session is in the authoring flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState<'a> {
    /// Nothing selected.
    Idle,
    /// A token is selected but no card kind has been chosen yet.
    Selected(usize),
    /// A draft is open for preview and editing.
    DraftPending(&'a CardDraft),
}

/// Image candidates for the pending draft.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImageCandidates {
    /// The query that produced the URLs.
    pub query: String,
    /// Candidate URLs, best first.
    pub urls: Vec<String>,
}

impl ImageCandidates {
    fn clear(&mut self) {
        self.query.clear();
        self.urls.clear();
    }
}

/// State of one authoring run.
#[derive(Debug, Clone, Default)]
pub struct Session {
    sentence: String,
    tokens: Vec<Token>,
    selection: Option<usize>,
    draft: Option<CardDraft>,
    candidates: ImageCandidates,
    cards: Vec<CommittedCard>,
}

impl Session {
    /// Create an empty session.
    pub fn new() -> Self {
        Self::default()
    }

    /// The current sentence.
    pub fn sentence(&self) -> &str {
        &self.sentence
    }

    /// Tokens of the current sentence.
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// The pending draft, if any.
    pub fn draft(&self) -> Option<&CardDraft> {
        self.draft.as_ref()
    }

    /// Image candidates of the pending draft.
    pub fn candidates(&self) -> &ImageCandidates {
        &self.candidates
    }

    /// Committed cards, in commit order.
    pub fn cards(&self) -> &[CommittedCard] {
        &self.cards
    }

    /// Current state.
    pub fn state(&self) -> SessionState<'_> {
        match (&self.draft, self.selection) {
            (Some(draft), _) => SessionState::DraftPending(draft),
            (None, Some(index)) => SessionState::Selected(index),
            (None, None) => SessionState::Idle,
        }
    }

    /// Replace the sentence. Any pending work on the old sentence is dropped.
    ///
    /// Sentences already containing [`BLANK_MARKER`] are rejected.
    pub fn set_sentence(&mut self, sentence: &str) -> Result<&[Token]> {
        let tokens = tokenize(sentence);
        if tokens.is_empty() {
            return Err(Error::validation("sentence is empty"));
        }
        if tokens.iter().any(|t| t.text.contains(BLANK_MARKER)) {
            return Err(Error::validation(format!(
                "sentence must not contain the blank marker {}",
                BLANK_MARKER
            )));
        }

        self.discard();
        self.sentence = sentence.trim().to_string();
        self.tokens = tokens;
        Ok(&self.tokens)
    }

    /// Select a token. A pending draft is discarded.
    pub fn select(&mut self, index: usize) -> Result<&Token> {
        self.check_index(index)?;
        self.discard();
        self.selection = Some(index);
        Ok(&self.tokens[index])
    }

    /// Install a freshly built draft for token `index`, replacing whatever
    /// was pending.
    pub(crate) fn open_draft(
        &mut self,
        index: usize,
        draft: CardDraft,
        candidates: ImageCandidates,
    ) -> Result<&CardDraft> {
        self.check_index(index)?;
        self.selection = Some(index);
        self.candidates = candidates;
        Ok(&*self.draft.insert(draft))
    }

    /// Replace the image candidates of the pending draft.
    pub(crate) fn set_candidates(&mut self, candidates: ImageCandidates) -> Result<&ImageCandidates> {
        self.draft_mut()?;
        self.candidates = candidates;
        Ok(&self.candidates)
    }

    /// Set the pending draft's image. Last write wins.
    pub fn select_image(&mut self, url: impl Into<String>) -> Result<()> {
        self.draft_mut()?.set_image_url(url.into());
        Ok(())
    }

    /// Use the `n`-th image candidate (zero-based).
    pub fn select_candidate(&mut self, n: usize) -> Result<&str> {
        self.draft_mut()?;
        let url = self.candidates.urls.get(n).cloned().ok_or_else(|| {
            Error::validation(format!(
                "no image candidate {} ({} available)",
                n + 1,
                self.candidates.urls.len()
            ))
        })?;
        self.select_image(url)?;
        Ok(self.candidates.urls[n].as_str())
    }

    /// Attach a pronunciation recording. Definition cards only.
    pub fn attach_audio(&mut self, path: impl Into<String>) -> Result<()> {
        match self.draft_mut()? {
            CardDraft::Definition(d) => {
                d.audio_url = Some(path.into());
                Ok(())
            }
            CardDraft::Blank(_) => Err(Error::validation("blank cards have no audio")),
        }
    }

    /// Overwrite an editable field of the pending draft.
    pub fn edit_field(&mut self, field: DraftField, value: &str) -> Result<()> {
        self.draft_mut()?.edit(field, value)
    }

    /// Finalize the pending draft and return to idle.
    pub fn commit(&mut self) -> Result<&CommittedCard> {
        let draft = self
            .draft
            .take()
            .ok_or_else(|| Error::validation("no draft to commit"))?;
        self.selection = None;
        self.candidates.clear();
        self.cards.push(CommittedCard::new(draft));
        Ok(&self.cards[self.cards.len() - 1])
    }

    /// Drop the pending draft, candidates and selection. Never touches the
    /// committed cards.
    pub fn discard(&mut self) {
        self.draft = None;
        self.selection = None;
        self.candidates.clear();
    }

    /// Remove a committed card. Later cards move up by one.
    pub fn remove_committed(&mut self, position: usize) -> Result<CommittedCard> {
        if position >= self.cards.len() {
            return Err(Error::validation(format!(
                "no card at position {} ({} committed)",
                position,
                self.cards.len()
            )));
        }
        Ok(self.cards.remove(position))
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if self.tokens.is_empty() {
            return Err(Error::validation("no sentence entered"));
        }
        if index >= self.tokens.len() {
            return Err(Error::validation(format!(
                "token {} out of range (sentence has {})",
                index,
                self.tokens.len()
            )));
        }
        Ok(())
    }

    fn draft_mut(&mut self) -> Result<&mut CardDraft> {
        self.draft
            .as_mut()
            .ok_or_else(|| Error::validation("no draft in progress"))
    }
}

/// Drives a [`Session`] with the help of the annotator and image provider.
#[derive(Debug)]
pub struct CardSessionController<A, P> {
    session: Session,
    annotator: A,
    images: P,
    media: MediaStore,
}

impl<A, P> CardSessionController<A, P>
where
    A: LinguisticAnnotator,
    P: ImageProvider,
{
    /// Create a controller with an empty session. Uploads go to `./media`.
    pub fn new(annotator: A, images: P) -> Self {
        Self {
            session: Session::new(),
            annotator,
            images,
            media: MediaStore::new("media"),
        }
    }

    /// Use a different media store for uploads.
    pub fn with_media_store(mut self, media: MediaStore) -> Self {
        self.media = media;
        self
    }

    /// The session being edited.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Current state.
    pub fn state(&self) -> SessionState<'_> {
        self.session.state()
    }

    /// Committed cards.
    pub fn cards(&self) -> &[CommittedCard] {
        self.session.cards()
    }

    /// See [`Session::set_sentence`].
    pub fn set_sentence(&mut self, sentence: &str) -> Result<&[Token]> {
        let tokens = self.session.set_sentence(sentence)?;
        info!(tokens = tokens.len(), "Sentence set");
        Ok(tokens)
    }

    /// See [`Session::select`].
    pub fn select(&mut self, index: usize) -> Result<&Token> {
        self.session.select(index)
    }

    /// Build a fill-in-the-blank draft for token `index`.
    ///
    /// Fetches a clue for the word and image candidates for the whole
    /// sentence. On failure the session is unchanged.
    pub async fn start_blank(&mut self, index: usize) -> Result<&CardDraft> {
        self.session.check_index(index)?;
        let word = self.session.tokens[index].text.clone();
        let sentence = self.session.sentence.clone();

        debug!(index, word = %word, "Starting blank card");
        let clue = self.annotator.clue_for(&word).await?;
        let candidates = self.find_images(&sentence).await?;

        let draft = CardDraft::Blank(BlankDraft {
            front: join_tokens(&self.session.tokens, Some((index, BLANK_MARKER))),
            back: word,
            clue,
            blank_index: index,
            image_url: None,
            sentence,
        });

        info!(index, candidates = candidates.urls.len(), "Blank draft ready");
        self.session.open_draft(index, draft, candidates)
    }

    /// Build a vocabulary draft for token `index`.
    ///
    /// Looks up the dictionary form in the context of the sentence and
    /// image candidates for that form. On failure the session is unchanged.
    pub async fn start_definition(&mut self, index: usize) -> Result<&CardDraft> {
        self.session.check_index(index)?;
        let word = self.session.tokens[index].text.clone();
        let sentence = self.session.sentence.clone();

        debug!(index, word = %word, "Starting definition card");
        let base_form = self
            .annotator
            .base_form_of(&word, Some(sentence.as_str()))
            .await?;
        let base_form = if base_form.is_empty() {
            word.clone()
        } else {
            base_form
        };
        let candidates = self.find_images(&base_form).await?;

        let draft = CardDraft::Definition(DefinitionDraft {
            original_word: word,
            base_form,
            sentence,
            article: None,
            ipa: None,
            audio_url: None,
            image_url: None,
            hint: String::new(),
            info: String::new(),
        });

        info!(index, candidates = candidates.urls.len(), "Definition draft ready");
        self.session.open_draft(index, draft, candidates)
    }

    /// Fill article and IPA of the pending definition draft.
    ///
    /// Alternations like `"compañero / compañera"` are looked up by their
    /// first form only.
    pub async fn lookup_pronunciation(&mut self) -> Result<&CardDraft> {
        let word = match self.session.draft.as_ref() {
            Some(CardDraft::Definition(d)) => d.primary_form().to_string(),
            Some(CardDraft::Blank(_)) => {
                return Err(Error::validation("pronunciation applies to definition cards"));
            }
            None => return Err(Error::validation("no draft in progress")),
        };

        debug!(word = %word, "Looking up article and IPA");
        let (article, ipa) = self.annotator.ipa_and_article_for(&word).await?;

        let draft = self.session.draft_mut()?;
        draft.edit(DraftField::Article, &article)?;
        draft.edit(DraftField::Ipa, &ipa)?;
        Ok(&*draft)
    }

    /// Search images for the pending draft with a user-supplied query,
    /// as-is. On failure the previous candidates stay.
    pub async fn search_images(&mut self, query: &str) -> Result<&ImageCandidates> {
        self.session.draft_mut()?;
        let query = query.trim();
        if query.is_empty() {
            return Err(Error::validation("search query is empty"));
        }

        let urls = self.images.search_images(query).await?;
        debug!(query = %query, results = urls.len(), "Image search done");
        self.session.set_candidates(ImageCandidates {
            query: query.to_string(),
            urls,
        })
    }

    /// See [`Session::select_image`].
    pub fn select_image(&mut self, url: impl Into<String>) -> Result<()> {
        self.session.select_image(url)
    }

    /// See [`Session::select_candidate`].
    pub fn select_candidate(&mut self, n: usize) -> Result<&str> {
        self.session.select_candidate(n)
    }

    /// Copy a local picture into the media store and use it as the image.
    ///
    /// If the copy fails the draft keeps its previous image.
    pub fn upload_image(&mut self, source: impl AsRef<Path>) -> Result<PathBuf> {
        self.session.draft_mut()?;
        let stored = self.media.import_image(source)?;
        self.session
            .select_image(stored.to_string_lossy().into_owned())?;
        Ok(stored)
    }

    /// Copy a recording into the media store and attach it.
    ///
    /// Definition cards only. If the copy fails nothing is attached.
    pub fn upload_audio(&mut self, source: impl AsRef<Path>) -> Result<PathBuf> {
        if let CardDraft::Blank(_) = self.session.draft_mut()? {
            return Err(Error::validation("blank cards have no audio"));
        }
        let stored = self.media.import_audio(source)?;
        self.session
            .attach_audio(stored.to_string_lossy().into_owned())?;
        Ok(stored)
    }

    /// See [`Session::attach_audio`].
    pub fn attach_audio(&mut self, path: impl Into<String>) -> Result<()> {
        self.session.attach_audio(path)
    }

    /// See [`Session::edit_field`].
    pub fn edit_field(&mut self, field: DraftField, value: &str) -> Result<()> {
        self.session.edit_field(field, value)
    }

    /// See [`Session::commit`].
    pub fn commit(&mut self) -> Result<&CommittedCard> {
        let card = self.session.commit()?;
        info!(kind = card.card().kind(), "Card committed");
        Ok(card)
    }

    /// See [`Session::discard`].
    pub fn discard(&mut self) {
        self.session.discard();
    }

    /// See [`Session::remove_committed`].
    pub fn remove_committed(&mut self, position: usize) -> Result<CommittedCard> {
        self.session.remove_committed(position)
    }

    async fn find_images(&self, text: &str) -> Result<ImageCandidates> {
        let query = self.images.refine_query(text).await?;
        let urls = self.images.search_images(&query).await?;
        Ok(ImageCandidates { query, urls })
    }
}
