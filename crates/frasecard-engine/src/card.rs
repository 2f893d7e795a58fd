//! Card drafts and committed cards.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::{Error, Result};

/// Replaces the chosen word on the front of a fill-in-the-blank card.
pub const BLANK_MARKER: &str = "_____";

/// A fill-in-the-blank card under construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlankDraft {
    /// The sentence as entered.
    pub sentence: String,
    /// The sentence with the chosen token replaced by [`BLANK_MARKER`].
    pub front: String,
    /// The removed token.
    pub back: String,
    /// Infinitive hint, empty when the word is not a verb.
    pub clue: String,
    /// Token index of the blank.
    pub blank_index: usize,
    /// Chosen picture, remote URL or local path.
    pub image_url: Option<String>,
}

/// A vocabulary card under construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DefinitionDraft {
    /// The token the user picked.
    pub original_word: String,
    /// Dictionary form, possibly `"masculine / feminine"`.
    pub base_form: String,
    /// The sentence the word came from.
    pub sentence: String,
    /// Grammatical article.
    pub article: Option<String>,
    /// IPA transcription.
    pub ipa: Option<String>,
    /// Pronunciation recording.
    pub audio_url: Option<String>,
    /// Chosen picture, remote URL or local path.
    pub image_url: Option<String>,
    /// Free-form hint shown on the question side.
    pub hint: String,
    /// Free-form notes shown on the answer side.
    pub info: String,
}

impl DefinitionDraft {
    /// All alternatives of the base form, trimmed.
    ///
    /// `"compañero / compañera"` yields both forms; a plain form yields
    /// itself.
    pub fn alternatives(&self) -> Vec<&str> {
        self.base_form
            .split('/')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect()
    }

    /// The form used for pronunciation lookups: the first alternative.
    pub fn primary_form(&self) -> &str {
        self.alternatives()
            .first()
            .copied()
            .unwrap_or_else(|| self.original_word.as_str())
    }
}

/// A card under construction, one of the two supported kinds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CardDraft {
    /// Fill-in-the-blank.
    Blank(BlankDraft),
    /// Vocabulary definition.
    Definition(DefinitionDraft),
}

impl CardDraft {
    /// Short kind label.
    pub fn kind(&self) -> &'static str {
        match self {
            CardDraft::Blank(_) => "blank",
            CardDraft::Definition(_) => "definition",
        }
    }

    /// One-line summary, e.g. `El _____ duerme → gato`.
    pub fn headline(&self) -> String {
        match self {
            CardDraft::Blank(d) => format!("{} → {}", d.front, d.back),
            CardDraft::Definition(d) => match d.article.as_deref() {
                Some(article) => format!("{} {} ({})", article, d.base_form, d.original_word),
                None => format!("{} ({})", d.base_form, d.original_word),
            },
        }
    }

    /// Chosen picture, if any.
    pub fn image_url(&self) -> Option<&str> {
        match self {
            CardDraft::Blank(d) => d.image_url.as_deref(),
            CardDraft::Definition(d) => d.image_url.as_deref(),
        }
    }

    pub(crate) fn set_image_url(&mut self, url: String) {
        match self {
            CardDraft::Blank(d) => d.image_url = Some(url),
            CardDraft::Definition(d) => d.image_url = Some(url),
        }
    }

    /// Overwrite one user-editable field.
    ///
    /// The value is stored as given. Fails when the field does not exist on
    /// this kind of card. A blank value clears optional fields.
    pub fn edit(&mut self, field: DraftField, value: &str) -> Result<()> {
        let optional = || (!value.trim().is_empty()).then(|| value.to_string());

        match (self, field) {
            (CardDraft::Blank(d), DraftField::Clue) => d.clue = value.to_string(),
            (CardDraft::Definition(d), DraftField::Article) => d.article = optional(),
            (CardDraft::Definition(d), DraftField::Ipa) => d.ipa = optional(),
            (CardDraft::Definition(d), DraftField::Hint) => d.hint = value.to_string(),
            (CardDraft::Definition(d), DraftField::Info) => d.info = value.to_string(),
            (draft, field) => {
                return Err(Error::validation(format!(
                    "{} cards have no '{}' field",
                    draft.kind(),
                    field
                )));
            }
        }
        Ok(())
    }
}

/// Fields the user may edit in the preview.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftField {
    /// Blank cards: the infinitive hint.
    Clue,
    /// Definition cards: the article.
    Article,
    /// Definition cards: the IPA transcription.
    Ipa,
    /// Definition cards: the question-side hint.
    Hint,
    /// Definition cards: the answer-side notes.
    Info,
}

impl fmt::Display for DraftField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DraftField::Clue => "clue",
            DraftField::Article => "article",
            DraftField::Ipa => "ipa",
            DraftField::Hint => "hint",
            DraftField::Info => "info",
        };
        f.write_str(name)
    }
}

impl FromStr for DraftField {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "clue" => Ok(DraftField::Clue),
            "article" => Ok(DraftField::Article),
            "ipa" => Ok(DraftField::Ipa),
            "hint" => Ok(DraftField::Hint),
            "info" => Ok(DraftField::Info),
            _ => Err(Error::validation(format!(
                "unknown field '{}'. Use clue, article, ipa, hint or info",
                s
            ))),
        }
    }
}

/// A finalized card. Only removal can change the list it lives in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CommittedCard(CardDraft);

impl CommittedCard {
    pub(crate) fn new(draft: CardDraft) -> Self {
        Self(draft)
    }

    /// The card content.
    pub fn card(&self) -> &CardDraft {
        &self.0
    }
}

impl From<CardDraft> for CommittedCard {
    fn from(draft: CardDraft) -> Self {
        Self::new(draft)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn definition(base_form: &str) -> DefinitionDraft {
        DefinitionDraft {
            original_word: "compañeros".to_string(),
            base_form: base_form.to_string(),
            sentence: "Mis compañeros".to_string(),
            article: None,
            ipa: None,
            audio_url: None,
            image_url: None,
            hint: String::new(),
            info: String::new(),
        }
    }

    fn blank() -> CardDraft {
        CardDraft::Blank(BlankDraft {
            sentence: "El gato duerme".to_string(),
            front: "El _____ duerme".to_string(),
            back: "gato".to_string(),
            clue: String::new(),
            blank_index: 1,
            image_url: None,
        })
    }

    #[test]
    fn test_primary_form_of_alternation() {
        let draft = definition("compañero / compañera");
        assert_eq!(draft.alternatives(), ["compañero", "compañera"]);
        assert_eq!(draft.primary_form(), "compañero");
    }

    #[test]
    fn test_primary_form_plural_only() {
        let draft = definition("tijeras");
        assert_eq!(draft.alternatives(), ["tijeras"]);
        assert_eq!(draft.primary_form(), "tijeras");
    }

    #[test]
    fn test_primary_form_falls_back_to_original_word() {
        assert_eq!(definition("  ").primary_form(), "compañeros");
    }

    #[test]
    fn test_edit_field_on_matching_variant() {
        let mut draft = blank();
        draft.edit(DraftField::Clue, " dormir ").unwrap();
        match &draft {
            CardDraft::Blank(d) => assert_eq!(d.clue, " dormir "),
            _ => unreachable!(),
        }

        let mut draft = CardDraft::Definition(definition("gato"));
        draft.edit(DraftField::Article, "el").unwrap();
        draft.edit(DraftField::Ipa, "ˈɡato").unwrap();
        draft.edit(DraftField::Ipa, "  ").unwrap();
        draft.edit(DraftField::Info, " pl. gatos ").unwrap();
        match &draft {
            CardDraft::Definition(d) => {
                assert_eq!(d.article.as_deref(), Some("el"));
                assert_eq!(d.ipa, None);
                assert_eq!(d.info, " pl. gatos ");
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_edit_field_on_wrong_variant() {
        let mut draft = blank();
        let before = draft.clone();
        let err = draft.edit(DraftField::Article, "el").unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert_eq!(draft, before);

        let mut draft = CardDraft::Definition(definition("gato"));
        assert!(draft.edit(DraftField::Clue, "x").is_err());
    }

    #[test]
    fn test_field_from_str() {
        assert_eq!("IPA".parse::<DraftField>().unwrap(), DraftField::Ipa);
        assert_eq!("hint".parse::<DraftField>().unwrap(), DraftField::Hint);
        assert!("front".parse::<DraftField>().is_err());
    }

    #[test]
    fn test_headline() {
        assert_eq!(blank().headline(), "El _____ duerme → gato");
        let mut d = definition("compañero / compañera");
        d.article = Some("el / la".to_string());
        assert_eq!(
            CardDraft::Definition(d).headline(),
            "el / la compañero / compañera (compañeros)"
        );
    }
}
