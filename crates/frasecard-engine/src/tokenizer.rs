//! Sentence tokenization.
//!
//! A sentence is split into words (runs of Unicode letters, digits and
//! underscores) and the standalone punctuation marks `¿ ¡ ? . , ; : !`.
//! Everything else separates tokens and is dropped.
//!
//! ```
//! use frasecard_engine::tokenizer::tokenize;
//!
//! let words: Vec<_> = tokenize("¿Dónde está el gato?")
//!     .into_iter()
//!     .map(|t| t.text)
//!     .collect();
//! assert_eq!(words, ["¿", "Dónde", "está", "el", "gato", "?"]);
//! ```

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

static TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\w+|[¿¡?.,;:!]").expect("token pattern is valid"));

/// One selectable unit of a sentence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    /// The token text as it appears in the sentence.
    pub text: String,
    /// Position in the token sequence.
    pub index: usize,
}

/// Split a sentence into tokens, in order.
pub fn tokenize(sentence: &str) -> Vec<Token> {
    TOKEN_RE
        .find_iter(sentence)
        .enumerate()
        .map(|(index, m)| Token {
            text: m.as_str().to_string(),
            index,
        })
        .collect()
}

/// Join tokens with single spaces, optionally replacing one of them.
pub fn join_tokens(tokens: &[Token], replace: Option<(usize, &str)>) -> String {
    tokens
        .iter()
        .map(|token| match replace {
            Some((index, with)) if index == token.index => with,
            _ => token.text.as_str(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(sentence: &str) -> Vec<String> {
        tokenize(sentence).into_iter().map(|t| t.text).collect()
    }

    #[test]
    fn test_spanish_question() {
        assert_eq!(
            texts("¿Dónde está el gato?"),
            ["¿", "Dónde", "está", "el", "gato", "?"]
        );
    }

    #[test]
    fn test_indices_are_positions() {
        let tokens = tokenize("¡Hola, mundo!");
        let indices: Vec<_> = tokens.iter().map(|t| t.index).collect();
        assert_eq!(indices, [0, 1, 2, 3, 4]);
        assert_eq!(tokens[2].text, ",");
    }

    #[test]
    fn test_empty_and_whitespace() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("   \t\n ").is_empty());
    }

    #[test]
    fn test_other_symbols_are_separators() {
        assert_eq!(texts("«Sí» - dijo"), ["Sí", "dijo"]);
        assert_eq!(texts("niño_1 año2"), ["niño_1", "año2"]);
    }

    #[test]
    fn test_tokenize_is_idempotent() {
        let sentence = "Los compañeros, ¿vienen mañana?";
        assert_eq!(tokenize(sentence), tokenize(sentence));
        let rejoined = join_tokens(&tokenize(sentence), None);
        assert_eq!(tokenize(&rejoined), tokenize(sentence));
    }

    #[test]
    fn test_join_with_replacement() {
        let tokens = tokenize("El gato duerme.");
        assert_eq!(join_tokens(&tokens, None), "El gato duerme .");
        assert_eq!(
            join_tokens(&tokens, Some((1, "_____"))),
            "El _____ duerme ."
        );
    }
}
