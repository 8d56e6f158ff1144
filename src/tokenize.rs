//! Line tokeniser.
//!
//! Splits one line of English text into word tokens (including contractions
//! such as "don't") and punctuation tokens.  Whitespace separates tokens and
//! is never a token itself; any character that is neither a word character
//! nor one of `. , ! ? ; : ' -` is dropped.
//!
//! Tokens borrow from the input line, so the original spelling is always
//! available to later passes (linking-R looks at spelling, not IPA).

use once_cell::sync::Lazy;
use regex::Regex;

// ─────────────────────────────────────────────────────────────────────────────
// Token model
// ─────────────────────────────────────────────────────────────────────────────

/// One token of a source line, in original order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    /// Word or contraction.  `position` is the token's index in the line.
    Word { text: &'a str, position: usize },
    /// Maximal run of `. , ! ? ; : ' -`.
    Punctuation { text: &'a str },
}

impl<'a> Token<'a> {
    /// Original surface form.
    pub fn text(&self) -> &'a str {
        match self {
            Token::Word { text, .. } | Token::Punctuation { text } => text,
        }
    }

    pub fn is_word(&self) -> bool {
        matches!(self, Token::Word { .. })
    }

    pub fn is_punctuation(&self) -> bool {
        matches!(self, Token::Punctuation { .. })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tokenisation
// ─────────────────────────────────────────────────────────────────────────────

/// Word (optionally with one internal apostrophe) or a run of punctuation.
static RE_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\w+(?:'\w+)?)|([.,!?;:'\-]+)").unwrap());

/// Split `line` into tokens.
///
/// An empty or whitespace-only line yields no tokens.  Callers are expected
/// to pass a single line; a newline inside `line` is treated as whitespace.
pub fn tokenize(line: &str) -> Vec<Token<'_>> {
    RE_TOKEN
        .captures_iter(line)
        .enumerate()
        .map(|(position, caps)| match caps.get(1) {
            Some(word) => Token::Word { text: word.as_str(), position },
            None => Token::Punctuation { text: caps.get(0).map_or("", |m| m.as_str()) },
        })
        .collect()
}

/// Index of the last word token, if any.
pub fn last_word_index(tokens: &[Token<'_>]) -> Option<usize> {
    tokens.iter().rposition(Token::is_word)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
