//! Whole-text passes that run after every line has been transcribed.

use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::linking::IPA_VOWELS;

// ─────────────────────────────────────────────────────────────────────────────
// Definite article allophony
// ─────────────────────────────────────────────────────────────────────────────

/// `ðə` as a whole token, followed on the same line by a vowel-initial token.
static RE_THE_BEFORE_VOWEL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"(?m)(^|[ \t])ðə([ \t]+[ˈˌ]?[{}])", IPA_VOWELS)).unwrap()
});

/// Rewrite "the" /ðə/ to /ði/ before a vowel; consonant contexts are kept.
///
/// Matching stays within a line: each source line is its own utterance.
pub fn apply_article_allophony(text: &str) -> Cow<'_, str> {
    RE_THE_BEFORE_VOWEL.replace_all(text, "${1}ði${2}")
}

// ─────────────────────────────────────────────────────────────────────────────
// RP boundary notation
// ─────────────────────────────────────────────────────────────────────────────

/// Replace sentence punctuation with RP intonation / boundary markers.
///
/// | input | output |
/// |-------|--------|
/// | `!`   | `(!)`  |
/// | `?`   | `(?)`  |
/// | `.`   | ` //`  |
/// | `,`   | ` /`   |
pub fn format_rp_notation(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 8);
    for c in text.chars() {
        match c {
            '!' => out.push_str("(!)"),
            '?' => out.push_str("(?)"),
            '.' => out.push_str(" //"),
            ',' => out.push_str(" /"),
            _ => out.push(c),
        }
    }
    out
}

/// Remove primary and secondary stress marks.
pub fn strip_stress(text: &str) -> String {
    text.chars().filter(|c| !matches!(c, 'ˈ' | 'ˌ')).collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_the_before_vowel() {
        assert_eq!(apply_article_allophony("ðə ˈæpl"), "ði ˈæpl");
        assert_eq!(apply_article_allophony("ɪt ɪz ðə end"), "ɪt ɪz ði end");
    }

    #[test]
    fn test_the_before_consonant() {
        assert_eq!(apply_article_allophony("ðə kæt"), "ðə kæt");
    }

    #[test]
    fn test_the_inside_word_untouched() {
        assert_eq!(apply_article_allophony("ˈbrʌðə ɪz"), "ˈbrʌðə ɪz");
    }

    #[test]
    fn test_the_does_not_cross_lines() {
        assert_eq!(apply_article_allophony("ðə\nˈæpl"), "ðə\nˈæpl");
        assert_eq!(apply_article_allophony("kæt\nðə ˈæpl"), "kæt\nði ˈæpl");
    }

    #[test]
    fn test_the_at_line_end() {
        assert_eq!(apply_article_allophony("ɪn ðə"), "ɪn ðə");
    }

    #[test]
    fn test_rp_notation() {
        assert_eq!(format_rp_notation("aɪ əm ˈhæpi."), "aɪ əm ˈhæpi //");
        assert_eq!(format_rp_notation("jes, nəʊ"), "jes / nəʊ");
        assert_eq!(format_rp_notation("huː?"), "huː(?)");
        assert_eq!(format_rp_notation("nəʊ!"), "nəʊ(!)");
    }

    #[test]
    fn test_strip_stress() {
        assert_eq!(strip_stress("ˈhæpi ˌnjuː"), "hæpi njuː");
    }
}
