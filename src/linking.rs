//! Linking /r/ for non-rhotic (RP) output.
//!
//! In RP a word spelled with a final "r" ("car", "here", "they're") loses the
//! /r/ before a consonant or a pause but pronounces it before a vowel:
//! "car" /kɑː/, "car engine" /kɑːr ˈendʒɪn/.  This pass appends `r` to the
//! first of two consecutive words when
//!
//! * the first word's spelling ends in `r` or `re` (so "they're" qualifies);
//! * its transcription ends in a vowel (length mark allowed) and not in `r`;
//! * the second word's transcription starts with a vowel (stress mark allowed);
//! * the first word is not one of [`EXCEPTIONS`].
//!
//! Punctuation tokens are skipped when pairing words.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::accent::Accent;
use crate::dictionary::normalize_word;
use crate::tokenize::Token;

/// IPA vowel symbols used by the dictionary and the G2P cleanup.
pub const IPA_VOWELS: &str = "aeiouæɑɒɔəɜɪʊʌɛɐ";

/// Words whose RP form already realises the /r/ context differently.
pub const EXCEPTIONS: &[&str] = &["more", "sure", "pure"];

static RE_R_SPELLING: Lazy<Regex> = Lazy::new(|| Regex::new(r"re?$").unwrap());
static RE_VOWEL_FINAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!("[{}]ː?$", IPA_VOWELS)).unwrap());
static RE_VOWEL_INITIAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!("^[ˈˌ]?[{}]", IPA_VOWELS)).unwrap());

// ─────────────────────────────────────────────────────────────────────────────
// Conditions
// ─────────────────────────────────────────────────────────────────────────────

fn spelled_with_final_r(normalized: &str) -> bool {
    RE_R_SPELLING.is_match(normalized)
}

pub fn ends_in_vowel(ipa: &str) -> bool {
    RE_VOWEL_FINAL.is_match(ipa)
}

pub fn starts_with_vowel(ipa: &str) -> bool {
    RE_VOWEL_INITIAL.is_match(ipa)
}

/// Whether `first` (spelling + IPA) takes a linking /r/ before `next_ipa`.
pub fn takes_linking_r(first_spelling: &str, first_ipa: &str, next_ipa: &str) -> bool {
    let normalized = normalize_word(first_spelling);
    spelled_with_final_r(&normalized)
        && ends_in_vowel(first_ipa)
        && starts_with_vowel(next_ipa)
        && !first_ipa.ends_with('r')
        && !EXCEPTIONS.contains(&normalized.as_str())
}

// ─────────────────────────────────────────────────────────────────────────────
// Pass
// ─────────────────────────────────────────────────────────────────────────────

/// Insert linking /r/ into a transcribed line.
///
/// `line` pairs each token with its current transcription (punctuation tokens
/// carry their own text).  No-op for American or for fewer than two tokens.
pub fn apply_linking_r(line: &mut [(Token<'_>, String)], accent: Accent) {
    if accent != Accent::Rp || line.len() < 2 {
        return;
    }
    let words: Vec<usize> = line
        .iter()
        .enumerate()
        .filter(|(_, (tok, _))| tok.is_word())
        .map(|(i, _)| i)
        .collect();

    for pair in words.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if takes_linking_r(line[a].0.text(), &line[a].1, &line[b].1) {
            line[a].1.push('r');
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenize::tokenize;

    fn run(text: &str, ipa: &[&str], accent: Accent) -> Vec<String> {
        let tokens = tokenize(text);
        assert_eq!(tokens.len(), ipa.len());
        let mut line: Vec<_> = tokens.into_iter().zip(ipa.iter().map(|s| s.to_string())).collect();
        apply_linking_r(&mut line, accent);
        line.into_iter().map(|(_, s)| s).collect()
    }

    #[test]
    fn test_spelling_heuristic() {
        for w in ["car", "here", "they're", "water", "fire", "far"] {
            assert!(spelled_with_final_r(w), "{}", w);
        }
        for w in ["idea", "fairy", "cars", "arm", "sofa"] {
            assert!(!spelled_with_final_r(w), "{}", w);
        }
    }

    #[test]
    fn test_vowel_classes() {
        assert!(ends_in_vowel("kɑː"));
        assert!(ends_in_vowel("hɪə"));
        assert!(!ends_in_vowel("kæt"));
        assert!(starts_with_vowel("ɪz"));
        assert!(starts_with_vowel("ˈæpl"));
        assert!(!starts_with_vowel("ˈhæpi"));
    }

    #[test]
    fn test_links_before_vowel_rp() {
        let out = run("far away", &["fɑː", "əˈweɪ"], Accent::Rp);
        assert_eq!(out, vec!["fɑːr", "əˈweɪ"]);
    }

    #[test]
    fn test_american_unchanged() {
        let out = run("far away", &["fɑː", "əˈweɪ"], Accent::American);
        assert_eq!(out, vec!["fɑː", "əˈweɪ"]);
    }

    #[test]
    fn test_no_link_before_consonant() {
        let out = run("far gone", &["fɑː", "ɡɒn"], Accent::Rp);
        assert_eq!(out[0], "fɑː");
    }

    #[test]
    fn test_no_link_without_r_spelling() {
        let out = run("idea of", &["aɪˈdɪə", "əv"], Accent::Rp);
        assert_eq!(out[0], "aɪˈdɪə");
    }

    #[test]
    fn test_exceptions() {
        let out = run("more apples", &["mɔː", "ˈæplz"], Accent::Rp);
        assert_eq!(out[0], "mɔː");
        let out = run("sure it", &["ʃɔː", "ɪt"], Accent::Rp);
        assert_eq!(out[0], "ʃɔː");
    }

    #[test]
    fn test_already_r_final() {
        let out = run("car and", &["kɑr", "ən"], Accent::Rp);
        assert_eq!(out[0], "kɑr");
    }

    #[test]
    fn test_skips_punctuation() {
        let out = run("here, is", &["hɪə", ",", "ɪz"], Accent::Rp);
        assert_eq!(out, vec!["hɪər", ",", "ɪz"]);
    }

    #[test]
    fn test_single_token_noop() {
        let out = run("car", &["kɑː"], Accent::Rp);
        assert_eq!(out, vec!["kɑː"]);
    }
}
