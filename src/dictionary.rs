//! Phonetic dictionary and resolver.
//!
//! The bundled dictionary (`data/dictionary.json`) maps a normalised lemma to
//! one pronunciation per accent.  Function words carry a strong and a weak
//! form; everything else carries a single form:
//!
//! ```json
//! { "and":   { "rp": { "strong": "ænd", "weak": "ən" }, "american": { "strong": "ænd", "weak": "ən" } },
//!   "happy": { "rp": "ˈhæpi", "american": "ˈhæpi" } }
//! ```

use std::{collections::HashMap, sync::Arc};

use once_cell::sync::Lazy;
use serde::Deserialize;

use crate::accent::Accent;

/// Bundled dictionary payload.
const DICTIONARY_JSON: &str = include_str!("../data/dictionary.json");

static BUILTIN: Lazy<Arc<PhoneticDictionary>> = Lazy::new(|| {
    let dict = PhoneticDictionary::from_json(DICTIONARY_JSON).expect("bundled dictionary.json is malformed");
    Arc::new(dict)
});

// ─────────────────────────────────────────────────────────────────────────────
// Data model
// ─────────────────────────────────────────────────────────────────────────────

/// Pronunciation of one word in one accent.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum PronunciationVariant {
    /// No weak form; rendered the same in every context.
    Fixed(String),
    /// Function word with a stressed and (usually) a reduced form.
    Alternating {
        strong: String,
        #[serde(default)]
        weak: Option<String>,
    },
}

impl PronunciationVariant {
    /// Pick the form to render.  `weak` is honoured only when a weak form exists.
    pub fn select(&self, use_weak: bool) -> &str {
        match self {
            PronunciationVariant::Fixed(ipa) => ipa,
            PronunciationVariant::Alternating { weak: Some(reduced), .. } if use_weak => reduced,
            PronunciationVariant::Alternating { strong, .. } => strong,
        }
    }

    pub fn has_weak_form(&self) -> bool {
        matches!(self, PronunciationVariant::Alternating { weak: Some(_), .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DictionaryEntry {
    pub rp: PronunciationVariant,
    pub american: PronunciationVariant,
}

impl DictionaryEntry {
    pub fn for_accent(&self, accent: Accent) -> &PronunciationVariant {
        match accent {
            Accent::Rp => &self.rp,
            Accent::American => &self.american,
        }
    }
}

/// Lower-case `word` and keep only letters, digits and apostrophes.
///
/// Apostrophes survive so that contractions ("don't", "they're") keep their
/// own entries.
pub fn normalize_word(word: &str) -> String {
    word.chars()
        .filter(|c| c.is_alphanumeric() || *c == '\'')
        .flat_map(char::to_lowercase)
        .collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// PhoneticDictionary
// ─────────────────────────────────────────────────────────────────────────────

/// Read-only word → accent → pronunciation table.
#[derive(Debug, Clone, Default)]
pub struct PhoneticDictionary {
    entries: HashMap<String, DictionaryEntry>,
}

impl PhoneticDictionary {
    /// The dictionary shipped with the crate, parsed on first use.
    pub fn builtin() -> &'static PhoneticDictionary {
        &BUILTIN
    }

    /// Shared handle to [`builtin`](Self::builtin).  Every call returns the
    /// same allocation; the table is never copied.
    pub fn shared() -> Arc<PhoneticDictionary> {
        Arc::clone(&BUILTIN)
    }

    /// Parse a dictionary from its JSON representation.
    ///
    /// Keys are normalised with [`normalize_word`]; if two keys normalise to
    /// the same lemma the later one wins.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let raw: HashMap<String, DictionaryEntry> = serde_json::from_str(json)?;
        let entries = raw.into_iter().map(|(k, v)| (normalize_word(&k), v)).collect();
        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, word: &str) -> Option<&DictionaryEntry> {
        self.entries.get(&normalize_word(word))
    }

    pub fn contains(&self, word: &str) -> bool {
        self.get(word).is_some()
    }

    /// Resolve `word` for `accent`.
    ///
    /// Returns `None` when the normalised word has no entry.  Words without a
    /// weak form ignore `use_weak`.
    pub fn resolve(&self, word: &str, accent: Accent, use_weak: bool) -> Option<&str> {
        self.get(word).map(|entry| entry.for_accent(accent).select(use_weak))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_parses() {
        let dict = PhoneticDictionary::builtin();
        assert!(dict.len() > 100, "got {} entries", dict.len());
        assert!(dict.contains("the"));
        assert!(dict.contains("don't"));
    }

    #[test]
    fn test_shared_is_one_table() {
        let a = PhoneticDictionary::shared();
        let b = PhoneticDictionary::shared();
        assert!(Arc::ptr_eq(&a, &b));
        assert!(std::ptr::eq(&*a, PhoneticDictionary::builtin()));
    }

    #[test]
    fn test_normalize_word() {
        assert_eq!(normalize_word("Don't"), "don't");
        assert_eq!(normalize_word("Hello,"), "hello");
        assert_eq!(normalize_word("\"Quoted\""), "quoted");
        assert_eq!(normalize_word("R2-D2"), "r2d2");
    }

    #[test]
    fn test_resolve_alternating() {
        let dict = PhoneticDictionary::builtin();
        assert_eq!(dict.resolve("and", Accent::Rp, false), Some("ænd"));
        assert_eq!(dict.resolve("and", Accent::Rp, true), Some("ən"));
        assert_eq!(dict.resolve("AND", Accent::American, true), Some("ən"));
    }

    #[test]
    fn test_resolve_fixed_ignores_weak_flag() {
        let dict = PhoneticDictionary::builtin();
        for word in ["happy", "the", "water", "hello"] {
            assert_eq!(
                dict.resolve(word, Accent::Rp, true),
                dict.resolve(word, Accent::Rp, false),
                "word: {}",
                word
            );
        }
    }

    #[test]
    fn test_resolve_accent_differences() {
        let dict = PhoneticDictionary::builtin();
        assert_eq!(dict.resolve("car", Accent::Rp, false), Some("kɑː"));
        assert_eq!(dict.resolve("car", Accent::American, false), Some("kɑr"));
    }

    #[test]
    fn test_resolve_missing() {
        let dict = PhoneticDictionary::builtin();
        assert_eq!(dict.resolve("zyzzyva", Accent::Rp, true), None);
        assert_eq!(dict.resolve("", Accent::Rp, true), None);
    }

    #[test]
    fn test_strong_only_pair() {
        let dict = PhoneticDictionary::from_json(
            r#"{ "foo": { "rp": { "strong": "fuː" }, "american": "fuː" } }"#,
        )
        .unwrap();
        assert_eq!(dict.resolve("foo", Accent::Rp, true), Some("fuː"));
        assert!(!dict.get("foo").unwrap().rp.has_weak_form());
    }

    #[test]
    fn test_rejects_missing_accent_key() {
        let err = PhoneticDictionary::from_json(r#"{ "foo": { "rp": "fuː" } }"#);
        assert!(err.is_err());
    }

    #[test]
    fn test_rejects_bad_shape() {
        let err = PhoneticDictionary::from_json(r#"{ "foo": { "rp": 3, "american": "fuː" } }"#);
        assert!(err.is_err());
    }
}
