//! Transcription pipeline.
//!
//! ```text
//! text ──split('\n')──▶ line ──tokenize──▶ tokens
//!                              │
//!                              ├─ word:  weak-form policy ─▶ dictionary ─▶ G2P fallback
//!                              └─ punct: kept as is
//!                              ▼
//!                         linking /r/ (RP)
//!                              ▼
//!      lines joined ──▶ the → ði before vowels ──▶ RP notation ──▶ stress strip
//! ```
//!
//! Each line is transcribed independently; the whole-text passes run once
//! over the joined result.

use std::sync::Arc;

use anyhow::Result as AnyResult;

use crate::{
    accent::Accent,
    dictionary::PhoneticDictionary,
    error::{Result, TranscribeError},
    g2p::FallbackG2p,
    linking::apply_linking_r,
    notation::{apply_article_allophony, format_rp_notation, strip_stress},
    tokenize::{tokenize, Token},
    weak_forms::WeakFormPolicy,
};

// ─────────────────────────────────────────────────────────────────────────────
// Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Switches for the optional passes of the pipeline.
#[derive(Debug, Clone)]
pub struct TranscriberConfig {
    /// Insert linking /r/ in RP output.
    pub linking_r: bool,
    /// Render "the" as /ði/ before vowels.
    pub article_allophony: bool,
    /// Turn punctuation into boundary markers in RP output.
    pub rp_notation: bool,
    /// Drop ˈ and ˌ from the final output.
    pub ignore_stress: bool,
    /// Add the lexical "there" / "that" rules to the weak-form policy.
    pub contextual_rules: bool,
}

impl Default for TranscriberConfig {
    fn default() -> Self {
        Self {
            linking_r: true,
            article_allophony: true,
            rp_notation: true,
            ignore_stress: false,
            contextual_rules: false,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Transcriber
// ─────────────────────────────────────────────────────────────────────────────

/// English → IPA transcriber for RP and General American.
///
/// Cheap to clone; the dictionary and the G2P table are shared.
#[derive(Debug, Clone)]
pub struct Transcriber {
    dictionary: Arc<PhoneticDictionary>,
    g2p: Arc<FallbackG2p>,
    policy: WeakFormPolicy,
    config: TranscriberConfig,
}

impl Default for Transcriber {
    /// Bundled dictionary, G2P table from the default location.
    fn default() -> Self {
        Self::new(
            PhoneticDictionary::shared(),
            Arc::new(FallbackG2p::from_default_location()),
        )
    }
}

impl Transcriber {
    pub fn new(dictionary: Arc<PhoneticDictionary>, g2p: Arc<FallbackG2p>) -> Self {
        Self::with_config(dictionary, g2p, TranscriberConfig::default())
    }

    pub fn with_config(
        dictionary: Arc<PhoneticDictionary>,
        g2p: Arc<FallbackG2p>,
        config: TranscriberConfig,
    ) -> Self {
        let policy = if config.contextual_rules {
            WeakFormPolicy::with_contextual_rules()
        } else {
            WeakFormPolicy::default()
        };
        Self { dictionary, g2p, policy, config }
    }

    /// Replace the weak-form rule chain.
    pub fn with_policy(mut self, policy: WeakFormPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn config(&self) -> &TranscriberConfig {
        &self.config
    }

    pub fn dictionary(&self) -> &PhoneticDictionary {
        &self.dictionary
    }

    pub fn g2p(&self) -> &FallbackG2p {
        &self.g2p
    }

    // ── Public contract ───────────────────────────────────────────────────────

    /// Transcribe `text` for the accent named by `accent` (`"rp"` / `"american"`).
    ///
    /// The accent is validated before anything else; an unsupported accent is
    /// an error even for empty text.
    pub fn transcribe(&self, text: &str, accent: &str, use_weak_forms: bool) -> Result<String> {
        let accent: Accent = accent.parse()?;
        self.transcribe_with(text, accent, use_weak_forms)
    }

    pub fn transcribe_to_rp(&self, text: &str, use_weak_forms: bool) -> Result<String> {
        self.transcribe_with(text, Accent::Rp, use_weak_forms)
    }

    pub fn transcribe_to_american(&self, text: &str, use_weak_forms: bool) -> Result<String> {
        self.transcribe_with(text, Accent::American, use_weak_forms)
    }

    /// Typed entry point behind [`transcribe`](Self::transcribe).
    pub fn transcribe_with(&self, text: &str, accent: Accent, use_weak_forms: bool) -> Result<String> {
        if text.trim().is_empty() {
            return Ok(String::new());
        }

        let lines = text
            .split('\n')
            .map(|line| self.transcribe_line(line.trim(), accent, use_weak_forms))
            .collect::<AnyResult<Vec<_>>>()
            .map_err(|source| TranscribeError::Transcription { accent, source })?;
        let mut result = lines.join("\n");

        if self.config.article_allophony {
            result = apply_article_allophony(&result).into_owned();
        }
        if accent == Accent::Rp && self.config.rp_notation {
            result = format_rp_notation(&result);
        }
        if self.config.ignore_stress {
            result = strip_stress(&result);
        }
        Ok(result)
    }

    /// Citation form of a single word: dictionary strong form, else G2P.
    pub fn lookup_word(&self, word: &str, accent: Accent) -> Result<String> {
        match self.dictionary.resolve(word, accent, false) {
            Some(ipa) => Ok(ipa.to_string()),
            None => self
                .g2p
                .lookup(word.trim(), accent)
                .map_err(|source| TranscribeError::Transcription { accent, source }),
        }
    }

    // ── Per-line processing ───────────────────────────────────────────────────

    fn transcribe_line(&self, line: &str, accent: Accent, use_weak_forms: bool) -> AnyResult<String> {
        let tokens = tokenize(line);
        if tokens.is_empty() {
            return Ok(String::new());
        }

        let mut transcribed = Vec::with_capacity(tokens.len());
        for (index, token) in tokens.iter().enumerate() {
            let ipa = match token {
                Token::Word { text, .. } => {
                    let weak = use_weak_forms && self.policy.should_use_weak(text, index, &tokens, line);
                    self.transcribe_word(text, accent, weak)?
                }
                Token::Punctuation { text } => text.to_string(),
            };
            transcribed.push((*token, ipa));
        }

        if self.config.linking_r {
            apply_linking_r(&mut transcribed, accent);
        }

        Ok(join_tokens(&transcribed))
    }

    fn transcribe_word(&self, word: &str, accent: Accent, weak: bool) -> AnyResult<String> {
        if let Some(ipa) = self.dictionary.resolve(word, accent, weak) {
            return Ok(ipa.to_string());
        }
        tracing::debug!(word, %accent, "not in dictionary, using G2P fallback");
        self.g2p.lookup(word, accent)
    }
}

/// Join transcriptions with single spaces; punctuation attaches to the
/// preceding token.
fn join_tokens(tokens: &[(Token<'_>, String)]) -> String {
    let mut out = String::new();
    for (token, ipa) in tokens {
        if token.is_word() && !out.is_empty() {
            out.push(' ');
        }
        out.push_str(ipa);
    }
    out
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: &str = "\
zebra\tˈzɛbɹə
lot\tlɒt
coat\tkəʊt OR koʊt
otter\tˈɒtə
";

    fn transcriber() -> Transcriber {
        Transcriber::new(
            PhoneticDictionary::shared(),
            Arc::new(FallbackG2p::from_table_str(TABLE)),
        )
    }

    #[test]
    fn test_scenario_strong_i_weak_am() {
        let out = transcriber().transcribe("I am happy.", "rp", true).unwrap();
        assert_eq!(out, "aɪ əm ˈhæpi //");
    }

    #[test]
    fn test_scenario_weak_is() {
        let out = transcriber().transcribe("he is here.", "rp", true).unwrap();
        assert_eq!(out, "hiː s hɪə //");
    }

    #[test]
    fn test_scenario_the_apple() {
        let out = transcriber().transcribe("the apple", "rp", true).unwrap();
        assert!(out.contains("ði ˈæpl"), "got: {}", out);
        assert!(!out.contains("ðə"), "got: {}", out);
    }

    #[test]
    fn test_the_before_consonant_kept() {
        let out = transcriber().transcribe("the cat", "american", true).unwrap();
        assert_eq!(out, "ðə kæt");
    }

    #[test]
    fn test_scenario_g2p_american_no_lot_vowel() {
        let t = transcriber();
        let out = t.transcribe("a lot of otter", "american", true).unwrap();
        assert!(!out.contains('ɒ'), "got: {}", out);
        assert!(out.contains("lɑt"), "got: {}", out);
        assert!(out.ends_with("ˈɑtə"), "got: {}", out);
        let rp = t.transcribe("zebra", "rp", true).unwrap();
        assert_eq!(rp, "ˈzebrə");
    }

    #[test]
    fn test_scenario_linking_r() {
        let t = transcriber();
        let rp = t.transcribe("far away", "rp", false).unwrap();
        assert_eq!(rp, "fɑːr əˈweɪ");
        // American "far" is already rhotic; nothing is appended.
        let us = t.transcribe("far away", "american", false).unwrap();
        assert_eq!(us, "fɑr əˈweɪ");
    }

    #[test]
    fn test_linking_r_disabled() {
        let t = Transcriber::with_config(
            PhoneticDictionary::shared(),
            Arc::new(FallbackG2p::disabled()),
            TranscriberConfig { linking_r: false, ..Default::default() },
        );
        assert_eq!(t.transcribe("far away", "rp", false).unwrap(), "fɑː əˈweɪ");
    }

    #[test]
    fn test_unsupported_accent() {
        let t = transcriber();
        for accent in ["scottish", "", "en-us"] {
            match t.transcribe("hello", accent, true) {
                Err(TranscribeError::UnsupportedAccent { requested }) => assert_eq!(requested, accent),
                other => panic!("expected UnsupportedAccent for {:?}, got {:?}", accent, other),
            }
        }
        assert!(t.transcribe("", "scottish", true).is_err());
    }

    #[test]
    fn test_empty_input() {
        let t = transcriber();
        for accent in ["rp", "american"] {
            assert_eq!(t.transcribe("", accent, true).unwrap(), "");
            assert_eq!(t.transcribe("  \n\t ", accent, true).unwrap(), "");
        }
    }

    #[test]
    fn test_lines_independent() {
        let out = transcriber().transcribe("he is here.\n\nthe apple", "rp", true).unwrap();
        assert_eq!(out, "hiː s hɪə //\n\nði ˈæpl");
    }

    #[test]
    fn test_weak_forms_disabled() {
        let out = transcriber().transcribe("he is here.", "rp", false).unwrap();
        assert_eq!(out, "hiː ɪz hɪə //");
    }

    #[test]
    fn test_fixed_words_context_free() {
        let t = transcriber();
        for text in ["happy", "so happy", "happy people", "I am happy, really"] {
            for weak in [true, false] {
                let out = t.transcribe(text, "american", weak).unwrap();
                assert!(out.contains("ˈhæpi"), "{} → {}", text, out);
            }
        }
    }

    #[test]
    fn test_idempotent() {
        let t = transcriber();
        let text = "There are more apples here, aren't there? Yes!";
        let a = t.transcribe(text, "rp", true).unwrap();
        let b = t.transcribe(text, "rp", true).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_american_keeps_punctuation() {
        let out = transcriber().transcribe("no, stop!", "american", true).unwrap();
        assert_eq!(out, "noʊ, stɑp!");
    }

    #[test]
    fn test_rp_notation_markers() {
        let out = transcriber().transcribe("no, stop!", "rp", true).unwrap();
        assert_eq!(out, "nəʊ / stɒp(!)");
    }

    #[test]
    fn test_unknown_word_stays_orthographic() {
        let t = Transcriber::new(
            PhoneticDictionary::shared(),
            Arc::new(FallbackG2p::from_path("/nonexistent/g2p.tsv")),
        );
        let out = t.transcribe("the blorft", "american", true).unwrap();
        assert_eq!(out, "ðə blorft");
    }

    #[test]
    fn test_ignore_stress() {
        let t = Transcriber::with_config(
            PhoneticDictionary::shared(),
            Arc::new(FallbackG2p::disabled()),
            TranscriberConfig { ignore_stress: true, ..Default::default() },
        );
        assert_eq!(t.transcribe("I am happy.", "rp", true).unwrap(), "aɪ əm hæpi //");
    }

    #[test]
    fn test_contextual_rules() {
        let t = Transcriber::with_config(
            PhoneticDictionary::shared(),
            Arc::new(FallbackG2p::disabled()),
            TranscriberConfig { contextual_rules: true, ..Default::default() },
        );
        let out = t.transcribe("I know that he is here", "american", true).unwrap();
        assert!(out.contains("ðət"), "got: {}", out);
    }

    #[test]
    fn test_lookup_word() {
        let t = transcriber();
        assert_eq!(t.lookup_word("And", Accent::Rp).unwrap(), "ænd");
        assert_eq!(t.lookup_word("coat", Accent::American).unwrap(), "koʊt");
        assert_eq!(t.lookup_word("blorft", Accent::Rp).unwrap(), "blorft");
    }

    #[test]
    fn test_convenience_forms() {
        let t = transcriber();
        assert_eq!(
            t.transcribe_to_rp("I am happy.", true).unwrap(),
            t.transcribe("I am happy.", "rp", true).unwrap()
        );
        assert_eq!(
            t.transcribe_to_american("I am happy.", true).unwrap(),
            t.transcribe("I am happy.", "american", true).unwrap()
        );
    }

    #[test]
    fn test_transcribers_share_builtin_dictionary() {
        let a = Transcriber::default();
        let b = transcriber();
        assert!(std::ptr::eq(a.dictionary(), b.dictionary()));
        assert!(std::ptr::eq(a.dictionary(), PhoneticDictionary::builtin()));
    }

    #[test]
    fn test_transcriber_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Transcriber>();
    }
}
