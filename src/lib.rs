//! # ipa-transcribe
//!
//! English → IPA transcription for Received Pronunciation and General
//! American, with connected-speech processing: weak forms of function words,
//! linking /r/, and the /ðə/ ~ /ði/ alternation of the definite article.
//!
//! ## Quick start
//!
//! ```no_run
//! use ipa_transcribe::Transcriber;
//!
//! let t = Transcriber::default();
//!
//! assert_eq!(t.transcribe("I am happy.", "rp", true).unwrap(), "aɪ əm ˈhæpi //");
//! assert_eq!(t.transcribe("he is here.", "american", true).unwrap(), "hiː s hɪr.");
//! ```
//!
//! Words missing from the bundled dictionary are looked up in a G2P table
//! (see [`g2p`]).  Point the transcriber at one explicitly:
//!
//! ```no_run
//! use std::sync::Arc;
//! use ipa_transcribe::{FallbackG2p, PhoneticDictionary, Transcriber};
//!
//! let g2p = Arc::new(FallbackG2p::from_path("/usr/share/ipa-transcribe/g2p_en.tsv"));
//! let t = Transcriber::new(PhoneticDictionary::shared(), g2p);
//! let ipa = t.transcribe_to_american("the zebra", true).unwrap();
//! ```
//!
//! ## Pipeline
//! 1. **Tokenisation**: each line → word / contraction / punctuation tokens.
//! 2. **Weak-form policy**: ordered rules pick strong or weak forms.
//! 3. **Dictionary**: accent-specific pronunciation, or not found.
//! 4. **G2P fallback**: table lookup plus accent correction.
//! 5. **Linking /r/**: RP only, across word boundaries within a line.
//! 6. **Article allophony**: "the" before a vowel → /ði/.
//! 7. **RP notation**: `.` `,` `?` `!` → `//` `/` `(?)` `(!)`.

// C FFI for iOS / Android, exposes ipa_transcriber_new / transcribe / free.
pub mod ffi;

pub mod accent;
pub mod dictionary;
pub mod error;
pub mod g2p;
pub mod linking;
pub mod notation;
pub mod tokenize;
pub mod transcriber;
pub mod weak_forms;

// ─── Re-exports for convenience ─────────────────────────────────────────────

pub use accent::Accent;
pub use dictionary::{DictionaryEntry, PhoneticDictionary, PronunciationVariant};
pub use error::TranscribeError;
pub use g2p::FallbackG2p;
pub use transcriber::{Transcriber, TranscriberConfig};
pub use weak_forms::WeakFormPolicy;
