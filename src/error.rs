//! Error types surfaced by the transcriber.
//!
//! Only two conditions reach the caller: an accent outside the supported set,
//! and an unexpected failure while a line was being processed.  A word that
//! neither the dictionary nor the G2P table knows is *not* an error; it is
//! passed through in its written form.

use crate::accent::Accent;

#[derive(Debug, thiserror::Error)]
pub enum TranscribeError {
    #[error("Accent '{requested}' not supported. Available accents: {}", Accent::supported_list())]
    UnsupportedAccent { requested: String },

    #[error("Error in {accent} IPA transcription: {source:#}")]
    Transcription {
        accent: Accent,
        #[source]
        source: anyhow::Error,
    },
}

pub type Result<T, E = TranscribeError> = std::result::Result<T, E>;
