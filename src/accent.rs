//! Accent variants supported by the transcriber.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::TranscribeError;

/// Target accent for a transcription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Accent {
    /// Received Pronunciation.
    Rp,
    /// General American.
    American,
}

impl Accent {
    /// Every supported accent, in the order they are listed to callers.
    pub const ALL: [Accent; 2] = [Accent::Rp, Accent::American];

    /// Lower-case code used on the wire (`"rp"`, `"american"`).
    pub fn code(self) -> &'static str {
        match self {
            Accent::Rp => "rp",
            Accent::American => "american",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Accent::Rp => "Received Pronunciation (British Standard)",
            Accent::American => "General American (American Standard)",
        }
    }

    /// Comma-separated list of accent codes, for error messages.
    pub fn supported_list() -> String {
        Self::ALL.iter().map(|a| a.code()).collect::<Vec<_>>().join(", ")
    }

    /// Apply the display convention for a finished transcription.
    ///
    /// American output is wrapped in phonemic slashes.  RP output already
    /// carries explicit boundary markers and is returned unchanged.
    pub fn present(self, ipa: &str) -> String {
        match self {
            Accent::Rp => ipa.to_string(),
            Accent::American => format!("/{}/", ipa),
        }
    }
}

impl fmt::Display for Accent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Accent {
    type Err = TranscribeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "rp" => Ok(Accent::Rp),
            "american" => Ok(Accent::American),
            _ => Err(TranscribeError::UnsupportedAccent { requested: s.to_string() }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_case_insensitive() {
        assert_eq!("rp".parse::<Accent>().unwrap(), Accent::Rp);
        assert_eq!("RP".parse::<Accent>().unwrap(), Accent::Rp);
        assert_eq!("American".parse::<Accent>().unwrap(), Accent::American);
    }

    #[test]
    fn test_parse_unsupported() {
        let err = "scottish".parse::<Accent>().unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("scottish"), "got: {}", msg);
        assert!(msg.contains("rp, american"), "got: {}", msg);
    }

    #[test]
    fn test_parse_rejects_padding() {
        for s in [" rp ", "rp\n", "\tamerican"] {
            assert!(s.parse::<Accent>().is_err(), "accepted {:?}", s);
        }
    }

    #[test]
    fn test_present() {
        assert_eq!(Accent::American.present("hɪr"), "/hɪr/");
        assert_eq!(Accent::Rp.present("hɪə //"), "hɪə //");
    }

    #[test]
    fn test_serde_lowercase() {
        assert_eq!(serde_json::to_string(&Accent::American).unwrap(), "\"american\"");
        let a: Accent = serde_json::from_str("\"rp\"").unwrap();
        assert_eq!(a, Accent::Rp);
    }
}
