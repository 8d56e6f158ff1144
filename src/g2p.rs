//! Fallback grapheme-to-phoneme lookup for words missing from the dictionary.
//!
//! The G2P table is a plain-text file, one entry per line:
//!
//! ```text
//! # comment
//! hello	həˈləʊ OR hɛˈləʊ
//! zebra	ˈzɛbrə
//! ```
//!
//! The key and the IPA are separated by whitespace; the IPA may hold several
//! alternatives separated by ` OR `, of which only the first is used.
//!
//! The table is loaded lazily, at most once per [`FallbackG2p`] handle, even
//! when several threads make their first lookup at the same time.  A load
//! failure is logged once and then every lookup degrades to returning the
//! written word unchanged.
//!
//! ## Accent correction
//! Table IPA goes through an accent-neutral cleanup (`ɹ→r`, `ɛ→e`, `ɐ→ə`) so it
//! matches the symbols used by the bundled dictionary.  For General American
//! a further correction table rewrites RP-style vowels and centring diphthongs:
//!
//! | RP   | American | set    |
//! |------|----------|--------|
//! | ɒ    | ɑ        | LOT    |
//! | əʊ   | oʊ       | GOAT   |
//! | ɪə   | ɪr       | NEAR   |
//! | eə   | er       | SQUARE |
//! | ʊə   | ʊr       | CURE   |
//! | ɜː   | ɜr       | NURSE  |
//! | ɑː#  | ɑr       | START (word-final) |

use std::{
    collections::HashMap,
    fs,
    ops::Range,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use fancy_regex::Regex;
use once_cell::sync::{Lazy, OnceCell};

use crate::accent::Accent;

/// Separator between alternative transcriptions in the table.
pub const ALTERNATIVE_SEPARATOR: &str = " OR ";

/// Environment variable naming the G2P table file.
pub const G2P_TABLE_ENV: &str = "IPA_G2P_TABLE";

/// System-wide fallback location for the table.
const SYSTEM_TABLE_PATH: &str = "/usr/share/ipa-transcribe/g2p_en.tsv";

// ─────────────────────────────────────────────────────────────────────────────
// Accent correction
// ─────────────────────────────────────────────────────────────────────────────

/// Accent-neutral symbol canonicalisation.
const CLEANUP: &[(char, char)] = &[('ɹ', 'r'), ('ɛ', 'e'), ('ɐ', 'ə')];

/// American corrections in priority order.  An earlier rule claims its
/// symbols before any later rule is tried.
const AMERICAN_CORRECTIONS: &[(&str, &str)] = &[
    ("ɒ", "ɑ"),
    ("əʊ", "oʊ"),
    ("ɪə", "ɪr"),
    ("eə", "er"),
    ("ʊə", "ʊr"),
    ("ɜː", "ɜr"),
    (r"ɑː(?=\s|$)", "ɑr"),
];

/// American corrections, compiled once, in table order.
static AMERICAN_RULES: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    AMERICAN_CORRECTIONS
        .iter()
        .map(|(pat, to)| (Regex::new(pat).unwrap(), *to))
        .collect()
});

/// Apply the corrections one rule at a time, in table order.
///
/// Text written by a rule is locked: later rules never match across it, so a
/// replacement is never re-read and an earlier rule always gets first claim
/// on the symbols it matches, wherever they sit in the string.
fn apply_american_rules(ipa: &str) -> Result<String> {
    let mut text = ipa.to_string();
    // Byte ranges of `text` written by earlier rules, sorted by start.
    let mut locked: Vec<Range<usize>> = Vec::new();

    for (re, to) in AMERICAN_RULES.iter() {
        let mut out = String::with_capacity(text.len());
        // (old range, new range) of every replacement made by this rule.
        let mut edits: Vec<(Range<usize>, Range<usize>)> = Vec::new();
        let mut copied = 0;
        let mut pos = 0;

        while pos < text.len() {
            let Some(m) = re.find_from_pos(&text, pos)? else {
                break;
            };
            if m.start() == m.end() || locked.iter().any(|r| r.start < m.end() && m.start() < r.end) {
                pos = m.start() + text[m.start()..].chars().next().map_or(1, char::len_utf8);
                continue;
            }
            out.push_str(&text[copied..m.start()]);
            let written = out.len();
            out.push_str(to);
            edits.push((m.range(), written..out.len()));
            copied = m.end();
            pos = m.end();
        }
        if edits.is_empty() {
            continue;
        }
        out.push_str(&text[copied..]);

        // Earlier locks sit between this rule's edits; shift them by the
        // size change of every edit before them.
        let mut next: Vec<Range<usize>> = locked
            .iter()
            .map(|r| {
                let delta: isize = edits
                    .iter()
                    .filter(|(old, _)| old.end <= r.start)
                    .map(|(old, new)| new.len() as isize - old.len() as isize)
                    .sum();
                let start = (r.start as isize + delta) as usize;
                start..start + r.len()
            })
            .collect();
        next.extend(edits.into_iter().map(|(_, new)| new));
        next.sort_by_key(|r| r.start);

        text = out;
        locked = next;
    }
    Ok(text)
}

/// Canonicalise symbols that the dictionary writes differently.
pub fn cleanup_symbols(ipa: &str) -> String {
    ipa.chars()
        .map(|c| CLEANUP.iter().find(|(from, _)| *from == c).map_or(c, |(_, to)| *to))
        .collect()
}

/// Apply the cleanup and, for American, the correction table.
pub fn apply_accent_corrections(ipa: &str, accent: Accent) -> Result<String> {
    let cleaned = cleanup_symbols(ipa);
    match accent {
        Accent::Rp => Ok(cleaned),
        Accent::American => {
            apply_american_rules(&cleaned).context("American accent correction failed")
        }
    }
}

/// First of several ` OR `-separated alternatives.
pub fn first_alternative(raw: &str) -> &str {
    raw.split(ALTERNATIVE_SEPARATOR).next().unwrap_or(raw).trim()
}

// ─────────────────────────────────────────────────────────────────────────────
// Table
// ─────────────────────────────────────────────────────────────────────────────

/// Where the table comes from.
#[derive(Debug, Clone)]
enum TableSource {
    File(PathBuf),
    Inline(String),
    Missing(String),
}

/// Parse table text.  Keys are lower-cased; the first entry for a key wins.
fn parse_table(text: &str) -> HashMap<String, String> {
    let mut table = HashMap::new();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with(";;;") {
            continue;
        }
        let Some((word, ipa)) = line.split_once(char::is_whitespace) else {
            continue;
        };
        let ipa = ipa.trim();
        if ipa.is_empty() {
            continue;
        }
        table.entry(word.to_lowercase()).or_insert_with(|| ipa.to_string());
    }
    table
}

fn load_table(source: &TableSource) -> Result<HashMap<String, String>> {
    match source {
        TableSource::File(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("Cannot read G2P table: {}", path.display()))?;
            Ok(parse_table(&text))
        }
        TableSource::Inline(text) => Ok(parse_table(text)),
        TableSource::Missing(reason) => Err(anyhow::anyhow!("{}", reason)),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// FallbackG2p
// ─────────────────────────────────────────────────────────────────────────────

/// Lazily loaded G2P table with accent correction.
///
/// Share one handle (`Arc<FallbackG2p>`) between transcribers so the table is
/// read from disk only once.
#[derive(Debug)]
pub struct FallbackG2p {
    source: TableSource,
    /// `Some(table)` once loaded, `None` if loading failed.
    table: OnceCell<Option<HashMap<String, String>>>,
}

impl FallbackG2p {
    /// Table read from `path` on first lookup.
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        Self::with_source(TableSource::File(path.as_ref().to_path_buf()))
    }

    /// Table parsed from in-memory text on first lookup.
    pub fn from_table_str(text: impl Into<String>) -> Self {
        Self::with_source(TableSource::Inline(text.into()))
    }

    /// Locate the table via `$IPA_G2P_TABLE`, then the system path.
    ///
    /// If neither exists the handle is still usable: every lookup returns the
    /// word unchanged.
    pub fn from_default_location() -> Self {
        if let Some(path) = std::env::var_os(G2P_TABLE_ENV) {
            return Self::from_path(PathBuf::from(path));
        }
        let system = Path::new(SYSTEM_TABLE_PATH);
        if system.exists() {
            return Self::from_path(system);
        }
        Self::with_source(TableSource::Missing(format!(
            "G2P table not found. Set {} or install it to {}",
            G2P_TABLE_ENV, SYSTEM_TABLE_PATH
        )))
    }

    /// Handle with no table at all; lookups always return the word.
    pub fn disabled() -> Self {
        Self::with_source(TableSource::Missing("G2P fallback disabled".to_string()))
    }

    fn with_source(source: TableSource) -> Self {
        Self { source, table: OnceCell::new() }
    }

    fn table(&self) -> Option<&HashMap<String, String>> {
        self.table
            .get_or_init(|| match load_table(&self.source) {
                Ok(table) => {
                    tracing::debug!(entries = table.len(), "G2P table loaded");
                    Some(table)
                }
                Err(e) => {
                    tracing::warn!("G2P table unavailable, unknown words stay orthographic: {e:#}");
                    None
                }
            })
            .as_ref()
    }

    /// Load the table now instead of on first lookup.  Returns whether it is usable.
    pub fn preload(&self) -> bool {
        self.table().is_some()
    }

    /// Raw table entry (all alternatives, uncorrected).
    pub fn raw_lookup(&self, word: &str) -> Option<&str> {
        self.table()?.get(&word.to_lowercase()).map(String::as_str)
    }

    /// Transcribe `word` for `accent`.
    ///
    /// Returns the word unchanged when the table is unavailable or has no
    /// entry for it.  Only a failure inside the correction pass is an error.
    pub fn lookup(&self, word: &str, accent: Accent) -> Result<String> {
        match self.raw_lookup(word) {
            Some(raw) => apply_accent_corrections(first_alternative(raw), accent),
            None => {
                tracing::debug!(word, "no G2P entry, keeping written form");
                Ok(word.to_string())
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
