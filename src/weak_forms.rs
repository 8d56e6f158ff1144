//! Strong / weak form selection for function words.
//!
//! The policy is an ordered chain of rules.  Each rule either decides
//! (`Some(true)` = weak, `Some(false)` = strong) or passes (`None`); the first
//! rule that decides wins and the default is weak.
//!
//! | # | Rule            | Decision                                           |
//! |---|-----------------|----------------------------------------------------|
//! | 1 | `always-strong` | i, my, may, might, ought, by, so, while → strong    |
//! | 2 | `contraction`   | contains `'` → strong                              |
//! | 3 | `the`           | "the" → strong (allophone chosen after joining)    |
//! | 4 | `line-initial`  | first token → strong unless the / a / an           |
//! | 5 | `pre-pause`     | followed by punctuation → strong                   |
//! | 6 | `line-final`    | last word of the line → strong                     |
//! | 7 | `fronted-aux`   | auxiliary at line start → strong                   |
//! | 8 | `capitalised`   | capitalised mid-line word (not "I") → strong       |
//!
//! [`WeakFormPolicy::with_contextual_rules`] additionally inserts the lexical
//! `there` and `that` rules right after rule 3.

use crate::dictionary::normalize_word;
use crate::tokenize::{last_word_index, Token};

const ALWAYS_STRONG: &[&str] = &["i", "my", "may", "might", "ought", "by", "so", "while"];
const WEAK_AT_LINE_START: &[&str] = &["the", "a", "an"];
const AUXILIARIES: &[&str] = &[
    "is", "are", "was", "were", "have", "has", "had", "do", "does", "did", "will", "would", "can",
    "could", "should", "must",
];
const BE_FORMS: &[&str] = &["is", "are", "was", "were", "will", "would", "'s", "'re", "'ll"];
const CLAUSE_VERBS: &[&str] = &[
    "know", "think", "believe", "feel", "say", "said", "tell", "told", "see", "saw", "hear",
    "heard", "understand", "realize", "realized", "assume", "suppose", "hope", "wish", "remember",
    "forget", "noticed", "mean", "means", "meant", "show", "shows", "showed", "prove", "proves",
];
const SUBJECT_PRONOUNS: &[&str] = &["he", "she", "it", "they", "we", "you", "i"];

// ─────────────────────────────────────────────────────────────────────────────
// Rule context
// ─────────────────────────────────────────────────────────────────────────────

/// Everything a rule may look at when judging one word token.
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'t, 'a> {
    /// Surface form of the word being judged.
    pub word: &'a str,
    /// `word` after [`normalize_word`].
    pub normalized: &'t str,
    /// Index of the word in `tokens`.
    pub index: usize,
    pub tokens: &'t [Token<'a>],
    /// The raw source line.
    pub line: &'a str,
}

impl RuleContext<'_, '_> {
    fn next(&self) -> Option<&Token<'_>> {
        self.tokens.get(self.index + 1)
    }

    fn prev(&self) -> Option<&Token<'_>> {
        self.index.checked_sub(1).and_then(|i| self.tokens.get(i))
    }
}

/// Signature shared by every rule: `Some(weak?)` when the rule decides.
pub type RuleFn = fn(&RuleContext<'_, '_>) -> Option<bool>;

/// A named entry in the policy chain.
#[derive(Debug, Clone, Copy)]
pub struct WeakFormRule {
    pub name: &'static str,
    pub decide: RuleFn,
}

impl WeakFormRule {
    pub const fn new(name: &'static str, decide: RuleFn) -> Self {
        Self { name, decide }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Built-in rules
// ─────────────────────────────────────────────────────────────────────────────

fn always_strong(cx: &RuleContext<'_, '_>) -> Option<bool> {
    ALWAYS_STRONG.contains(&cx.normalized).then_some(false)
}

fn contraction(cx: &RuleContext<'_, '_>) -> Option<bool> {
    cx.normalized.contains('\'').then_some(false)
}

fn definite_article(cx: &RuleContext<'_, '_>) -> Option<bool> {
    (cx.normalized == "the").then_some(false)
}

fn line_initial(cx: &RuleContext<'_, '_>) -> Option<bool> {
    (cx.index == 0 && !WEAK_AT_LINE_START.contains(&cx.normalized)).then_some(false)
}

fn pre_pause(cx: &RuleContext<'_, '_>) -> Option<bool> {
    cx.next().is_some_and(Token::is_punctuation).then_some(false)
}

fn line_final(cx: &RuleContext<'_, '_>) -> Option<bool> {
    (last_word_index(cx.tokens) == Some(cx.index)).then_some(false)
}

fn fronted_auxiliary(cx: &RuleContext<'_, '_>) -> Option<bool> {
    (cx.index == 0 && AUXILIARIES.contains(&cx.normalized)).then_some(false)
}

fn capitalised(cx: &RuleContext<'_, '_>) -> Option<bool> {
    let starts_upper = cx.word.chars().next().is_some_and(char::is_uppercase);
    (starts_upper && cx.index != 0 && cx.word != "I").then_some(false)
}

/// "there" is weak before a form of "to be", strong otherwise.
fn existential_there(cx: &RuleContext<'_, '_>) -> Option<bool> {
    if cx.normalized != "there" {
        return None;
    }
    let before_be = cx
        .next()
        .is_some_and(|t| BE_FORMS.contains(&normalize_word(t.text()).as_str()));
    Some(before_be)
}

/// "that" is weak as a complementiser, strong as a demonstrative.
fn complementiser_that(cx: &RuleContext<'_, '_>) -> Option<bool> {
    if cx.normalized != "that" {
        return None;
    }
    if cx
        .prev()
        .is_some_and(|t| CLAUSE_VERBS.contains(&normalize_word(t.text()).as_str()))
    {
        return Some(true);
    }
    let clause_follows = cx.index + 2 < cx.tokens.len()
        && cx
            .next()
            .is_some_and(|t| SUBJECT_PRONOUNS.contains(&normalize_word(t.text()).as_str()));
    Some(clause_follows)
}

pub const ALWAYS_STRONG_RULE: WeakFormRule = WeakFormRule::new("always-strong", always_strong);
pub const CONTRACTION_RULE: WeakFormRule = WeakFormRule::new("contraction", contraction);
pub const THE_RULE: WeakFormRule = WeakFormRule::new("the", definite_article);
pub const LINE_INITIAL_RULE: WeakFormRule = WeakFormRule::new("line-initial", line_initial);
pub const PRE_PAUSE_RULE: WeakFormRule = WeakFormRule::new("pre-pause", pre_pause);
pub const LINE_FINAL_RULE: WeakFormRule = WeakFormRule::new("line-final", line_final);
pub const FRONTED_AUX_RULE: WeakFormRule = WeakFormRule::new("fronted-aux", fronted_auxiliary);
pub const CAPITALISED_RULE: WeakFormRule = WeakFormRule::new("capitalised", capitalised);
pub const THERE_RULE: WeakFormRule = WeakFormRule::new("there", existential_there);
pub const THAT_RULE: WeakFormRule = WeakFormRule::new("that", complementiser_that);

// ─────────────────────────────────────────────────────────────────────────────
// WeakFormPolicy
// ─────────────────────────────────────────────────────────────────────────────

/// Ordered rule chain deciding strong vs weak for each word token.
#[derive(Debug, Clone)]
pub struct WeakFormPolicy {
    rules: Vec<WeakFormRule>,
}

impl Default for WeakFormPolicy {
    fn default() -> Self {
        Self {
            rules: vec![
                ALWAYS_STRONG_RULE,
                CONTRACTION_RULE,
                THE_RULE,
                LINE_INITIAL_RULE,
                PRE_PAUSE_RULE,
                LINE_FINAL_RULE,
                FRONTED_AUX_RULE,
                CAPITALISED_RULE,
            ],
        }
    }
}

impl WeakFormPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Default chain plus the `there` / `that` rules, placed after `the`.
    pub fn with_contextual_rules() -> Self {
        let mut policy = Self::default();
        let at = policy.position("the").map_or(0, |i| i + 1);
        policy.insert_rule(at, THERE_RULE);
        policy.insert_rule(at + 1, THAT_RULE);
        policy
    }

    pub fn rules(&self) -> &[WeakFormRule] {
        &self.rules
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.rules.iter().position(|r| r.name == name)
    }

    /// Insert `rule` at `index` (clamped to the end of the chain).
    pub fn insert_rule(&mut self, index: usize, rule: WeakFormRule) {
        let index = index.min(self.rules.len());
        self.rules.insert(index, rule);
    }

    pub fn push_rule(&mut self, rule: WeakFormRule) {
        self.rules.push(rule);
    }

    /// Remove every rule called `name`.  Returns whether anything was removed.
    pub fn remove_rule(&mut self, name: &str) -> bool {
        let before = self.rules.len();
        self.rules.retain(|r| r.name != name);
        self.rules.len() != before
    }

    /// Decide whether the word at `index` should take its weak form.
    ///
    /// `tokens[index]` must be a word token of `line`.
    pub fn should_use_weak(&self, word: &str, index: usize, tokens: &[Token<'_>], line: &str) -> bool {
        let normalized = normalize_word(word);
        let cx = RuleContext { word, normalized: &normalized, index, tokens, line };
        self.rules
            .iter()
            .find_map(|rule| (rule.decide)(&cx))
            .unwrap_or(true)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
