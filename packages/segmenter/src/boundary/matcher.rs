//! Matcher strategies for boundary detection.

use regex::Regex;
use std::sync::LazyLock;

use super::types::{MatchEvidence, ReferenceWindow};
use crate::similarity::{first_close_match, first_token_match};
use crate::text::has_word_char;

/// Typographic signatures of an article start, in priority order.
///
/// All are anchored at the start of the line:
/// 1. bold markup
/// 2. a leading number, the spaced-text marker and at least one non-markup character
/// 3. a 1-2 digit number after leading whitespace, followed by a word
/// 4. a 1-2 digit number followed by italic markup
#[allow(clippy::expect_used)] // Static regexes that are guaranteed to be valid
static STRUCTURAL_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"^<b>.*",
        r"^\s*\b\d+\.\s*<sp>\s*\w[^<>]*",
        r"^\s\d{1,2}\.\s\w+",
        r"^\d{1,2}\.\s+<i>.*",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid regex"))
    .collect()
});

/// Trait for boundary matcher strategies.
///
/// A matcher inspects one line together with the reference window and either
/// produces evidence that the line starts an article or declines.
pub trait BoundaryMatcher: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Check whether this matcher should be tried on the line at all.
    ///
    /// Default implementation always returns true.
    fn accepts(&self, _line: &str) -> bool {
        true
    }

    /// Try to match the line.
    fn attempt(&self, line: &str, window: &ReferenceWindow<'_>) -> Option<MatchEvidence>;
}

/// Matches typographic cues. Does not look at the reference window.
pub struct StructuralMatcher {
    patterns: Vec<Regex>,
}

impl StructuralMatcher {
    /// Create a matcher from custom patterns, tried in order.
    #[must_use]
    pub fn new(patterns: Vec<Regex>) -> Self {
        Self { patterns }
    }
}

impl Default for StructuralMatcher {
    fn default() -> Self {
        Self::new(STRUCTURAL_PATTERNS.clone())
    }
}

impl BoundaryMatcher for StructuralMatcher {
    fn name(&self) -> &'static str {
        "structural"
    }

    fn attempt(&self, line: &str, _window: &ReferenceWindow<'_>) -> Option<MatchEvidence> {
        self.patterns
            .iter()
            .position(|pattern| pattern.is_match(line))
            .map(|pattern| MatchEvidence::Structural { pattern })
    }
}

/// Similarity-ratio match against a wide window of headwords.
pub struct CloseMatchMatcher {
    cutoff: f64,
    window: usize,
}

impl CloseMatchMatcher {
    #[must_use]
    pub fn new(cutoff: f64, window: usize) -> Self {
        Self { cutoff, window }
    }
}

impl BoundaryMatcher for CloseMatchMatcher {
    fn name(&self) -> &'static str {
        "close-match"
    }

    fn accepts(&self, line: &str) -> bool {
        has_word_char(line)
    }

    fn attempt(&self, line: &str, window: &ReferenceWindow<'_>) -> Option<MatchEvidence> {
        first_close_match(line, window.headwords(self.window), self.cutoff).map(
            |(headword, ratio)| MatchEvidence::CloseMatch {
                headword: headword.to_string(),
                ratio,
            },
        )
    }
}

/// Token-score match against a narrow window of headwords.
///
/// Only tried on lines longer than `min_line_len` characters.
pub struct TokenScoreMatcher {
    cutoff: u8,
    window: usize,
    min_line_len: usize,
}

impl TokenScoreMatcher {
    #[must_use]
    pub fn new(cutoff: u8, window: usize, min_line_len: usize) -> Self {
        Self {
            cutoff,
            window,
            min_line_len,
        }
    }
}

impl BoundaryMatcher for TokenScoreMatcher {
    fn name(&self) -> &'static str {
        "token-score"
    }

    fn accepts(&self, line: &str) -> bool {
        has_word_char(line) && line.chars().count() > self.min_line_len
    }

    fn attempt(&self, line: &str, window: &ReferenceWindow<'_>) -> Option<MatchEvidence> {
        first_token_match(line, window.headwords(self.window), self.cutoff).map(
            |(headword, score)| MatchEvidence::TokenScore {
                headword: headword.to_string(),
                score,
            },
        )
    }
}
