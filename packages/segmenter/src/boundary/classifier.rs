//! Boundary classifier: an ordered cascade of matcher strategies.

use super::matcher::{BoundaryMatcher, CloseMatchMatcher, StructuralMatcher, TokenScoreMatcher};
use super::types::{ReferenceWindow, Verdict};
use crate::config::MatchThresholds;
use crate::text::has_word_char;

/// Ordered list of matchers. The first matcher that fires decides the verdict.
///
/// The classifier keeps no state of its own: the reference window, and with
/// it the cursor, is passed in on every call.
pub struct BoundaryClassifier {
    matchers: Vec<Box<dyn BoundaryMatcher>>,
}

impl BoundaryClassifier {
    /// Create a classifier without matchers.
    #[must_use]
    pub fn new() -> Self {
        Self {
            matchers: Vec::new(),
        }
    }

    /// Append a matcher. Matchers run in registration order.
    pub fn register(&mut self, matcher: impl BoundaryMatcher + 'static) {
        self.matchers.push(Box::new(matcher));
    }

    /// Names of the registered matchers, in order.
    #[must_use]
    pub fn matcher_names(&self) -> Vec<&'static str> {
        self.matchers.iter().map(|m| m.name()).collect()
    }

    /// Classify one line.
    ///
    /// Returns [`Verdict::Rejected`] when no matcher fired on a line with word
    /// characters, and [`Verdict::Inconclusive`] for empty lines and lines
    /// made only of punctuation or whitespace.
    #[must_use]
    pub fn classify(&self, line: &str, window: &ReferenceWindow<'_>) -> Verdict {
        if line.is_empty() {
            return Verdict::Inconclusive;
        }

        for matcher in &self.matchers {
            if !matcher.accepts(line) {
                continue;
            }
            if let Some(evidence) = matcher.attempt(line, window) {
                tracing::trace!(
                    matcher = matcher.name(),
                    cursor = window.cursor(),
                    %evidence,
                    "boundary line"
                );
                return Verdict::Boundary(evidence);
            }
        }

        if has_word_char(line) {
            Verdict::Rejected
        } else {
            Verdict::Inconclusive
        }
    }
}

impl Default for BoundaryClassifier {
    fn default() -> Self {
        Self::new()
    }
}

/// Create the standard cascade: structural cues, then the wide close-match
/// fallback, then the narrow token-score fallback.
#[must_use]
pub fn create_default_cascade(thresholds: &MatchThresholds) -> BoundaryClassifier {
    let mut classifier = BoundaryClassifier::new();

    classifier.register(StructuralMatcher::default());
    classifier.register(CloseMatchMatcher::new(
        thresholds.close_match_cutoff,
        thresholds.close_match_window,
    ));
    classifier.register(TokenScoreMatcher::new(
        thresholds.token_score_cutoff,
        thresholds.token_score_window,
        thresholds.token_min_line_len,
    ));

    classifier
}
