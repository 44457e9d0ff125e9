//! Token-based fuzzy scoring on a 0-100 scale.
//!
//! The weighted score combines the plain similarity ratio with partial
//! (best-substring) and token-order-insensitive variants, scaling down the
//! variants so that an exact match still ranks highest.

use std::collections::BTreeSet;

use regex::Regex;
use std::sync::LazyLock;

use super::sequence::SequenceMatcher;

#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static NON_WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\W").expect("valid regex"));

/// Scale applied to token-based variants.
const UNBASE_SCALE: f64 = 0.95;

/// Scale applied to partial variants.
const PARTIAL_SCALE: f64 = 0.90;

/// Scale applied to partial variants when one string is much longer.
const LONG_PARTIAL_SCALE: f64 = 0.60;

/// Round half to even, then clamp into a score.
fn to_score(value: f64) -> u8 {
    value.round_ties_even().clamp(0.0, 100.0) as u8
}

/// Normalize a string for scoring.
///
/// Non-word characters become spaces, the result is lowercased and trimmed.
/// With `force_ascii`, characters in the Latin-1 supplement (U+0080..=U+00FF)
/// are dropped first.
#[must_use]
pub fn full_process(s: &str, force_ascii: bool) -> String {
    let s: String = if force_ascii {
        s.chars().filter(|c| !('\u{80}'..='\u{ff}').contains(c)).collect()
    } else {
        s.to_string()
    };
    NON_WORD.replace_all(&s, " ").to_lowercase().trim().to_string()
}

/// Both sides of a comparison go through this. Separators in the Latin-1
/// range, such as `×` or `§`, become spaces before that range is dropped.
fn process_for_scoring(s: &str) -> String {
    full_process(&full_process(s, false), true)
}

/// Plain similarity score. Equal strings score 100, an empty side scores 0.
#[must_use]
pub fn simple_ratio(s1: &str, s2: &str) -> u8 {
    if s1 == s2 {
        return 100;
    }
    if s1.is_empty() || s2.is_empty() {
        return 0;
    }
    to_score(100.0 * SequenceMatcher::new(s1, s2).ratio())
}

/// Best similarity of the shorter string against same-length windows of the longer one.
#[must_use]
pub fn partial_ratio(s1: &str, s2: &str) -> u8 {
    if s1 == s2 {
        return 100;
    }
    if s1.is_empty() || s2.is_empty() {
        return 0;
    }

    let (shorter, longer) = if s1.chars().count() <= s2.chars().count() {
        (s1, s2)
    } else {
        (s2, s1)
    };
    let longer_chars: Vec<char> = longer.chars().collect();
    let shorter_len = shorter.chars().count();

    let mut best = 0.0f64;
    for block in SequenceMatcher::new(shorter, longer).matching_blocks() {
        let start = block.b_start.saturating_sub(block.a_start);
        let end = (start + shorter_len).min(longer_chars.len());
        let window: String = longer_chars[start.min(end)..end].iter().collect();

        let r = SequenceMatcher::new(shorter, &window).ratio();
        if r > 0.995 {
            return 100;
        }
        best = best.max(r);
    }
    to_score(100.0 * best)
}

fn sorted_tokens(s: &str) -> String {
    let mut tokens: Vec<&str> = s.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.join(" ")
}

/// Similarity of the two strings with their tokens sorted.
#[must_use]
pub fn token_sort_ratio(s1: &str, s2: &str, partial: bool) -> u8 {
    let (sorted1, sorted2) = (sorted_tokens(s1), sorted_tokens(s2));
    if partial {
        partial_ratio(&sorted1, &sorted2)
    } else {
        simple_ratio(&sorted1, &sorted2)
    }
}

/// Similarity based on the shared token set and each side's remainder.
#[must_use]
pub fn token_set_ratio(s1: &str, s2: &str, partial: bool) -> u8 {
    if s1 == s2 {
        return 100;
    }
    if s1.is_empty() || s2.is_empty() {
        return 0;
    }

    let tokens1: BTreeSet<&str> = s1.split_whitespace().collect();
    let tokens2: BTreeSet<&str> = s2.split_whitespace().collect();

    let join = |set: BTreeSet<&str>| set.into_iter().collect::<Vec<_>>().join(" ");
    let sect = join(tokens1.intersection(&tokens2).copied().collect());
    let diff1to2 = join(tokens1.difference(&tokens2).copied().collect());
    let diff2to1 = join(tokens2.difference(&tokens1).copied().collect());

    let combined1to2 = format!("{sect} {diff1to2}").trim().to_string();
    let combined2to1 = format!("{sect} {diff2to1}").trim().to_string();

    let score = |a: &str, b: &str| {
        if partial {
            partial_ratio(a, b)
        } else {
            simple_ratio(a, b)
        }
    };

    score(&sect, &combined1to2)
        .max(score(&sect, &combined2to1))
        .max(score(&combined1to2, &combined2to1))
}

/// Weighted best-of score over already processed strings.
#[must_use]
pub fn weighted_ratio(p1: &str, p2: &str) -> u8 {
    if p1.is_empty() || p2.is_empty() {
        return 0;
    }

    let base = f64::from(simple_ratio(p1, p2));
    let (len1, len2) = (p1.chars().count(), p2.chars().count());
    let len_ratio = len1.max(len2) as f64 / len1.min(len2) as f64;

    if len_ratio < 1.5 {
        let tsor = f64::from(token_sort_ratio(p1, p2, false)) * UNBASE_SCALE;
        let tser = f64::from(token_set_ratio(p1, p2, false)) * UNBASE_SCALE;
        return to_score(base.max(tsor).max(tser));
    }

    let partial_scale = if len_ratio > 8.0 {
        LONG_PARTIAL_SCALE
    } else {
        PARTIAL_SCALE
    };
    let partial = f64::from(partial_ratio(p1, p2)) * partial_scale;
    let ptsor = f64::from(token_sort_ratio(p1, p2, true)) * UNBASE_SCALE * partial_scale;
    let ptser = f64::from(token_set_ratio(p1, p2, true)) * UNBASE_SCALE * partial_scale;
    to_score(base.max(partial).max(ptsor).max(ptser))
}

/// Score a raw line against a raw headword.
///
/// # Examples
/// ```
/// use familjebok_segmenter::similarity::token_score;
///
/// assert_eq!(token_score("Smith, John", "John Smith"), 95);
/// assert_eq!(token_score("---", "John Smith"), 0);
/// ```
#[must_use]
pub fn token_score(line: &str, headword: &str) -> u8 {
    weighted_ratio(&process_for_scoring(line), &process_for_scoring(headword))
}

/// Return the first candidate whose token score against `line` reaches `cutoff`.
pub fn first_token_match<'c, I>(line: &str, candidates: I, cutoff: u8) -> Option<(&'c str, u8)>
where
    I: IntoIterator<Item = &'c str>,
{
    let query = process_for_scoring(line);
    candidates.into_iter().find_map(|candidate| {
        let score = weighted_ratio(&query, &process_for_scoring(candidate));
        (score >= cutoff).then_some((candidate, score))
    })
}
