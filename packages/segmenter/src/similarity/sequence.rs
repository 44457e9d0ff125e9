//! Ratcliff/Obershelp sequence matching.
//!
//! Finds the longest contiguous matching block, then recurses on the pieces
//! to its left and right. The similarity ratio is `2 * M / T` where `M` is the
//! number of matched characters and `T` the total length of both sequences.

use std::collections::HashMap;

/// Sequences at least this long get their popular characters ignored when
/// seeding matches.
const AUTOJUNK_MIN_LEN: usize = 200;

/// A block `a[a_start..a_start + len] == b[b_start..b_start + len]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct MatchingBlock {
    pub a_start: usize,
    pub b_start: usize,
    pub len: usize,
}

/// Compares a sequence `a` against a sequence `b` of characters.
///
/// Matches are seeded from an index of `b`, so `b` should be the sequence that
/// is compared against many `a`s.
#[derive(Debug)]
pub struct SequenceMatcher {
    a: Vec<char>,
    b: Vec<char>,
    b2j: HashMap<char, Vec<usize>>,
}

impl SequenceMatcher {
    /// Create a matcher for the pair (`a`, `b`).
    #[must_use]
    pub fn new(a: &str, b: &str) -> Self {
        let a: Vec<char> = a.chars().collect();
        let b: Vec<char> = b.chars().collect();
        let b2j = index_positions(&b);
        Self { a, b, b2j }
    }

    /// Replace `a`, keeping the index built over `b`.
    pub fn set_a(&mut self, a: &str) {
        self.a = a.chars().collect();
    }

    /// Longest matching block in `a[alo..ahi]` and `b[blo..bhi]`.
    ///
    /// Ties are broken by the earliest start in `a`, then in `b`.
    #[must_use]
    pub fn find_longest_match(&self, alo: usize, ahi: usize, blo: usize, bhi: usize) -> MatchingBlock {
        let (a, b) = (&self.a, &self.b);
        let (mut best_i, mut best_j, mut best_len) = (alo, blo, 0usize);

        // j2len[j] = length of the match ending at a[i - 1] and b[j]
        let mut j2len: HashMap<usize, usize> = HashMap::new();
        for (i, ch) in a.iter().enumerate().take(ahi).skip(alo) {
            let mut next_j2len = HashMap::new();
            if let Some(positions) = self.b2j.get(ch) {
                for &j in positions {
                    if j < blo {
                        continue;
                    }
                    if j >= bhi {
                        break;
                    }
                    let k = j
                        .checked_sub(1)
                        .and_then(|prev| j2len.get(&prev))
                        .copied()
                        .unwrap_or(0)
                        + 1;
                    next_j2len.insert(j, k);
                    if k > best_len {
                        best_i = i + 1 - k;
                        best_j = j + 1 - k;
                        best_len = k;
                    }
                }
            }
            j2len = next_j2len;
        }

        // Popular characters never seed a match but may extend one.
        while best_i > alo && best_j > blo && a[best_i - 1] == b[best_j - 1] {
            best_i -= 1;
            best_j -= 1;
            best_len += 1;
        }
        while best_i + best_len < ahi
            && best_j + best_len < bhi
            && a[best_i + best_len] == b[best_j + best_len]
        {
            best_len += 1;
        }

        MatchingBlock {
            a_start: best_i,
            b_start: best_j,
            len: best_len,
        }
    }

    /// All maximal matching blocks in increasing order.
    ///
    /// The last block is always the sentinel `(len(a), len(b), 0)`.
    #[must_use]
    pub fn matching_blocks(&self) -> Vec<MatchingBlock> {
        let (la, lb) = (self.a.len(), self.b.len());
        let mut queue = vec![(0, la, 0, lb)];
        let mut blocks = Vec::new();

        while let Some((alo, ahi, blo, bhi)) = queue.pop() {
            let block = self.find_longest_match(alo, ahi, blo, bhi);
            if block.len == 0 {
                continue;
            }
            let (i, j, k) = (block.a_start, block.b_start, block.len);
            blocks.push(block);
            if alo < i && blo < j {
                queue.push((alo, i, blo, j));
            }
            if i + k < ahi && j + k < bhi {
                queue.push((i + k, ahi, j + k, bhi));
            }
        }
        blocks.sort_unstable();

        // Collapse adjacent blocks.
        let mut collapsed: Vec<MatchingBlock> = Vec::with_capacity(blocks.len() + 1);
        for block in blocks {
            match collapsed.last_mut() {
                Some(last)
                    if last.a_start + last.len == block.a_start
                        && last.b_start + last.len == block.b_start =>
                {
                    last.len += block.len;
                }
                _ => collapsed.push(block),
            }
        }
        collapsed.push(MatchingBlock {
            a_start: la,
            b_start: lb,
            len: 0,
        });
        collapsed
    }

    /// Similarity in `[0, 1]`. Two empty sequences are identical.
    #[must_use]
    pub fn ratio(&self) -> f64 {
        let matches: usize = self.matching_blocks().iter().map(|b| b.len).sum();
        calculate_ratio(matches, self.a.len() + self.b.len())
    }

    /// Upper bound on [`ratio`](Self::ratio) from character multisets.
    #[must_use]
    pub fn quick_ratio(&self) -> f64 {
        let mut available: HashMap<char, isize> = HashMap::new();
        for ch in &self.b {
            *available.entry(*ch).or_insert(0) += 1;
        }
        let mut matches = 0;
        for ch in &self.a {
            let count = available.entry(*ch).or_insert(0);
            if *count > 0 {
                matches += 1;
            }
            *count -= 1;
        }
        calculate_ratio(matches, self.a.len() + self.b.len())
    }

    /// Upper bound on [`ratio`](Self::ratio) from lengths alone.
    #[must_use]
    pub fn real_quick_ratio(&self) -> f64 {
        let (la, lb) = (self.a.len(), self.b.len());
        calculate_ratio(la.min(lb), la + lb)
    }
}

fn calculate_ratio(matches: usize, length: usize) -> f64 {
    if length == 0 {
        1.0
    } else {
        2.0 * matches as f64 / length as f64
    }
}

/// Positions of every character of `b`, without popular characters of long sequences.
fn index_positions(b: &[char]) -> HashMap<char, Vec<usize>> {
    let mut b2j: HashMap<char, Vec<usize>> = HashMap::new();
    for (j, ch) in b.iter().enumerate() {
        b2j.entry(*ch).or_default().push(j);
    }

    if b.len() >= AUTOJUNK_MIN_LEN {
        let limit = b.len() / 100 + 1;
        b2j.retain(|_, positions| positions.len() <= limit);
    }
    b2j
}

/// Similarity ratio between two strings.
///
/// # Examples
/// ```
/// use familjebok_segmenter::similarity::ratio;
///
/// assert_eq!(ratio("abcd", "abcd"), 1.0);
/// assert_eq!(ratio("abcd", "bcde"), 0.75);
/// ```
#[must_use]
pub fn ratio(a: &str, b: &str) -> f64 {
    SequenceMatcher::new(a, b).ratio()
}

/// Return the first candidate whose similarity to `word` reaches `cutoff`.
///
/// Candidates are visited in order; cheap upper bounds reject most of them
/// before the full ratio is computed.
pub fn first_close_match<'c, I>(word: &str, candidates: I, cutoff: f64) -> Option<(&'c str, f64)>
where
    I: IntoIterator<Item = &'c str>,
{
    let mut matcher = SequenceMatcher::new("", word);
    for candidate in candidates {
        matcher.set_a(candidate);
        if matcher.real_quick_ratio() < cutoff || matcher.quick_ratio() < cutoff {
            continue;
        }
        let score = matcher.ratio();
        if score >= cutoff {
            return Some((candidate, score));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_ratio_identical_and_empty() {
        assert!(approx(ratio("Banana", "Banana"), 1.0));
        assert!(approx(ratio("", ""), 1.0));
        assert!(approx(ratio("abc", ""), 0.0));
    }

    #[test]
    fn test_ratio_known_values() {
        // 2 * 3 / 8
        assert!(approx(ratio("abcd", "bcde"), 0.75));
        // "qabxcd" vs "abycdf": matches "ab" and "cd"
        assert!(approx(ratio("qabxcd", "abycdf"), 2.0 * 4.0 / 12.0));
    }

    #[test]
    fn test_matching_blocks_with_sentinel() {
        let matcher = SequenceMatcher::new("abxcd", "abcd");
        let blocks = matcher.matching_blocks();
        assert_eq!(
            blocks,
            vec![
                MatchingBlock { a_start: 0, b_start: 0, len: 2 },
                MatchingBlock { a_start: 3, b_start: 2, len: 2 },
                MatchingBlock { a_start: 5, b_start: 4, len: 0 },
            ]
        );
    }

    #[test]
    fn test_find_longest_match_prefers_earliest() {
        let matcher = SequenceMatcher::new(" abcd", "abcd abcd");
        let block = matcher.find_longest_match(0, 5, 0, 9);
        assert_eq!(block, MatchingBlock { a_start: 0, b_start: 4, len: 5 });
    }

    #[test]
    fn test_quick_ratios_are_upper_bounds() {
        let matcher = SequenceMatcher::new("Bananas split", "Banana");
        assert!(matcher.real_quick_ratio() >= matcher.quick_ratio());
        assert!(matcher.quick_ratio() >= matcher.ratio());
    }

    #[test]
    fn test_ratio_is_unicode_aware() {
        // one differing character out of four on each side
        assert!(approx(ratio("Åbod", "Abod"), 0.75));
    }

    #[test]
    fn test_autojunk_long_sequence_still_extends() {
        let long: String = "a".repeat(250);
        // 'a' is popular in the long sequence but identical strings still match fully
        assert!(approx(ratio(&long, &long), 1.0));
    }

    #[test]
    fn test_first_close_match_window_order() {
        let candidates = ["Apple", "Bananas", "Banana"];
        let found = first_close_match("Banana", candidates.iter().copied(), 0.7);
        // "Bananas" comes first in window order and already qualifies
        assert_eq!(found.map(|(c, _)| c), Some("Bananas"));
    }

    #[test]
    fn test_first_close_match_none() {
        let candidates = ["Apple", "Cherry"];
        assert!(first_close_match("Banana", candidates.iter().copied(), 0.7).is_none());
    }
}
