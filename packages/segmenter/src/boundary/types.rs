//! Types for the boundary detection system.

use std::fmt;

/// The slice of a volume's table of contents visible from a cursor.
///
/// The cursor counts the boundaries accepted so far, so headwords before it
/// are considered consumed and never compared again.
#[derive(Debug, Clone, Copy)]
pub struct ReferenceWindow<'a> {
    toc: &'a [String],
    cursor: usize,
}

impl<'a> ReferenceWindow<'a> {
    /// Create a window over `toc` starting at `cursor`.
    #[must_use]
    pub fn new(toc: &'a [String], cursor: usize) -> Self {
        Self { toc, cursor }
    }

    /// Current cursor position.
    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Up to `width` headwords starting at the cursor.
    ///
    /// Empty once the cursor has moved past the end of the table of contents.
    #[must_use]
    pub fn take(&self, width: usize) -> &'a [String] {
        let start = self.cursor.min(self.toc.len());
        let end = start.saturating_add(width).min(self.toc.len());
        &self.toc[start..end]
    }

    /// Headwords of the first `width` entries, as string slices.
    pub fn headwords(&self, width: usize) -> impl Iterator<Item = &'a str> {
        self.take(width).iter().map(String::as_str)
    }
}

/// Why a line was accepted as an article boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum MatchEvidence {
    /// A typographic signature matched; `pattern` is its position in the matcher.
    Structural { pattern: usize },

    /// The line is close to a headword of the wide window.
    CloseMatch { headword: String, ratio: f64 },

    /// The line's token score against a headword of the narrow window is high enough.
    TokenScore { headword: String, score: u8 },
}

impl fmt::Display for MatchEvidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Structural { pattern } => write!(f, "structural pattern #{pattern}"),
            Self::CloseMatch { headword, ratio } => {
                write!(f, "close match '{headword}' (ratio {ratio:.2})")
            }
            Self::TokenScore { headword, score } => {
                write!(f, "token score '{headword}' ({score}/100)")
            }
        }
    }
}

/// Outcome of classifying one line.
#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    /// The line starts a new article.
    Boundary(MatchEvidence),

    /// The line was compared against the headwords and did not match.
    Rejected,

    /// Nothing to compare: empty line or no word characters.
    Inconclusive,
}

impl Verdict {
    /// Whether scanning of the current paragraph stops after this line.
    #[must_use]
    pub fn ends_paragraph(&self) -> bool {
        !matches!(self, Self::Inconclusive)
    }

    /// Whether the line was accepted as a boundary.
    #[must_use]
    pub fn is_boundary(&self) -> bool {
        matches!(self, Self::Boundary(_))
    }
}
