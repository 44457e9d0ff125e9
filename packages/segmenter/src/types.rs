//! Core data types for the segmenter.
//!
//! These types describe what the segmenter produces: boundary records (where
//! an article starts) and article records (the carved-out articles).

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Evidence that a new article begins at a paragraph.
///
/// Serialized as a two-element array `[paragraph, "line"]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "(usize, String)", into = "(usize, String)")]
pub struct Boundary {
    /// Index into the volume's filtered paragraph sequence.
    pub paragraph: usize,

    /// The line that triggered the boundary, verbatim.
    pub line: String,
}

impl Boundary {
    /// Create a new boundary record.
    #[must_use]
    pub fn new(paragraph: usize, line: impl Into<String>) -> Self {
        Self {
            paragraph,
            line: line.into(),
        }
    }
}

impl From<(usize, String)> for Boundary {
    fn from((paragraph, line): (usize, String)) -> Self {
        Self { paragraph, line }
    }
}

impl From<Boundary> for (usize, String) {
    fn from(boundary: Boundary) -> Self {
        (boundary.paragraph, boundary.line)
    }
}

/// Volume key to its ordered boundary records, in catalog order.
pub type BoundaryIndex = IndexMap<String, Vec<Boundary>>;

/// Entity class assigned by a later classification stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityType {
    Other,
    Person,
    Location,
    Concept,
}

/// Stable identifier of an article: `v{volume}-{article}-{sub}`.
///
/// `volume` is the 1-based volume ordinal, `article` the 1-based position of
/// the article within its volume and `sub` a sub-entry marker (always 0 for
/// articles produced by the segmenter).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct EntryId {
    pub volume: usize,
    pub article: usize,
    pub sub: usize,
}

impl EntryId {
    /// Create an entry id for the `article_index`-th (0-based) article of a volume.
    #[must_use]
    pub fn new(volume: usize, article_index: usize) -> Self {
        Self {
            volume,
            article: article_index + 1,
            sub: 0,
        }
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}-{}-{}", self.volume, self.article, self.sub)
    }
}

impl FromStr for EntryId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || format!("invalid entry id '{s}', expected v<volume>-<article>-<sub>");
        let rest = s.strip_prefix('v').ok_or_else(invalid)?;
        let mut parts = rest.split('-').map(str::parse::<usize>);
        match (parts.next(), parts.next(), parts.next(), parts.next()) {
            (Some(Ok(volume)), Some(Ok(article)), Some(Ok(sub)), None) => Ok(Self {
                volume,
                article,
                sub,
            }),
            _ => Err(invalid()),
        }
    }
}

impl From<EntryId> for String {
    fn from(id: EntryId) -> Self {
        id.to_string()
    }
}

impl TryFrom<String> for EntryId {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// One reconstructed encyclopedia article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleRecord {
    /// Normalized title derived from the boundary line. May be empty.
    pub headword: String,

    /// Paragraphs of the article joined by blank lines.
    pub text: String,

    #[serde(rename = "entryid")]
    pub entry_id: EntryId,

    /// Unset until a classification stage runs.
    pub label: Option<EntityType>,

    /// Unset until a linking stage runs.
    #[serde(rename = "QID")]
    pub qid: Option<String>,
}

impl ArticleRecord {
    /// Create an unlabelled, unlinked article.
    #[must_use]
    pub fn new(headword: impl Into<String>, text: impl Into<String>, entry_id: EntryId) -> Self {
        Self {
            headword: headword.into(),
            text: text.into(),
            entry_id,
            label: None,
            qid: None,
        }
    }
}
