//! Configuration constants, settings loading and validation.
//!
//! Settings are read from a `settings.json` file. The file is either a JSON
//! array whose first element holds the settings object, or the object itself.
//! Only the `segmenter` section is interpreted; other sections are ignored.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Result, SegmenterError};

/// Default settings file name, resolved against the working directory.
pub const DEFAULT_SETTINGS_FILE: &str = "settings.json";

/// Delimiter between paragraphs in the raw OCR text.
pub const PARAGRAPH_DELIMITER: &str = "\n\n";

/// Paragraphs shorter than this many characters are dropped.
pub const DEFAULT_MIN_PARAGRAPH_LEN: usize = 10;

/// Minimum similarity ratio for the windowed close-match fallback.
pub const DEFAULT_CLOSE_MATCH_CUTOFF: f64 = 0.70;

/// Number of headwords, starting at the cursor, compared by the close-match fallback.
pub const DEFAULT_CLOSE_MATCH_WINDOW: usize = 200;

/// Minimum token score (0-100) for the tight token-score fallback.
pub const DEFAULT_TOKEN_SCORE_CUTOFF: u8 = 95;

/// Number of headwords, starting at the cursor, compared by the token-score fallback.
pub const DEFAULT_TOKEN_SCORE_WINDOW: usize = 5;

/// Lines must be longer than this many characters to reach the token-score fallback.
pub const DEFAULT_TOKEN_MIN_LINE_LEN: usize = 10;

/// Indentation used for persisted JSON artifacts.
pub const JSON_INDENT: &[u8] = b"    ";

/// Tunable thresholds of the fuzzy fallbacks.
///
/// The defaults are empirically tuned and have no derivation beyond having
/// worked well on the scanned volumes.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct MatchThresholds {
    pub close_match_cutoff: f64,
    pub close_match_window: usize,
    pub token_score_cutoff: u8,
    pub token_score_window: usize,
    pub token_min_line_len: usize,
}

impl Default for MatchThresholds {
    fn default() -> Self {
        Self {
            close_match_cutoff: DEFAULT_CLOSE_MATCH_CUTOFF,
            close_match_window: DEFAULT_CLOSE_MATCH_WINDOW,
            token_score_cutoff: DEFAULT_TOKEN_SCORE_CUTOFF,
            token_score_window: DEFAULT_TOKEN_SCORE_WINDOW,
            token_min_line_len: DEFAULT_TOKEN_MIN_LINE_LEN,
        }
    }
}

impl MatchThresholds {
    /// Check that every threshold lies in its meaningful range.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.close_match_cutoff) {
            return Err(SegmenterError::InvalidSettings(format!(
                "close_match_cutoff must be in 0..=1, got {}",
                self.close_match_cutoff
            )));
        }
        if self.token_score_cutoff > 100 {
            return Err(SegmenterError::InvalidSettings(format!(
                "token_score_cutoff must be in 0..=100, got {}",
                self.token_score_cutoff
            )));
        }
        if self.close_match_window == 0 || self.token_score_window == 0 {
            return Err(SegmenterError::InvalidSettings(
                "match windows must hold at least one headword".to_string(),
            ));
        }
        Ok(())
    }
}

/// Truncate a volume's boundary list after a given headword.
///
/// Used for the register volume, whose OCR text runs past its nominal range.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TruncationRule {
    pub volume: String,
    pub headword: String,
}

/// The `segmenter` section of the settings file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SegmenterConfig {
    /// Directory holding `<volume>.txt` files.
    #[serde(rename = "input_dir")]
    pub input_dir: PathBuf,

    /// Directory receiving the boundary index and the article collection.
    #[serde(rename = "segmentedDirectory")]
    pub segmented_dir: PathBuf,

    /// File name of the article collection inside `segmented_dir`.
    #[serde(rename = "segmentedFile")]
    pub articles_file: String,

    /// File name of the boundary index inside `segmented_dir`.
    #[serde(rename = "paragraphIndexesFile")]
    pub index_file: String,

    /// JSON file mapping volume keys to their table of contents.
    #[serde(rename = "toc_file")]
    pub toc_file: PathBuf,

    #[serde(default = "default_min_paragraph_len")]
    pub min_paragraph_len: usize,

    #[serde(default)]
    pub thresholds: MatchThresholds,

    #[serde(default)]
    pub truncate_after: Vec<TruncationRule>,

    /// Upper bound on scan workers; `None` uses available parallelism.
    #[serde(default)]
    pub workers: Option<usize>,
}

fn default_min_paragraph_len() -> usize {
    DEFAULT_MIN_PARAGRAPH_LEN
}

impl SegmenterConfig {
    /// Build a configuration rooted at `base` with conventional file names.
    #[must_use]
    pub fn with_base_dir(base: &Path) -> Self {
        Self {
            input_dir: base.join("text"),
            segmented_dir: base.join("segmented"),
            articles_file: "articles.json".to_string(),
            index_file: "paragraph_indexes.json".to_string(),
            toc_file: base.join("toc.json"),
            min_paragraph_len: DEFAULT_MIN_PARAGRAPH_LEN,
            thresholds: MatchThresholds::default(),
            truncate_after: Vec::new(),
            workers: None,
        }
    }

    /// Path of the persisted boundary index.
    #[must_use]
    pub fn index_path(&self) -> PathBuf {
        self.segmented_dir.join(&self.index_file)
    }

    /// Path of the persisted article collection.
    #[must_use]
    pub fn articles_path(&self) -> PathBuf {
        self.segmented_dir.join(&self.articles_file)
    }

    /// Validate the configuration before any work is started.
    pub fn validate(&self) -> Result<()> {
        self.thresholds.validate()?;

        if self.articles_file.is_empty() || self.index_file.is_empty() {
            return Err(SegmenterError::InvalidSettings(
                "segmentedFile and paragraphIndexesFile must be non-empty".to_string(),
            ));
        }
        if self.articles_file == self.index_file {
            return Err(SegmenterError::InvalidSettings(format!(
                "segmentedFile and paragraphIndexesFile must differ, both are '{}'",
                self.index_file
            )));
        }
        if self.workers == Some(0) {
            return Err(SegmenterError::InvalidSettings(
                "workers must be at least 1".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for rule in &self.truncate_after {
            if !seen.insert(rule.volume.as_str()) {
                return Err(SegmenterError::InvalidSettings(format!(
                    "more than one truncation rule for volume '{}'",
                    rule.volume
                )));
            }
        }

        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct SettingsSection {
    segmenter: SegmenterConfig,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SettingsFile {
    List(Vec<SettingsSection>),
    Single(SettingsSection),
}

/// Parse settings JSON into a validated segmenter configuration.
pub fn parse_settings(json: &str) -> Result<SegmenterConfig> {
    let file: SettingsFile = serde_json::from_str(json)?;
    let config = match file {
        SettingsFile::Single(section) => section.segmenter,
        SettingsFile::List(sections) => sections
            .into_iter()
            .next()
            .map(|section| section.segmenter)
            .ok_or_else(|| {
                SegmenterError::InvalidSettings("settings array is empty".to_string())
            })?,
    };
    config.validate()?;
    Ok(config)
}

/// Load and validate settings from a file.
pub fn load_settings(path: &Path) -> Result<SegmenterConfig> {
    let json = fs::read_to_string(path).map_err(|e| {
        SegmenterError::InvalidSettings(format!("cannot read {}: {e}", path.display()))
    })?;
    parse_settings(&json)
}
