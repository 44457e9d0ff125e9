//! Article boundary detection.
//!
//! A line starts a new article when one of an ordered cascade of matchers
//! accepts it:
//!
//! 1. [`StructuralMatcher`]: typographic signatures such as a bold lead or a
//!    numbered, letter-spaced entry
//! 2. [`CloseMatchMatcher`]: similarity ratio against a wide window of the
//!    volume's table of contents
//! 3. [`TokenScoreMatcher`]: token-based score against a narrow window
//!
//! The [`VolumeScanner`] walks each volume's paragraphs, threads the cursor
//! into the table of contents and applies per-volume [`PostProcessors`].

mod classifier;
mod matcher;
mod postprocess;
mod scanner;
mod types;

pub use classifier::{create_default_cascade, BoundaryClassifier};
pub use matcher::{BoundaryMatcher, CloseMatchMatcher, StructuralMatcher, TokenScoreMatcher};
pub use postprocess::{PostProcessRule, PostProcessors, TruncateAfterHeadword};
pub use scanner::{scan_paragraphs, ScanReport, VolumeFailure, VolumeScanner};
pub use types::{MatchEvidence, ReferenceWindow, Verdict};
