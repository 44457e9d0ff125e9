//! Familjebok Segmenter - Split OCR'd encyclopedia volumes into articles.
//!
//! Each volume of a scanned encyclopedia arrives as one long OCR text plus
//! the ordered list of headwords from its table of contents. The segmenter
//! finds the paragraph where every article starts and carves the volume into
//! article records with stable entry ids.
//!
//! # Example
//!
//! ```
//! use familjebok_segmenter::boundary::{create_default_cascade, scan_paragraphs};
//! use familjebok_segmenter::config::MatchThresholds;
//! use familjebok_segmenter::assemble_volume;
//!
//! let classifier = create_default_cascade(&MatchThresholds::default());
//! let toc = vec!["Apple".to_string(), "Banana".to_string()];
//! let paragraphs = ["<b>Apple</b>\na fruit", "<b>Banana</b>\nanother fruit"];
//!
//! let boundaries = scan_paragraphs(&classifier, &paragraphs, &toc);
//! let articles = assemble_volume("ba", 1, &paragraphs, &boundaries);
//! assert_eq!(articles[1].headword, "Banana");
//! assert_eq!(articles[1].entry_id.to_string(), "v1-2-0");
//! ```
//!
//! # Architecture
//!
//! - [`config`]: Configuration constants and settings loading
//! - [`types`]: Core data types (Boundary, ArticleRecord, EntryId)
//! - [`error`]: Error types and Result alias
//! - [`text`]: Paragraph splitting and headword extraction
//! - [`similarity`]: String similarity measures for fuzzy matching
//! - [`boundary`]: Boundary classification and parallel volume scanning
//! - [`assembler`]: Article assembly from boundaries
//! - [`source`]: Access to volume text and tables of contents
//! - [`store`]: JSON persistence of the produced artifacts
//! - [`cli`]: Command-line interface
//! - [`segmenter`]: Main segmenter service

pub mod assembler;
pub mod boundary;
pub mod cli;
pub mod config;
pub mod error;
pub mod segmenter;
pub mod similarity;
pub mod source;
pub mod store;
pub mod text;
pub mod types;

// Re-export main entry points
pub use assembler::assemble_volume;
pub use segmenter::{RunOutcome, RunSummary, Segmenter};

// Re-export commonly used items
pub use config::{load_settings, SegmenterConfig};
pub use error::{Result, SegmenterError};
pub use source::{DirectorySource, InMemorySource, VolumeSource};
pub use types::{ArticleRecord, Boundary, BoundaryIndex, EntryId};
