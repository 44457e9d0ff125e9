//! Plain-text utilities for OCR'd volume text.

mod headword;
mod paragraphs;

pub use headword::{extract_headword, has_word_char, strip_markup};
pub use paragraphs::{split_lines, split_paragraphs};
