//! Paragraph splitting.

use crate::config::PARAGRAPH_DELIMITER;

/// Split raw volume text into paragraphs, dropping near-empty fragments.
///
/// Paragraphs are separated by a blank line (`"\n\n"`). Fragments with fewer
/// than `min_len` characters are discarded, so indices into the returned
/// sequence are positions in the *filtered* sequence.
///
/// # Examples
/// ```
/// use familjebok_segmenter::text::split_paragraphs;
///
/// let text = "<b>Apple</b>\ntext1\n\nshort\n\nsome continuation";
/// assert_eq!(
///     split_paragraphs(text, 10),
///     vec!["<b>Apple</b>\ntext1", "some continuation"]
/// );
/// ```
#[must_use]
pub fn split_paragraphs(text: &str, min_len: usize) -> Vec<&str> {
    text.split(PARAGRAPH_DELIMITER)
        .filter(|p| p.chars().count() >= min_len)
        .collect()
}

/// Split a paragraph into its lines.
pub fn split_lines(paragraph: &str) -> impl Iterator<Item = &str> {
    paragraph.split('\n')
}
