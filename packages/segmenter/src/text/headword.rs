//! Headword extraction from boundary lines.

use regex::Regex;
use std::sync::LazyLock;
use unicode_normalization::UnicodeNormalization;

/// Any markup tag, e.g. `<b>`, `</sp>`, `<i>`.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static MARKUP_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<.*?>").expect("valid regex"));

/// First run of characters that are neither punctuation, digits nor whitespace.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static HEADWORD_START: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^[:punct:]\p{P}\d\s]+").expect("valid regex"));

#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static WORD_CHAR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\w").expect("valid regex"));

/// Remove all markup tags from a line.
#[must_use]
pub fn strip_markup(line: &str) -> String {
    MARKUP_TAG.replace_all(line, "").into_owned()
}

/// Check whether a line contains at least one word character.
#[must_use]
pub fn has_word_char(line: &str) -> bool {
    WORD_CHAR.is_match(line)
}

/// Derive the normalized headword from a boundary line.
///
/// Markup tags are removed, then any leading run of punctuation, digits and
/// whitespace is dropped. The rest of the line is kept and NFC-normalized.
/// A line with nothing left yields whatever remains after tag stripping,
/// which may be empty.
///
/// # Examples
/// ```
/// use familjebok_segmenter::text::extract_headword;
///
/// assert_eq!(extract_headword("<b>Apple</b>"), "Apple");
/// assert_eq!(extract_headword("12. <sp>Abel</sp>, norsk"), "Abel, norsk");
/// ```
#[must_use]
pub fn extract_headword(line: &str) -> String {
    let stripped = strip_markup(line);
    let headword = match HEADWORD_START.find(&stripped) {
        Some(m) => &stripped[m.start()..],
        None => stripped.as_str(),
    };
    headword.nfc().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_markup() {
        assert_eq!(strip_markup("<b>Apple</b>, fruit"), "Apple, fruit");
        assert_eq!(strip_markup("no tags"), "no tags");
        assert_eq!(strip_markup("<b></b>"), "");
    }

    #[test]
    fn test_extract_headword_bold() {
        assert_eq!(extract_headword("<b>Banana</b>"), "Banana");
    }

    #[test]
    fn test_extract_headword_numbered_entry() {
        assert_eq!(extract_headword(" 2. Karl, konung"), "Karl, konung");
        assert_eq!(extract_headword("3. <i>Lund</i>"), "Lund");
    }

    #[test]
    fn test_extract_headword_keeps_trailing_text() {
        assert_eq!(
            extract_headword("<b>Aachen</b> (fr. Aix-la-Chapelle), stad."),
            "Aachen (fr. Aix-la-Chapelle), stad."
        );
    }

    #[test]
    fn test_extract_headword_unicode() {
        assert_eq!(extract_headword("<b>Åbo</b>"), "Åbo");
        // decomposed "Å" is composed
        assert_eq!(extract_headword("<b>A\u{30a}bo</b>"), "Åbo");
    }

    #[test]
    fn test_extract_headword_degenerate() {
        assert_eq!(extract_headword("<b>1.</b>"), "1.");
        assert_eq!(extract_headword("<b></b>"), "");
        assert_eq!(extract_headword(""), "");
    }

    #[test]
    fn test_has_word_char() {
        assert!(has_word_char("-- a --"));
        assert!(has_word_char("Ö"));
        assert!(!has_word_char("-- . --"));
        assert!(!has_word_char(""));
    }
}
