//! Article assembly from paragraphs and boundary records.

use crate::config::PARAGRAPH_DELIMITER;
use crate::text::extract_headword;
use crate::types::{ArticleRecord, Boundary, EntryId};

/// Carve one volume's paragraphs into articles.
///
/// Article `i` spans from boundary `i` up to, not including, the paragraph of
/// boundary `i + 1`; the last article runs to the end of the volume.
/// Paragraphs before the first boundary belong to no article.
///
/// Boundary paragraphs past the end of `paragraphs` are clamped, which yields
/// an empty article instead of aborting the volume.
#[must_use]
pub fn assemble_volume(
    volume: &str,
    ordinal: usize,
    paragraphs: &[&str],
    boundaries: &[Boundary],
) -> Vec<ArticleRecord> {
    let count = paragraphs.len();

    if let Some(first) = boundaries.first() {
        if first.paragraph > 0 {
            tracing::debug!(
                volume = %volume,
                front_matter = first.paragraph.min(count),
                "paragraphs before the first boundary belong to no article"
            );
        }
    }

    let mut articles = Vec::with_capacity(boundaries.len());
    for (i, boundary) in boundaries.iter().enumerate() {
        let start = clamp(volume, boundary.paragraph, count);
        let end = boundaries
            .get(i + 1)
            .map_or(count, |next| clamp(volume, next.paragraph, count))
            .max(start);

        articles.push(ArticleRecord::new(
            extract_headword(&boundary.line),
            paragraphs[start..end].join(PARAGRAPH_DELIMITER),
            EntryId::new(ordinal, i),
        ));
    }

    tracing::debug!(volume = %volume, ordinal, articles = articles.len(), "assembled volume");
    articles
}

fn clamp(volume: &str, paragraph: usize, count: usize) -> usize {
    if paragraph > count {
        tracing::warn!(
            volume = %volume,
            paragraph,
            paragraphs = count,
            "boundary index out of range, clamping"
        );
        count
    } else {
        paragraph
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const PARAGRAPHS: [&str; 4] = [
        "<b>Apple</b>\ntext1",
        "some continuation",
        "<b>Banana</b>\ntext2",
        "<b>Cherry</b>\ntext3",
    ];

    fn boundaries() -> Vec<Boundary> {
        vec![
            Boundary::new(0, "<b>Apple</b>"),
            Boundary::new(2, "<b>Banana</b>"),
            Boundary::new(3, "<b>Cherry</b>"),
        ]
    }

    #[test]
    fn test_assemble_scenario() {
        let articles = assemble_volume("x1", 1, &PARAGRAPHS, &boundaries());
        assert_eq!(
            articles,
            vec![
                ArticleRecord::new(
                    "Apple",
                    "<b>Apple</b>\ntext1\n\nsome continuation",
                    EntryId::new(1, 0)
                ),
                ArticleRecord::new("Banana", "<b>Banana</b>\ntext2", EntryId::new(1, 1)),
                ArticleRecord::new("Cherry", "<b>Cherry</b>\ntext3", EntryId::new(1, 2)),
            ]
        );
        let ids: Vec<String> = articles.iter().map(|a| a.entry_id.to_string()).collect();
        assert_eq!(ids, vec!["v1-1-0", "v1-2-0", "v1-3-0"]);
    }

    #[test]
    fn test_spans_cover_all_paragraphs() {
        let articles = assemble_volume("x1", 1, &PARAGRAPHS, &boundaries());
        let rebuilt: Vec<&str> = articles
            .iter()
            .flat_map(|a| a.text.split(PARAGRAPH_DELIMITER))
            .collect();
        assert_eq!(rebuilt, PARAGRAPHS.to_vec());
    }

    #[test]
    fn test_front_matter_is_dropped() {
        let articles = assemble_volume("x1", 2, &PARAGRAPHS, &boundaries()[1..]);
        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0].text, "<b>Banana</b>\ntext2");
        assert_eq!(articles[0].entry_id.to_string(), "v2-1-0");
    }

    #[test]
    fn test_stale_index_is_clamped() {
        let boundaries = vec![
            Boundary::new(3, "<b>Cherry</b>"),
            Boundary::new(9, "<b>Date</b>"),
        ];
        let articles = assemble_volume("x1", 1, &PARAGRAPHS, &boundaries);
        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0].text, "<b>Cherry</b>\ntext3");
        assert_eq!(articles[1].text, "");
        assert_eq!(articles[1].headword, "Date");
    }

    #[test]
    fn test_empty_headword_is_kept() {
        let boundaries = vec![Boundary::new(0, "<b></b>")];
        let articles = assemble_volume("x1", 1, &PARAGRAPHS, &boundaries);
        assert_eq!(articles[0].headword, "");
    }

    #[test]
    fn test_no_boundaries() {
        assert!(assemble_volume("x1", 1, &PARAGRAPHS, &[]).is_empty());
    }
}
