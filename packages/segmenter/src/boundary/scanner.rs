//! Volume scanner: finds the boundaries of every volume.
//!
//! Each volume is scanned independently on a bounded worker pool. Workers
//! share nothing but a progress counter; their results are collected into
//! one [`BoundaryIndex`] after all of them finish.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use indicatif::ProgressBar;
use rayon::prelude::*;

use super::classifier::BoundaryClassifier;
use super::postprocess::PostProcessors;
use super::types::ReferenceWindow;
use crate::error::{Result, SegmenterError};
use crate::source::VolumeSource;
use crate::text::{split_lines, split_paragraphs};
use crate::types::{Boundary, BoundaryIndex};

/// Find the boundaries of one volume's paragraphs.
///
/// The cursor into `toc` is the number of boundaries accepted so far. Each
/// paragraph contributes at most one boundary: its lines are classified in
/// order until one is accepted or rejected.
#[must_use]
pub fn scan_paragraphs(
    classifier: &BoundaryClassifier,
    paragraphs: &[&str],
    toc: &[String],
) -> Vec<Boundary> {
    let mut boundaries = Vec::new();

    for (index, paragraph) in paragraphs.iter().enumerate() {
        for line in split_lines(paragraph) {
            let window = ReferenceWindow::new(toc, boundaries.len());
            let verdict = classifier.classify(line, &window);
            if verdict.is_boundary() {
                boundaries.push(Boundary::new(index, line));
            }
            if verdict.ends_paragraph() {
                break;
            }
        }
    }

    boundaries
}

/// A volume whose scan or assembly failed.
#[derive(Debug)]
pub struct VolumeFailure {
    pub volume: String,
    pub error: SegmenterError,
}

/// Result of scanning a set of volumes.
#[derive(Debug, Default)]
pub struct ScanReport {
    /// Boundaries of every volume that was scanned successfully.
    pub index: BoundaryIndex,

    /// Volumes that could not be scanned; siblings are unaffected.
    pub failures: Vec<VolumeFailure>,
}

impl ScanReport {
    /// Total number of boundaries across all volumes.
    #[must_use]
    pub fn boundary_count(&self) -> usize {
        self.index.values().map(Vec::len).sum()
    }
}

/// Scans volumes in parallel.
pub struct VolumeScanner {
    classifier: BoundaryClassifier,
    post_processors: PostProcessors,
    min_paragraph_len: usize,
    max_workers: Option<usize>,
    cancelled: Arc<AtomicBool>,
    completed: AtomicUsize,
    progress: ProgressBar,
}

impl VolumeScanner {
    /// Create a scanner.
    #[must_use]
    pub fn new(
        classifier: BoundaryClassifier,
        post_processors: PostProcessors,
        min_paragraph_len: usize,
    ) -> Self {
        Self {
            classifier,
            post_processors,
            min_paragraph_len,
            max_workers: None,
            cancelled: Arc::new(AtomicBool::new(false)),
            completed: AtomicUsize::new(0),
            progress: ProgressBar::hidden(),
        }
    }

    /// Limit the number of concurrent scan workers.
    #[must_use]
    pub fn with_max_workers(mut self, workers: Option<usize>) -> Self {
        self.max_workers = workers;
        self
    }

    /// Report progress on the given bar.
    #[must_use]
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = progress;
        self
    }

    #[must_use]
    pub fn classifier(&self) -> &BoundaryClassifier {
        &self.classifier
    }

    /// Flag that, once set, stops volumes that have not started yet.
    #[must_use]
    pub fn cancellation_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancelled)
    }

    /// Number of volumes finished so far, successful or not.
    #[must_use]
    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::Relaxed)
    }

    /// Scan a single volume, including its post-processing.
    pub fn scan_volume(&self, source: &dyn VolumeSource, volume: &str) -> Result<Vec<Boundary>> {
        let toc = source.table_of_contents(volume)?;
        let text = source.text(volume)?;
        let paragraphs = split_paragraphs(&text, self.min_paragraph_len);

        let boundaries = scan_paragraphs(&self.classifier, &paragraphs, toc);
        let found = boundaries.len();
        let boundaries = self.post_processors.apply(volume, boundaries);

        tracing::info!(
            volume = %volume,
            paragraphs = paragraphs.len(),
            headwords = toc.len(),
            found,
            kept = boundaries.len(),
            "scanned volume"
        );
        Ok(boundaries)
    }

    /// Scan all `volumes` of `source` and collect their boundaries.
    ///
    /// A failing volume is reported in [`ScanReport::failures`] and does not
    /// stop the others.
    pub fn scan_all(&self, source: &dyn VolumeSource, volumes: &[String]) -> Result<ScanReport> {
        if volumes.is_empty() {
            return Ok(ScanReport::default());
        }

        let workers = self.worker_count(volumes.len());
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("scan-{i}"))
            .build()?;

        tracing::debug!(volumes = volumes.len(), workers, "starting scan");
        self.progress.set_length(volumes.len() as u64);

        let results: Vec<(String, Result<Vec<Boundary>>)> = pool.install(|| {
            volumes
                .par_iter()
                .map(|volume| {
                    let result = if self.cancelled.load(Ordering::Relaxed) {
                        Err(SegmenterError::Cancelled(volume.clone()))
                    } else {
                        self.scan_volume(source, volume)
                    };
                    self.completed.fetch_add(1, Ordering::Relaxed);
                    self.progress.inc(1);
                    (volume.clone(), result)
                })
                .collect()
        });
        self.progress.finish_and_clear();

        let mut report = ScanReport::default();
        for (volume, result) in results {
            match result {
                Ok(boundaries) => {
                    report.index.insert(volume, boundaries);
                }
                Err(error) => {
                    tracing::warn!(volume = %volume, error = %error, "volume scan failed");
                    report.failures.push(VolumeFailure { volume, error });
                }
            }
        }
        Ok(report)
    }

    fn worker_count(&self, volumes: usize) -> usize {
        let available = std::thread::available_parallelism().map_or(1, |n| n.get());
        self.max_workers
            .unwrap_or(available)
            .min(volumes)
            .max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boundary::create_default_cascade;
    use crate::config::{MatchThresholds, TruncationRule};
    use crate::source::InMemorySource;
    use pretty_assertions::assert_eq;

    fn toc(entries: &[&str]) -> Vec<String> {
        entries.iter().map(|s| s.to_string()).collect()
    }

    fn scanner() -> VolumeScanner {
        VolumeScanner::new(
            create_default_cascade(&MatchThresholds::default()),
            PostProcessors::new(),
            10,
        )
    }

    #[test]
    fn test_scan_paragraphs_scenario() {
        let classifier = create_default_cascade(&MatchThresholds::default());
        let paragraphs = [
            "<b>Apple</b>\ntext1",
            "some continuation",
            "<b>Banana</b>\ntext2",
            "<b>Cherry</b>\ntext3",
        ];
        let toc = toc(&["Apple", "Banana", "Cherry"]);

        let boundaries = scan_paragraphs(&classifier, &paragraphs, &toc);
        assert_eq!(
            boundaries,
            vec![
                Boundary::new(0, "<b>Apple</b>"),
                Boundary::new(2, "<b>Banana</b>"),
                Boundary::new(3, "<b>Cherry</b>"),
            ]
        );
    }

    #[test]
    fn test_scan_paragraphs_one_boundary_per_paragraph() {
        let classifier = create_default_cascade(&MatchThresholds::default());
        let paragraphs = ["<b>Apple</b>\n<b>Banana</b>\n<b>Cherry</b>"];
        let toc = toc(&["Apple", "Banana", "Cherry"]);

        let boundaries = scan_paragraphs(&classifier, &paragraphs, &toc);
        assert_eq!(boundaries, vec![Boundary::new(0, "<b>Apple</b>")]);
    }

    #[test]
    fn test_scan_paragraphs_skips_punctuation_lines() {
        let classifier = create_default_cascade(&MatchThresholds::default());
        // the first line has no word characters, so the second line is tried
        let paragraphs = ["-- . --\n\nBanana\nthe fruit"];
        let toc = toc(&["Banana"]);

        let boundaries = scan_paragraphs(&classifier, &paragraphs, &toc);
        assert_eq!(boundaries, vec![Boundary::new(0, "Banana")]);
    }

    #[test]
    fn test_scan_paragraphs_rejected_line_ends_paragraph() {
        let classifier = create_default_cascade(&MatchThresholds::default());
        // "Unrelated words" is rejected, so "Banana" on the next line is never tried
        let paragraphs = ["Unrelated words\nBanana"];
        let toc = toc(&["Banana"]);

        assert!(scan_paragraphs(&classifier, &paragraphs, &toc).is_empty());
    }

    #[test]
    fn test_scan_paragraphs_window_follows_cursor() {
        let classifier = create_default_cascade(&MatchThresholds::default());
        // plain headword lines only match once the cursor has reached them
        let paragraphs = [
            "<b>Apple</b>\ntext",
            "Banana\ntext about bananas",
            "Cherry\nmore text",
        ];
        let toc = toc(&["Apple", "Banana", "Cherry"]);

        let boundaries = scan_paragraphs(&classifier, &paragraphs, &toc);
        assert_eq!(
            boundaries,
            vec![
                Boundary::new(0, "<b>Apple</b>"),
                Boundary::new(1, "Banana"),
                Boundary::new(2, "Cherry"),
            ]
        );
    }

    #[test]
    fn test_scan_all_isolates_failures() {
        let source = InMemorySource::new()
            .with_volume("x1", "<b>Apple</b>\ntext1\n\n<b>Banana</b>\ntext2", ["Apple", "Banana"])
            .with_missing_text("x2", ["Cherry"]);
        let scanner = scanner();

        let report = scanner.scan_all(&source, &source.volume_keys()).unwrap();
        assert_eq!(report.index.len(), 1);
        assert_eq!(report.index["x1"].len(), 2);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].volume, "x2");
        assert!(matches!(
            report.failures[0].error,
            SegmenterError::VolumeUnavailable { .. }
        ));
        assert_eq!(scanner.completed(), 2);
    }

    #[test]
    fn test_scan_all_is_deterministic() {
        let source = InMemorySource::new()
            .with_volume("x1", "<b>Apple</b>\ntext1\n\nBanana\nabout it", ["Apple", "Banana"])
            .with_volume("x2", "<b>Cherry</b>\ntext3", ["Cherry"]);
        let keys = source.volume_keys();

        let first = scanner().scan_all(&source, &keys).unwrap();
        let second = scanner().with_max_workers(Some(1)).scan_all(&source, &keys).unwrap();
        assert_eq!(first.index, second.index);
    }

    #[test]
    fn test_scan_all_isolates_volume_without_toc() {
        let source = InMemorySource::new().with_volume("aa", "<b>Apple</b>\ntext1", ["Apple"]);
        let volumes = toc(&["aa", "zz"]);

        let report = scanner().scan_all(&source, &volumes).unwrap();
        assert_eq!(report.index.keys().collect::<Vec<_>>(), vec!["aa"]);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].volume, "zz");
        assert!(matches!(
            report.failures[0].error,
            SegmenterError::UnknownVolume(_)
        ));
    }

    #[test]
    fn test_scan_all_keeps_volume_order() {
        let source = InMemorySource::new()
            .with_volume("zb", "<b>Cherry</b>\ntext3", ["Cherry"])
            .with_volume("aa", "<b>Apple</b>\ntext1", ["Apple"])
            .with_volume("mc", "<b>Banana</b>\ntext2", ["Banana"]);

        let report = scanner().scan_all(&source, &source.volume_keys()).unwrap();
        assert_eq!(report.index.keys().collect::<Vec<_>>(), vec!["zb", "aa", "mc"]);
    }

    #[test]
    fn test_scan_all_cancelled() {
        let source = InMemorySource::new().with_volume("x1", "<b>Apple</b>\ntext1", ["Apple"]);
        let scanner = scanner();
        scanner.cancellation_flag().store(true, Ordering::Relaxed);

        let report = scanner.scan_all(&source, &source.volume_keys()).unwrap();
        assert!(report.index.is_empty());
        assert!(matches!(
            report.failures[0].error,
            SegmenterError::Cancelled(_)
        ));
    }

    #[test]
    fn test_scan_volume_applies_truncation() {
        let source = InMemorySource::new().with_volume(
            "ci",
            "<b>Apple</b>\ntext1\n\n<b>Banana</b>\ntext2\n\n<b>Index</b>\npage refs",
            ["Apple", "Banana"],
        );
        let scanner = VolumeScanner::new(
            create_default_cascade(&MatchThresholds::default()),
            PostProcessors::from_truncation_rules(&[TruncationRule {
                volume: "ci".into(),
                headword: "Banana".into(),
            }]),
            10,
        );

        let boundaries = scanner.scan_volume(&source, "ci").unwrap();
        assert_eq!(boundaries.last(), Some(&Boundary::new(1, "<b>Banana</b>")));
    }

    #[test]
    fn test_scan_all_empty() {
        let source = InMemorySource::new();
        let report = scanner().scan_all(&source, &[]).unwrap();
        assert_eq!(report.boundary_count(), 0);
    }
}
