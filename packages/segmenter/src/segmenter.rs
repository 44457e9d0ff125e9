//! Main segmenter service that ties all components together.

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use indicatif::ProgressBar;

use crate::assembler::assemble_volume;
use crate::boundary::{
    create_default_cascade, PostProcessors, ReferenceWindow, ScanReport, Verdict, VolumeFailure,
    VolumeScanner,
};
use crate::config::SegmenterConfig;
use crate::error::Result;
use crate::source::{DirectorySource, VolumeSource};
use crate::store;
use crate::text::split_paragraphs;
use crate::types::{ArticleRecord, BoundaryIndex};

/// Where a run's boundary index came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexOrigin {
    /// Read from a previous run's index file.
    Loaded,
    /// Scanned in this run and written to the index file.
    Scanned,
    /// Read from a previous run and completed with the volumes it lacked.
    Resumed,
}

/// Articles of all volumes plus the volumes that could not be assembled.
#[derive(Debug, Default)]
pub struct AssemblyReport {
    pub articles: Vec<ArticleRecord>,
    pub failures: Vec<VolumeFailure>,
}

/// Summary of a completed run.
#[derive(Debug)]
pub struct RunSummary {
    pub index_origin: IndexOrigin,
    pub volumes: usize,
    pub boundaries: usize,
    pub articles: usize,
    pub failures: Vec<VolumeFailure>,
}

/// Result of [`Segmenter::run`].
#[derive(Debug)]
pub enum RunOutcome {
    /// Both artifacts already existed and the index covers every volume.
    AlreadyDone,
    Completed(RunSummary),
}

/// Segments the volumes of a source into articles.
pub struct Segmenter<S: VolumeSource> {
    source: S,
    config: SegmenterConfig,
    scanner: VolumeScanner,
}

impl Segmenter<DirectorySource> {
    /// Open the volumes and catalog named in `config`.
    pub fn from_config(config: SegmenterConfig) -> Result<Self> {
        config.validate()?;
        let source = DirectorySource::open(&config.input_dir, &config.toc_file)?;
        Ok(Self::new(source, config))
    }
}

impl<S: VolumeSource> Segmenter<S> {
    /// Create a segmenter over `source`.
    #[must_use]
    pub fn new(source: S, config: SegmenterConfig) -> Self {
        let scanner = VolumeScanner::new(
            create_default_cascade(&config.thresholds),
            PostProcessors::from_truncation_rules(&config.truncate_after),
            config.min_paragraph_len,
        )
        .with_max_workers(config.workers);

        Self {
            source,
            config,
            scanner,
        }
    }

    /// Report scan progress on the given bar.
    #[must_use]
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.scanner = self.scanner.with_progress(progress);
        self
    }

    #[must_use]
    pub fn source(&self) -> &S {
        &self.source
    }

    #[must_use]
    pub fn config(&self) -> &SegmenterConfig {
        &self.config
    }

    /// Flag that, once set, abandons volumes that have not started scanning.
    #[must_use]
    pub fn cancellation_flag(&self) -> Arc<AtomicBool> {
        self.scanner.cancellation_flag()
    }

    /// Scan every volume of the source.
    pub fn scan(&self) -> Result<ScanReport> {
        self.scan_volumes(&self.source.volume_keys())
    }

    fn scan_volumes(&self, volumes: &[String]) -> Result<ScanReport> {
        tracing::info!(volumes = volumes.len(), "scanning volumes");
        self.scanner.scan_all(&self.source, volumes)
    }

    /// Catalog volumes that have no entry in `index`, in catalog order.
    #[must_use]
    pub fn missing_volumes(&self, index: &BoundaryIndex) -> Vec<String> {
        self.source
            .volume_keys()
            .into_iter()
            .filter(|key| !index.contains_key(key))
            .collect()
    }

    /// Load the stored boundary index, or scan and store it.
    ///
    /// A stored index is completed with the catalog volumes it lacks, such as
    /// volumes that failed or were cancelled in an earlier run. With `force`,
    /// an existing index file is ignored and overwritten.
    pub fn boundary_index(
        &self,
        force: bool,
    ) -> Result<(BoundaryIndex, IndexOrigin, Vec<VolumeFailure>)> {
        let path = self.config.index_path();

        let (index, origin, failures) = if !force && path.exists() {
            let stored = store::load_index(&path)?;
            let missing = self.missing_volumes(&stored);
            if missing.is_empty() {
                tracing::info!(path = %path.display(), "reusing stored boundary index");
                return Ok((stored, IndexOrigin::Loaded, Vec::new()));
            }

            tracing::info!(
                path = %path.display(),
                missing = missing.len(),
                "stored boundary index is incomplete, scanning missing volumes"
            );
            let report = self.scan_volumes(&missing)?;
            let index = self.merge_in_catalog_order(stored, report.index);
            (index, IndexOrigin::Resumed, report.failures)
        } else {
            let report = self.scan()?;
            (report.index, IndexOrigin::Scanned, report.failures)
        };

        store::save_index(&path, &index)?;
        tracing::info!(
            path = %path.display(),
            volumes = index.len(),
            boundaries = index.values().map(Vec::len).sum::<usize>(),
            "stored boundary index"
        );
        Ok((index, origin, failures))
    }

    /// Combine a stored index with newly scanned volumes. Catalog volumes come
    /// first in catalog order, entries unknown to the catalog keep their place
    /// after them.
    fn merge_in_catalog_order(
        &self,
        mut stored: BoundaryIndex,
        mut scanned: BoundaryIndex,
    ) -> BoundaryIndex {
        let mut index = BoundaryIndex::new();
        for key in self.source.volume_keys() {
            if let Some(boundaries) = stored
                .shift_remove(&key)
                .or_else(|| scanned.shift_remove(&key))
            {
                index.insert(key, boundaries);
            }
        }
        index.extend(stored);
        index
    }

    /// Assemble the articles of every indexed volume, in catalog order.
    ///
    /// A volume's ordinal is its 1-based position in the catalog, whether or
    /// not it appears in `index`.
    #[must_use]
    pub fn assemble(&self, index: &BoundaryIndex) -> AssemblyReport {
        let mut report = AssemblyReport::default();
        let keys = self.source.volume_keys();

        for stray in index.keys().filter(|key| !keys.contains(key)) {
            tracing::warn!(volume = %stray, "indexed volume is not in the catalog, skipping");
        }

        for (position, volume) in keys.iter().enumerate() {
            let Some(boundaries) = index.get(volume) else {
                tracing::debug!(volume = %volume, "volume has no boundary record");
                continue;
            };

            let text = match self.source.text(volume) {
                Ok(text) => text,
                Err(error) => {
                    tracing::warn!(volume = %volume, error = %error, "cannot assemble volume");
                    report.failures.push(VolumeFailure {
                        volume: volume.clone(),
                        error,
                    });
                    continue;
                }
            };

            let paragraphs = split_paragraphs(&text, self.config.min_paragraph_len);
            report
                .articles
                .extend(assemble_volume(volume, position + 1, &paragraphs, boundaries));
        }

        report
    }

    /// Classify a single line against a volume's table of contents.
    pub fn classify_line(&self, volume: &str, cursor: usize, line: &str) -> Result<Verdict> {
        let toc = self.source.table_of_contents(volume)?;
        let window = ReferenceWindow::new(toc, cursor);
        Ok(self.scanner.classifier().classify(line, &window))
    }

    /// Run both phases, reusing stored artifacts unless `force` is set.
    ///
    /// Articles are reassembled whenever the boundary index changed. Fails
    /// without reporting success if either artifact cannot be written.
    pub fn run(&self, force: bool) -> Result<RunOutcome> {
        let articles_path = self.config.articles_path();

        let (index, index_origin, mut failures) = self.boundary_index(force)?;
        if index_origin == IndexOrigin::Loaded && articles_path.exists() {
            return Ok(RunOutcome::AlreadyDone);
        }

        let report = self.assemble(&index);
        store::save_articles(&articles_path, &report.articles)?;
        tracing::info!(
            path = %articles_path.display(),
            articles = report.articles.len(),
            "stored articles"
        );
        failures.extend(report.failures);

        Ok(RunOutcome::Completed(RunSummary {
            index_origin,
            volumes: index.len(),
            boundaries: index.values().map(Vec::len).sum(),
            articles: report.articles.len(),
            failures,
        }))
    }
}
