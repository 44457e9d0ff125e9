//! Access to acquired volumes.
//!
//! The acquisition stage leaves, per volume, a text file with the OCR'd
//! content and an entry in a table-of-contents catalog. A [`VolumeSource`]
//! hands both out by volume key.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;

use crate::error::{Result, SegmenterError};

/// Volume key to its ordered headwords, in catalog order.
pub type Catalog = IndexMap<String, Vec<String>>;

/// Trait for providers of volume text and tables of contents.
pub trait VolumeSource: Sync {
    /// Volume keys in catalog order. A key's position + 1 is its ordinal.
    fn volume_keys(&self) -> Vec<String>;

    /// Full OCR text of a volume.
    fn text(&self, volume: &str) -> Result<String>;

    /// Ordered reference headwords of a volume.
    fn table_of_contents(&self, volume: &str) -> Result<&[String]>;
}

/// Read a catalog file, keeping the key order of the file.
pub fn load_catalog(path: &Path) -> Result<Catalog> {
    let json = fs::read_to_string(path).map_err(|e| {
        SegmenterError::InvalidSettings(format!(
            "cannot read table of contents {}: {e}",
            path.display()
        ))
    })?;
    serde_json::from_str(&json).map_err(|source| SegmenterError::CorruptStore {
        path: path.to_path_buf(),
        source,
    })
}

/// Volumes stored as `<input_dir>/<key>.txt` next to a catalog file.
#[derive(Debug)]
pub struct DirectorySource {
    input_dir: PathBuf,
    catalog: Catalog,
}

impl DirectorySource {
    /// Create a source from an already loaded catalog.
    #[must_use]
    pub fn new(input_dir: impl Into<PathBuf>, catalog: Catalog) -> Self {
        Self {
            input_dir: input_dir.into(),
            catalog,
        }
    }

    /// Load the catalog from `toc_file`.
    pub fn open(input_dir: impl Into<PathBuf>, toc_file: &Path) -> Result<Self> {
        Ok(Self::new(input_dir, load_catalog(toc_file)?))
    }

    /// Path of a volume's text file.
    #[must_use]
    pub fn text_path(&self, volume: &str) -> PathBuf {
        self.input_dir.join(format!("{volume}.txt"))
    }
}

impl VolumeSource for DirectorySource {
    fn volume_keys(&self) -> Vec<String> {
        self.catalog.keys().cloned().collect()
    }

    fn text(&self, volume: &str) -> Result<String> {
        let path = self.text_path(volume);
        fs::read_to_string(&path)
            .map_err(|e| SegmenterError::unavailable(volume, format!("{}: {e}", path.display())))
    }

    fn table_of_contents(&self, volume: &str) -> Result<&[String]> {
        self.catalog
            .get(volume)
            .map(Vec::as_slice)
            .ok_or_else(|| SegmenterError::UnknownVolume(volume.to_string()))
    }
}

/// Volumes held in memory.
#[derive(Debug, Default)]
pub struct InMemorySource {
    catalog: Catalog,
    texts: HashMap<String, String>,
}

impl InMemorySource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a volume with its text and table of contents.
    #[must_use]
    pub fn with_volume(
        mut self,
        volume: impl Into<String>,
        text: impl Into<String>,
        toc: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        let volume = volume.into();
        self.texts.insert(volume.clone(), text.into());
        self.catalog
            .insert(volume, toc.into_iter().map(Into::into).collect());
        self
    }

    /// Add a catalog entry whose text was never acquired.
    #[must_use]
    pub fn with_missing_text(
        mut self,
        volume: impl Into<String>,
        toc: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.catalog
            .insert(volume.into(), toc.into_iter().map(Into::into).collect());
        self
    }
}

impl VolumeSource for InMemorySource {
    fn volume_keys(&self) -> Vec<String> {
        self.catalog.keys().cloned().collect()
    }

    fn text(&self, volume: &str) -> Result<String> {
        self.texts
            .get(volume)
            .cloned()
            .ok_or_else(|| SegmenterError::unavailable(volume, "no text acquired"))
    }

    fn table_of_contents(&self, volume: &str) -> Result<&[String]> {
        self.catalog
            .get(volume)
            .map(Vec::as_slice)
            .ok_or_else(|| SegmenterError::UnknownVolume(volume.to_string()))
    }
}
