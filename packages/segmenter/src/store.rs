//! Persistence of the boundary index and the article collection.
//!
//! Both artifacts are pretty-printed JSON with 4-space indentation. Writes go
//! to a temporary file that is synced and then renamed over the target, so a
//! reader never sees a half-written artifact.

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::JSON_INDENT;
use crate::error::{Result, SegmenterError};
use crate::types::{ArticleRecord, BoundaryIndex};

/// Serialize `value` as indented JSON. Non-ASCII characters are written as is.
pub fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(JSON_INDENT);
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    value.serialize(&mut serializer)?;
    buffer.push(b'\n');
    Ok(buffer)
}

/// Write `value` to `path` atomically, creating parent directories.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let content = to_pretty_json(value)?;

    let dir = path.parent().unwrap_or(Path::new("."));
    fs::create_dir_all(dir)?;

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let temp_file = dir.join(format!(".{file_name}.tmp"));

    {
        let mut file = File::create(&temp_file)?;
        file.write_all(&content)?;
        file.sync_all()?;
    }

    #[cfg(target_os = "windows")]
    if path.exists() {
        fs::remove_file(path)?;
    }

    fs::rename(&temp_file, path)?;
    tracing::debug!(path = %path.display(), bytes = content.len(), "wrote artifact");
    Ok(())
}

/// Read a JSON artifact. Decoding failures are reported as a corrupt store.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let json = fs::read_to_string(path)?;
    serde_json::from_str(&json).map_err(|source| SegmenterError::CorruptStore {
        path: path.to_path_buf(),
        source,
    })
}

pub fn save_index(path: &Path, index: &BoundaryIndex) -> Result<()> {
    write_json(path, index)
}

pub fn load_index(path: &Path) -> Result<BoundaryIndex> {
    read_json(path)
}

pub fn save_articles(path: &Path, articles: &[ArticleRecord]) -> Result<()> {
    write_json(path, articles)
}

pub fn load_articles(path: &Path) -> Result<Vec<ArticleRecord>> {
    read_json(path)
}
