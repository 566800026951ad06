//! JSON file checkpoint store
//!
//! Snapshots are written to a temporary file next to the target, synced, and
//! renamed over it, so the snapshot path always holds a complete document.

use crate::checkpoint::traits::{CheckpointError, CheckpointResult, CheckpointStore};
use crate::model::CrawlResult;
use std::fs;
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Pretty-printed JSON snapshot at a fixed path
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the current snapshot, `None` if there is none yet
    pub fn load(&self) -> CheckpointResult<Option<CrawlResult>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_str(&content)?))
    }

    /// Copies the current snapshot into `backup_dir`
    pub fn backup(&self, backup_dir: &Path) -> CheckpointResult<Option<PathBuf>> {
        backup(&self.path, backup_dir)
    }

    fn parent_dir(&self) -> PathBuf {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }
}

impl CheckpointStore for JsonFileStore {
    fn persist(&mut self, result: &CrawlResult) -> CheckpointResult<()> {
        let dir = self.parent_dir();
        fs::create_dir_all(&dir)?;

        // Same directory as the target so the rename stays on one filesystem
        let mut tmp = NamedTempFile::new_in(&dir)?;
        {
            let mut writer = BufWriter::new(tmp.as_file_mut());
            serde_json::to_writer_pretty(&mut writer, result)?;
            writer.write_all(b"\n")?;
            writer.flush()?;
        }
        tmp.as_file().sync_all()?;

        tmp.persist(&self.path)
            .map_err(|e| CheckpointError::Persist {
                path: self.path.display().to_string(),
                source: e.error,
            })?;

        tracing::debug!(
            "Checkpointed {} entities to {}",
            result.len(),
            self.path.display()
        );
        Ok(())
    }
}

/// Copies a previous snapshot into `backup_dir` under the same file name
///
/// # Returns
///
/// * `Ok(Some(path))` - Where the backup was written
/// * `Ok(None)` - There was no previous snapshot to back up
/// * `Err(CheckpointError)` - The copy failed
pub fn backup(previous: &Path, backup_dir: &Path) -> CheckpointResult<Option<PathBuf>> {
    match fs::metadata(previous) {
        Ok(meta) if meta.is_file() => {}
        Ok(_) => {
            return Err(CheckpointError::InvalidPath(format!(
                "{} is not a file",
                previous.display()
            )))
        }
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    }

    let file_name = previous.file_name().ok_or_else(|| {
        CheckpointError::InvalidPath(format!("{} has no file name", previous.display()))
    })?;

    fs::create_dir_all(backup_dir)?;
    let destination = backup_dir.join(file_name);
    fs::copy(previous, &destination)?;

    Ok(Some(destination))
}
