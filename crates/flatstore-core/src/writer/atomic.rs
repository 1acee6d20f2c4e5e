//! Scoped temp file published by rename

use std::path::{Path, PathBuf};

use tempfile::TempPath;
use tokio::{fs::File, io::AsyncWriteExt};
use tracing::trace;

use crate::error::{Result, StoreError};

const TEMP_PREFIX: &str = ".flatstore-";
const TEMP_SUFFIX: &str = ".tmp";

/// Replacement content for `target`, staged in the same directory
///
/// Dropping an uncommitted `AtomicFile` deletes the temp file, so every early
/// return leaves the directory as it was. `file` is declared before `temp`
/// so the handle closes before the path is removed.
pub(crate) struct AtomicFile {
    file: File,
    temp: TempPath,
    target: PathBuf,
}

impl AtomicFile {
    /// Stage a temp file next to `target`, carrying over its permissions
    pub(crate) async fn create(target: &Path) -> Result<Self> {
        let dir = match target.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let named = tempfile::Builder::new()
            .prefix(TEMP_PREFIX)
            .suffix(TEMP_SUFFIX)
            .tempfile_in(dir)
            .map_err(|e| StoreError::write_failed(target, e))?;
        let (file, temp) = named.into_parts();

        if let Ok(metadata) = tokio::fs::metadata(target).await {
            file.set_permissions(metadata.permissions())
                .map_err(|e| StoreError::write_failed(target, e))?;
        }

        trace!("Staged {} for {}", temp.display(), target.display());
        Ok(Self {
            file: File::from_std(file),
            temp,
            target: target.to_path_buf(),
        })
    }

    /// Handle to the staged file
    pub(crate) fn file(&mut self) -> &mut File {
        &mut self.file
    }

    pub(crate) async fn write_all(&mut self, bytes: &[u8]) -> Result<()> {
        self.file
            .write_all(bytes)
            .await
            .map_err(|e| StoreError::write_failed(&self.target, e))
    }

    /// Flush, sync and rename over the target
    pub(crate) async fn commit(self) -> Result<()> {
        let Self {
            mut file,
            temp,
            target,
        } = self;

        file.flush()
            .await
            .map_err(|e| StoreError::write_failed(&target, e))?;
        file.sync_all()
            .await
            .map_err(|e| StoreError::write_failed(&target, e))?;
        drop(file);

        tokio::fs::rename(&temp, &target)
            .await
            .map_err(|e| StoreError::write_failed(&target, e))?;

        // The rename consumed the temp path; disarm delete-on-drop.
        let _ = temp.keep();
        Ok(())
    }
}
