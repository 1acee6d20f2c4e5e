//! Per-path writer serialization

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Registry of async mutexes keyed by absolute store path
///
/// Clones share the registry. Readers never consult it.
#[derive(Debug, Clone, Default)]
pub struct WriteLocks {
    locks: Arc<DashMap<PathBuf, Arc<Mutex<()>>>>,
}

impl WriteLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive write access to `path`
    pub async fn acquire(&self, path: &Path) -> OwnedMutexGuard<()> {
        let key = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
        let lock = self.locks.entry(key).or_default().clone();
        lock.lock_owned().await
    }

    /// Number of paths seen so far
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}
