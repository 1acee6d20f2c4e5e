//! Write side of the store
//!
//! `initialize`, `replace` and `remove` build the complete new content in a
//! temp file and publish it with one rename, so readers see either the old
//! array or the new one. `append` rewrites the tail of the existing file in
//! place and is not crash-safe: an interrupted append can leave the array
//! unterminated.
//!
//! With `StoreConfig::serialize_writers` set, all mutations of one path run
//! one at a time. Without it, concurrent writers race and the last rename
//! wins.

mod atomic;
mod locks;

pub use locks::WriteLocks;

use std::{io::SeekFrom, ops::Range, path::Path};

use tokio::{
    fs::{File, OpenOptions},
    io::{AsyncReadExt, AsyncSeekExt, AsyncWriteExt},
    sync::OwnedMutexGuard,
};
use tracing::{debug, info};

use self::atomic::AtomicFile;
use crate::{
    config::StoreConfig,
    document::{self, Document},
    error::{Result, StoreError},
    parser::scanner::is_whitespace,
    reader::StoreReader,
};

/// Chunk size for the backwards scan from the tail
const TAIL_CHUNK: usize = 256;

/// Element located for replace or remove
#[derive(Debug, Clone, PartialEq, Eq)]
struct Target {
    span: Range<u64>,
    separator: Option<u64>,
    next_start: Option<u64>,
}

impl Target {
    /// Bytes to delete so the remaining array stays well formed
    fn removal_range(&self) -> Range<u64> {
        match (self.next_start, self.separator) {
            (Some(next), _) => self.span.start..next,
            (None, Some(comma)) => comma..self.span.end,
            (None, None) => self.span.clone(),
        }
    }
}

/// Writer for JSON-array stores
#[derive(Debug, Clone, Default)]
pub struct StoreWriter {
    reader: StoreReader,
    locks: WriteLocks,
}

impl StoreWriter {
    pub fn new(config: StoreConfig) -> Self {
        Self {
            reader: StoreReader::new(config),
            locks: WriteLocks::new(),
        }
    }

    pub fn config(&self) -> &StoreConfig {
        self.reader.config()
    }

    /// Create (or overwrite) the store with a single document
    pub async fn initialize(&self, path: impl AsRef<Path>, document: &Document) -> Result<()> {
        let path = path.as_ref();
        let _guard = self.lock(path).await;
        self.initialize_locked(path, document).await
    }

    /// Insert `document` before the closing `]` of an existing store
    ///
    /// Fails with `ReadFailed` when the store does not exist.
    pub async fn append(&self, path: impl AsRef<Path>, document: &Document) -> Result<()> {
        let path = path.as_ref();
        let _guard = self.lock(path).await;
        self.append_locked(path, document).await
    }

    /// Append, creating the store when it does not exist yet
    pub async fn insert(&self, path: impl AsRef<Path>, document: &Document) -> Result<()> {
        let path = path.as_ref();
        let _guard = self.lock(path).await;

        match self.append_locked(path, document).await {
            Err(err) if err.is_missing_store() => {
                debug!("Store {} missing, initializing", path.display());
                self.initialize_locked(path, document).await
            }
            other => other,
        }
    }

    /// Substitute the first document whose `id` equals `id`
    pub async fn replace(
        &self,
        path: impl AsRef<Path>,
        document: &Document,
        id: &str,
    ) -> Result<()> {
        let path = path.as_ref();
        let body = document::to_bytes(document)?;
        let _guard = self.lock(path).await;

        let target = self
            .locate(path, id, false)
            .await?
            .ok_or_else(|| StoreError::target_not_found(path, id))?;

        self.rewrite(path, target.span, &body).await?;
        info!("Replaced {} in {}", id, path.display());
        Ok(())
    }

    /// Delete the first document whose `id` equals `id`
    pub async fn remove(&self, path: impl AsRef<Path>, id: &str) -> Result<()> {
        let path = path.as_ref();
        let _guard = self.lock(path).await;

        let target = self
            .locate(path, id, true)
            .await?
            .ok_or_else(|| StoreError::target_not_found(path, id))?;

        self.rewrite(path, target.removal_range(), b"").await?;
        info!("Removed {} from {}", id, path.display());
        Ok(())
    }

    async fn lock(&self, path: &Path) -> Option<OwnedMutexGuard<()>> {
        if self.config().serialize_writers {
            Some(self.locks.acquire(path).await)
        } else {
            None
        }
    }

    async fn initialize_locked(&self, path: &Path, document: &Document) -> Result<()> {
        let body = document::to_bytes(document)?;

        let mut staged = AtomicFile::create(path).await?;
        staged.write_all(b"[").await?;
        staged.write_all(&body).await?;
        staged.write_all(b"]").await?;
        staged.commit().await?;

        info!("Initialized store {}", path.display());
        Ok(())
    }

    async fn append_locked(&self, path: &Path, document: &Document) -> Result<()> {
        let body = document::to_bytes(document)?;
        let tail = self.reader.tail_position(path).await?;

        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(path)
            .await
            .map_err(|e| StoreError::read_failed(path, e))?;

        let last = previous_significant(&mut file, tail + 1)
            .await
            .map_err(|e| StoreError::read_failed(path, e))?;

        let (offset, separator): (u64, &[u8]) = match last {
            None => {
                let mut content = Vec::with_capacity(body.len() + 2);
                content.push(b'[');
                content.extend_from_slice(&body);
                content.push(b']');
                write_tail(&mut file, 0, &content)
                    .await
                    .map_err(|e| StoreError::write_failed(path, e))?;
                info!("Appended to blank store {}", path.display());
                return Ok(());
            }
            Some((bracket, b']')) => {
                let before = previous_significant(&mut file, bracket)
                    .await
                    .map_err(|e| StoreError::read_failed(path, e))?;
                match before {
                    Some((_, b'[')) => (bracket, b"".as_slice()),
                    Some((_, b'}')) => (bracket, b",".as_slice()),
                    _ => {
                        return Err(StoreError::corrupt(
                            path,
                            format!("unexpected content before closing ']' at byte {bracket}"),
                        ));
                    }
                }
            }
            Some((position, _)) => {
                return Err(StoreError::corrupt(
                    path,
                    format!("store does not end with ']' (last byte at {position})"),
                ));
            }
        };

        let mut content = Vec::with_capacity(separator.len() + body.len() + 1);
        content.extend_from_slice(separator);
        content.extend_from_slice(&body);
        content.push(b']');

        write_tail(&mut file, offset, &content)
            .await
            .map_err(|e| StoreError::write_failed(path, e))?;

        info!("Appended document to {}", path.display());
        Ok(())
    }

    /// Find the first element with `id`, optionally peeking at the next one
    async fn locate(&self, path: &Path, id: &str, with_next: bool) -> Result<Option<Target>> {
        let mut stream = self.reader.open_stream(path).await?;
        let parse_error = |e| StoreError::from_parse(path, e);

        while let Some(object) = stream.next_object().await.map_err(parse_error)? {
            if !document::has_id(&object.document, id) {
                continue;
            }

            let next_start = if with_next {
                stream
                    .next_object()
                    .await
                    .map_err(parse_error)?
                    .map(|next| next.span.start)
            } else {
                None
            };

            return Ok(Some(Target {
                span: object.span,
                separator: object.separator,
                next_start,
            }));
        }

        debug!("No document with id {} in {}", id, path.display());
        Ok(None)
    }

    /// Publish the store with `cut` replaced by `replacement`
    async fn rewrite(&self, path: &Path, cut: Range<u64>, replacement: &[u8]) -> Result<()> {
        let mut source = File::open(path)
            .await
            .map_err(|e| StoreError::read_failed(path, e))?;
        let mut staged = AtomicFile::create(path).await?;

        let copied = tokio::io::copy(&mut (&mut source).take(cut.start), staged.file())
            .await
            .map_err(|e| StoreError::write_failed(path, e))?;
        if copied != cut.start {
            return Err(StoreError::read_failed(
                path,
                std::io::Error::from(std::io::ErrorKind::UnexpectedEof),
            ));
        }

        staged.write_all(replacement).await?;

        source
            .seek(SeekFrom::Start(cut.end))
            .await
            .map_err(|e| StoreError::read_failed(path, e))?;
        tokio::io::copy(&mut source, staged.file())
            .await
            .map_err(|e| StoreError::write_failed(path, e))?;

        staged.commit().await
    }
}

/// Last non-whitespace byte strictly before `end`
///
/// Reads tolerate a short file, so `end` may overshoot the real length.
async fn previous_significant(file: &mut File, end: u64) -> std::io::Result<Option<(u64, u8)>> {
    let mut chunk = [0u8; TAIL_CHUNK];
    let mut end = end;

    while end > 0 {
        let start = end.saturating_sub(TAIL_CHUNK as u64);
        let wanted = (end - start) as usize;

        file.seek(SeekFrom::Start(start)).await?;
        let mut filled = 0;
        while filled < wanted {
            let read = file.read(&mut chunk[filled..wanted]).await?;
            if read == 0 {
                break;
            }
            filled += read;
        }

        if let Some(index) = chunk[..filled].iter().rposition(|byte| !is_whitespace(*byte)) {
            return Ok(Some((start + index as u64, chunk[index])));
        }
        end = start;
    }

    Ok(None)
}

/// Overwrite from `offset` with `content` and drop anything after it
async fn write_tail(file: &mut File, offset: u64, content: &[u8]) -> std::io::Result<()> {
    file.seek(SeekFrom::Start(offset)).await?;
    file.write_all(content).await?;
    file.set_len(offset + content.len() as u64).await?;
    file.flush().await?;
    file.sync_all().await
}
