//! Read side of the store: whole-file load, lookups and tail position

use std::path::Path;

use tokio::{
    fs::{self, File},
    io::{AsyncBufRead, BufReader},
};
use tracing::debug;

use crate::{
    config::StoreConfig,
    document::Document,
    error::{Result, StoreError},
    matcher::{Filter, matches_all_exact},
    parser::{ObjectStream, ParseError, ScannedObject, scanner::is_whitespace},
};

/// Stream type produced by [`StoreReader::open_stream`]
pub type FileStream = ObjectStream<BufReader<File>>;

/// Reader for JSON-array stores
///
/// Holds no state besides its configuration; every call opens its own file
/// handle and releases it before returning.
#[derive(Debug, Clone, Default)]
pub struct StoreReader {
    config: StoreConfig,
}

impl StoreReader {
    pub fn new(config: StoreConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Read and parse the whole store
    ///
    /// A missing file is `ReadFailed`; a whitespace-only file is an empty
    /// store.
    pub async fn load_all(&self, path: impl AsRef<Path>) -> Result<Vec<Document>> {
        let path = path.as_ref();
        let bytes = fs::read(path)
            .await
            .map_err(|e| StoreError::read_failed(path, e))?;

        if bytes.iter().all(|byte| is_whitespace(*byte)) {
            debug!("Store {} is blank", path.display());
            return Ok(Vec::new());
        }

        let documents: Vec<Document> = serde_json::from_slice(&bytes)
            .map_err(|e| StoreError::corrupt(path, e.to_string()))?;

        debug!(
            "Loaded {} documents from {}",
            documents.len(),
            path.display()
        );
        Ok(documents)
    }

    /// First document equal to `equality` on every listed field
    ///
    /// Stops reading as soon as a match is found. `Ok(None)` means the store
    /// was scanned to the end without a match.
    pub async fn find_one(
        &self,
        path: impl AsRef<Path>,
        equality: &Document,
    ) -> Result<Option<Document>> {
        let path = path.as_ref();
        let mut stream = self.open_stream(path).await?;

        let found = first_match(&mut stream, equality)
            .await
            .map_err(|e| StoreError::from_parse(path, e))?;

        debug!(
            "Lookup in {} {} after {} bytes",
            path.display(),
            if found.is_some() { "matched" } else { "missed" },
            stream.position()
        );
        Ok(found.map(|object| object.document))
    }

    /// Every document satisfying `filter`, in file order
    pub async fn find_all(&self, path: impl AsRef<Path>, filter: &Filter) -> Result<Vec<Document>> {
        let path = path.as_ref();
        let mut stream = self.open_stream(path).await?;

        let documents = all_matches(&mut stream, filter)
            .await
            .map_err(|e| StoreError::from_parse(path, e))?;

        debug!(
            "Filter over {} matched {} documents",
            path.display(),
            documents.len()
        );
        Ok(documents)
    }

    /// Offset of the last byte of the store, `0` for an empty file
    pub async fn tail_position(&self, path: impl AsRef<Path>) -> Result<u64> {
        let path = path.as_ref();
        let file = File::open(path)
            .await
            .map_err(|e| StoreError::read_failed(path, e))?;
        let mut reader = BufReader::with_capacity(self.config.read_buffer_size, file);

        let length = tokio::io::copy_buf(&mut reader, &mut tokio::io::sink())
            .await
            .map_err(|e| StoreError::read_failed(path, e))?;

        Ok(length.saturating_sub(1))
    }

    /// Open an object stream over the store at `path`
    pub async fn open_stream(&self, path: impl AsRef<Path>) -> Result<FileStream> {
        let path = path.as_ref();
        let file = File::open(path)
            .await
            .map_err(|e| StoreError::read_failed(path, e))?;
        let reader = BufReader::with_capacity(self.config.read_buffer_size, file);
        Ok(ObjectStream::with_limits(reader, self.config.limits))
    }
}

/// Drive `stream` until an object matches `equality` exactly
///
/// Nothing past the matching object's closing brace is consumed.
pub async fn first_match<R>(
    stream: &mut ObjectStream<R>,
    equality: &Document,
) -> std::result::Result<Option<ScannedObject>, ParseError>
where
    R: AsyncBufRead + Unpin,
{
    while let Some(object) = stream.next_object().await? {
        if matches_all_exact(&object.document, equality) {
            return Ok(Some(object));
        }
    }
    Ok(None)
}

/// Drive `stream` to the end collecting documents that satisfy `filter`
pub async fn all_matches<R>(
    stream: &mut ObjectStream<R>,
    filter: &Filter,
) -> std::result::Result<Vec<Document>, ParseError>
where
    R: AsyncBufRead + Unpin,
{
    let mut documents = Vec::new();
    while let Some(object) = stream.next_object().await? {
        if filter.matches(&object.document) {
            documents.push(object.document);
        }
    }
    Ok(documents)
}
