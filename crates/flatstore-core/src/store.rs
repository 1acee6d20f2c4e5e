//! Facade bundling a reader and a writer over one configuration

use std::path::Path;

use crate::{
    config::StoreConfig,
    document::Document,
    error::Result,
    matcher::Filter,
    reader::{FileStream, StoreReader},
    writer::StoreWriter,
};

/// Handle to JSON-array stores
///
/// Cheap to clone; clones share the writer lock registry, so all clones
/// serialize mutations of the same path.
#[derive(Debug, Clone, Default)]
pub struct JsonStore {
    reader: StoreReader,
    writer: StoreWriter,
}

impl JsonStore {
    pub fn new(config: StoreConfig) -> Self {
        Self {
            reader: StoreReader::new(config.clone()),
            writer: StoreWriter::new(config),
        }
    }

    pub fn config(&self) -> &StoreConfig {
        self.reader.config()
    }

    pub fn reader(&self) -> &StoreReader {
        &self.reader
    }

    pub fn writer(&self) -> &StoreWriter {
        &self.writer
    }

    pub async fn load_all(&self, path: impl AsRef<Path>) -> Result<Vec<Document>> {
        self.reader.load_all(path).await
    }

    pub async fn find_one(
        &self,
        path: impl AsRef<Path>,
        equality: &Document,
    ) -> Result<Option<Document>> {
        self.reader.find_one(path, equality).await
    }

    pub async fn find_all(&self, path: impl AsRef<Path>, filter: &Filter) -> Result<Vec<Document>> {
        self.reader.find_all(path, filter).await
    }

    pub async fn tail_position(&self, path: impl AsRef<Path>) -> Result<u64> {
        self.reader.tail_position(path).await
    }

    pub async fn open_stream(&self, path: impl AsRef<Path>) -> Result<FileStream> {
        self.reader.open_stream(path).await
    }

    pub async fn initialize(&self, path: impl AsRef<Path>, document: &Document) -> Result<()> {
        self.writer.initialize(path, document).await
    }

    pub async fn append(&self, path: impl AsRef<Path>, document: &Document) -> Result<()> {
        self.writer.append(path, document).await
    }

    pub async fn insert(&self, path: impl AsRef<Path>, document: &Document) -> Result<()> {
        self.writer.insert(path, document).await
    }

    pub async fn replace(
        &self,
        path: impl AsRef<Path>,
        document: &Document,
        id: &str,
    ) -> Result<()> {
        self.writer.replace(path, document, id).await
    }

    pub async fn remove(&self, path: impl AsRef<Path>, id: &str) -> Result<()> {
        self.writer.remove(path, id).await
    }
}
