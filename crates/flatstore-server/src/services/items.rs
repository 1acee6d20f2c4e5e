//! Typed CRUD over one store file

use std::{
    marker::PhantomData,
    path::{Path, PathBuf},
};

use flatstore::{Document, Filter, ID_FIELD, JsonStore, StoreError, to_document};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use tracing::{info, warn};

use super::ServiceResult;

/// Result of an update or delete
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    Applied,
    NotFound,
}

impl Mutation {
    pub fn is_applied(self) -> bool {
        self == Self::Applied
    }
}

/// Store file holding records of type `T`
///
/// Missing or unreadable files read as empty. Corrupt files and failed
/// writes surface as errors.
pub struct Collection<T> {
    store: JsonStore,
    path: PathBuf,
    _record: PhantomData<fn() -> T>,
}

impl<T> Clone for Collection<T> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            path: self.path.clone(),
            _record: PhantomData,
        }
    }
}

impl<T> std::fmt::Debug for Collection<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collection")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl<T> Collection<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(store: JsonStore, path: impl Into<PathBuf>) -> Self {
        Self {
            store,
            path: path.into(),
            _record: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn all(&self) -> ServiceResult<Vec<T>> {
        match self.store.load_all(&self.path).await {
            Ok(documents) => decode_all(documents),
            Err(err @ StoreError::ReadFailed { .. }) => {
                warn!("Treating {} as empty: {}", self.path.display(), err);
                Ok(Vec::new())
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Record with `id`, or `None` when absent or the file cannot be read
    pub async fn get(&self, id: &str) -> ServiceResult<Option<T>> {
        let mut equality = Document::new();
        equality.insert(ID_FIELD.to_string(), Value::String(id.to_string()));
        self.find(&equality).await
    }

    /// First record whose fields equal every entry of `equality`
    pub async fn find(&self, equality: &Document) -> ServiceResult<Option<T>> {
        match self.store.find_one(&self.path, equality).await {
            Ok(Some(document)) => Ok(Some(decode(document)?)),
            Ok(None) => Ok(None),
            Err(err @ StoreError::ReadFailed { .. }) => {
                warn!("Lookup in unreadable {}: {}", self.path.display(), err);
                Ok(None)
            }
            Err(err) => Err(err.into()),
        }
    }

    pub async fn filter(&self, filter: &Filter) -> ServiceResult<Vec<T>> {
        match self.store.find_all(&self.path, filter).await {
            Ok(documents) => decode_all(documents),
            Err(err @ StoreError::ReadFailed { .. }) => {
                warn!("Filtering unreadable {}: {}", self.path.display(), err);
                Ok(Vec::new())
            }
            Err(err) => Err(err.into()),
        }
    }

    pub async fn add(&self, record: &T) -> ServiceResult<()> {
        let document = to_document(record).map_err(StoreError::from)?;
        self.store.insert(&self.path, &document).await?;
        info!("Added record to {}", self.path.display());
        Ok(())
    }

    pub async fn update(&self, id: &str, record: &T) -> ServiceResult<Mutation> {
        let document = to_document(record).map_err(StoreError::from)?;
        let outcome = self.store.replace(&self.path, &document, id).await;
        self.settle(outcome, "Updated", id)
    }

    pub async fn delete(&self, id: &str) -> ServiceResult<Mutation> {
        let outcome = self.store.remove(&self.path, id).await;
        self.settle(outcome, "Deleted", id)
    }

    fn settle(
        &self,
        outcome: flatstore::Result<()>,
        action: &str,
        id: &str,
    ) -> ServiceResult<Mutation> {
        match outcome {
            Ok(()) => {
                info!("{} record {} in {}", action, id, self.path.display());
                Ok(Mutation::Applied)
            }
            Err(StoreError::TargetNotFound { .. }) => Ok(Mutation::NotFound),
            Err(err) if err.is_missing_store() => Ok(Mutation::NotFound),
            Err(err) => Err(err.into()),
        }
    }
}

fn decode<T: DeserializeOwned>(document: Document) -> ServiceResult<T> {
    Ok(serde_json::from_value(Value::Object(document)).map_err(StoreError::from)?)
}

fn decode_all<T: DeserializeOwned>(documents: Vec<Document>) -> ServiceResult<Vec<T>> {
    documents.into_iter().map(decode).collect()
}
