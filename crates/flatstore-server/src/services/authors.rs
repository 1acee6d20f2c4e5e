//! Author operations

use flatstore::JsonStore;
use flatstore_domain::{Author, AuthorDraft, AuthorId};
use std::path::PathBuf;

use super::{Collection, Mutation, ServiceResult};

#[derive(Debug, Clone)]
pub struct AuthorService {
    authors: Collection<Author>,
}

impl AuthorService {
    pub fn new(store: JsonStore, path: impl Into<PathBuf>) -> Self {
        Self {
            authors: Collection::new(store, path),
        }
    }

    pub async fn all(&self) -> ServiceResult<Vec<Author>> {
        self.authors.all().await
    }

    pub async fn get(&self, id: &AuthorId) -> ServiceResult<Option<Author>> {
        self.authors.get(id.as_str()).await
    }

    pub async fn add(&self, draft: AuthorDraft) -> ServiceResult<Author> {
        let author = Author::create(draft);
        self.authors.add(&author).await?;
        Ok(author)
    }

    pub async fn update(&self, id: &AuthorId, draft: AuthorDraft) -> ServiceResult<Mutation> {
        let author = Author::revise(id.clone(), draft);
        self.authors.update(id.as_str(), &author).await
    }

    pub async fn delete(&self, id: &AuthorId) -> ServiceResult<Mutation> {
        self.authors.delete(id.as_str()).await
    }
}
