//! Course operations

use chrono::Utc;
use flatstore::{Filter, JsonStore};
use flatstore_domain::{Course, CourseDraft, CourseId};
use std::path::PathBuf;

use super::{Collection, Mutation, ServiceResult};

#[derive(Debug, Clone)]
pub struct CourseService {
    courses: Collection<Course>,
}

impl CourseService {
    pub fn new(store: JsonStore, path: impl Into<PathBuf>) -> Self {
        Self {
            courses: Collection::new(store, path),
        }
    }

    pub async fn all(&self) -> ServiceResult<Vec<Course>> {
        self.courses.all().await
    }

    pub async fn get(&self, id: &CourseId) -> ServiceResult<Option<Course>> {
        self.courses.get(id.as_str()).await
    }

    /// Courses matching query pairs like `("title", "rust,false")`
    pub async fn filter<I, K, V>(&self, pairs: I) -> ServiceResult<Vec<Course>>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: AsRef<str>,
    {
        self.courses.filter(&Filter::from_query(pairs)).await
    }

    /// Store a new course stamped with a fresh id and the current time
    pub async fn add(&self, draft: CourseDraft) -> ServiceResult<Course> {
        let course = Course::create(draft, Utc::now());
        self.courses.add(&course).await?;
        Ok(course)
    }

    /// Overwrite course `id`, keeping its original creation date
    pub async fn update(&self, id: &CourseId, draft: CourseDraft) -> ServiceResult<Mutation> {
        let Some(existing) = self.courses.get(id.as_str()).await? else {
            return Ok(Mutation::NotFound);
        };
        let course = Course::revise(id.clone(), existing.creation_date, draft);
        self.courses.update(id.as_str(), &course).await
    }

    pub async fn delete(&self, id: &CourseId) -> ServiceResult<Mutation> {
        self.courses.delete(id.as_str()).await
    }
}
