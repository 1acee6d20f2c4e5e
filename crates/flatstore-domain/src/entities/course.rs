//! Course entity

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

use crate::{
    validation::{ModelValidator, Validate, ValidationErrors},
    value_objects::CourseId,
};

/// Stored course
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    /// Course title
    pub title: String,
    /// Course description
    pub description: String,
    /// RFC 3339 timestamp set when the course was added
    #[serde(rename = "creationDate")]
    pub creation_date: String,
    /// Duration in minutes
    pub duration: Number,
    /// Author ids
    pub authors: Vec<String>,
    /// Identifier
    pub id: CourseId,
}

impl Course {
    /// New course with a generated id
    pub fn create(draft: CourseDraft, now: DateTime<Utc>) -> Self {
        Self {
            title: draft.title,
            description: draft.description,
            creation_date: now.to_rfc3339_opts(SecondsFormat::Millis, true),
            duration: draft.duration,
            authors: draft.authors,
            id: CourseId::generate(),
        }
    }

    /// Course `id` with the draft's fields, keeping `creation_date`
    pub fn revise(id: CourseId, creation_date: String, draft: CourseDraft) -> Self {
        Self {
            title: draft.title,
            description: draft.description,
            creation_date,
            duration: draft.duration,
            authors: draft.authors,
            id,
        }
    }
}

/// Validated course fields supplied by a client
#[derive(Debug, Clone, PartialEq)]
pub struct CourseDraft {
    /// Course title
    pub title: String,
    /// Course description
    pub description: String,
    /// Duration in minutes
    pub duration: Number,
    /// Author ids
    pub authors: Vec<String>,
}

impl Validate for CourseDraft {
    fn validate(payload: &Value) -> Result<Self, ValidationErrors> {
        let mut validator = ModelValidator::new(payload);
        let title = validator.required_string("title");
        let description = validator.required_string("description");
        let duration = validator.required_positive_number("duration");
        let authors = validator.required_string_list("authors");

        validator.finish(|| {
            Some(Self {
                title: title?,
                description: description?,
                duration: duration?,
                authors: authors?,
            })
        })
    }
}
