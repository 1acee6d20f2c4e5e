//! flatstore domain layer
//!
//! Entities stored by the service, their typed ids, and the validation rules
//! client payloads must pass before anything reaches a store.
//!
//! - **Value Objects**: typed ids (`CourseId`, `AuthorId`, `UserId`)
//! - **Entities**: `Course`, `Author`, `User` and the drafts clients submit
//! - **Validation**: `Validate` and `ModelValidator`

#![warn(missing_docs)]

pub mod entities;
pub mod validation;
pub mod value_objects;

pub use entities::{Author, AuthorDraft, Course, CourseDraft, Credentials, User};
pub use validation::{ModelValidator, Validate, ValidationErrors};
pub use value_objects::{AuthorId, CourseId, Id, IdMarker, UserId};

/// Domain Result type
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-specific errors
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum DomainError {
    /// Identifier is not acceptable
    #[error("Invalid id: {0}")]
    InvalidId(String),

    /// Payload failed validation
    #[error(transparent)]
    Validation(#[from] ValidationErrors),
}
