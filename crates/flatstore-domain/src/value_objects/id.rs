//! Typed identifier value object
//!
//! Stored documents address each other by string ids. New ids are random
//! UUIDs, but ids already present in a store are accepted as they are, so
//! the value is kept as a string. The phantom marker keeps course, author and
//! user ids from being mixed up.

use std::fmt;
use std::marker::PhantomData;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

use crate::{DomainError, DomainResult};

mod private {
    pub trait Sealed {}
}

/// Marker trait for typed ids; sealed to the markers below
pub trait IdMarker: private::Sealed + Send + Sync + 'static {
    /// Entity name used in messages
    const ENTITY: &'static str;
}

/// Marker for course ids
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CourseMarker;

/// Marker for author ids
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AuthorMarker;

/// Marker for user ids
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserMarker;

impl private::Sealed for CourseMarker {}
impl private::Sealed for AuthorMarker {}
impl private::Sealed for UserMarker {}

impl IdMarker for CourseMarker {
    const ENTITY: &'static str = "Course";
}

impl IdMarker for AuthorMarker {
    const ENTITY: &'static str = "Author";
}

impl IdMarker for UserMarker {
    const ENTITY: &'static str = "User";
}

/// String identifier tagged with the entity it belongs to
///
/// ```compile_fail
/// # use flatstore_domain::value_objects::{AuthorId, CourseId};
/// let course: CourseId = CourseId::generate();
/// let author: AuthorId = course; // different entity
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Id<T: IdMarker> {
    value: String,
    _marker: PhantomData<T>,
}

impl<T: IdMarker> Id<T> {
    /// Fresh random id
    #[must_use]
    pub fn generate() -> Self {
        Self::from_uuid(Uuid::new_v4())
    }

    /// Id from an existing UUID
    #[must_use]
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self {
            value: uuid.to_string(),
            _marker: PhantomData,
        }
    }

    /// Accept an id read from a path or a store
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidId` for empty ids and ids with leading or
    /// trailing whitespace.
    pub fn parse(value: impl Into<String>) -> DomainResult<Self> {
        let value = value.into();
        if value.is_empty() || value.trim() != value {
            return Err(DomainError::InvalidId(format!(
                "{} id must be a non-empty string without surrounding whitespace",
                T::ENTITY
            )));
        }
        Ok(Self {
            value,
            _marker: PhantomData,
        })
    }

    /// String form
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Consume into the string form
    #[must_use]
    pub fn into_string(self) -> String {
        self.value
    }

    /// Whether the id is a UUID
    #[must_use]
    pub fn is_uuid(&self) -> bool {
        Uuid::parse_str(&self.value).is_ok()
    }
}

impl<T: IdMarker> Default for Id<T> {
    fn default() -> Self {
        Self::generate()
    }
}

impl<T: IdMarker> fmt::Debug for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple(T::ENTITY).field(&self.value).finish()
    }
}

impl<T: IdMarker> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl<T: IdMarker> AsRef<str> for Id<T> {
    fn as_ref(&self) -> &str {
        &self.value
    }
}

impl<T: IdMarker> From<Uuid> for Id<T> {
    fn from(uuid: Uuid) -> Self {
        Self::from_uuid(uuid)
    }
}

impl<T: IdMarker> Serialize for Id<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.value)
    }
}

impl<'de, T: IdMarker> Deserialize<'de> for Id<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Self::parse(value).map_err(serde::de::Error::custom)
    }
}

/// Course identifier
pub type CourseId = Id<CourseMarker>;

/// Author identifier
pub type AuthorId = Id<AuthorMarker>;

/// User identifier
pub type UserId = Id<UserMarker>;
