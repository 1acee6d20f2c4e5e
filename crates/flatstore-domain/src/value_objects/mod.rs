//! Value objects

mod id;

pub use id::{AuthorId, AuthorMarker, CourseId, CourseMarker, Id, IdMarker, UserId, UserMarker};
