//! Stored entities and the drafts clients submit for them

mod author;
mod course;
mod user;

pub use author::{Author, AuthorDraft};
pub use course::{Course, CourseDraft};
pub use user::{Credentials, User};
