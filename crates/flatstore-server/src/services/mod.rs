//! Entity services over the store

mod auth;
mod authors;
mod courses;
mod items;

pub use auth::{AuthService, Registration};
pub use authors::AuthorService;
pub use courses::CourseService;
pub use items::{Collection, Mutation};

use flatstore::StoreError;

use crate::security::TokenError;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Failures a service cannot turn into an outcome
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Token(#[from] TokenError),
}
