//! Password digests and session tokens

pub mod password;
pub mod token;

pub use password::PasswordHasher;
pub use token::{Claims, TokenError, TokenService};
