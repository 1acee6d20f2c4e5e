//! HTTP surface

pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod router;

pub use extract::{AuthContext, Payload};
pub use router::create_router;
