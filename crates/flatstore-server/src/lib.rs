//! REST front end for flatstore
//!
//! Serves courses, authors and user accounts, each kept in its own JSON
//! array file under the data directory. Reads are public; adding, editing
//! and deleting require a token from `/login`.

pub mod config;
pub mod error;
pub mod http;
pub mod response;
pub mod security;
pub mod services;
pub mod state;

pub use config::ServerConfig;
pub use error::{ApiError, ApiResult, StartupError};
pub use http::create_router;
pub use state::AppState;

/// Build state and router for `config`
pub fn build_app(config: &ServerConfig) -> Result<axum::Router, StartupError> {
    let state = AppState::from_config(config)?;
    create_router(state, config)
}
