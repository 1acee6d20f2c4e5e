//! Shared application state

use std::time::Duration;

use flatstore::JsonStore;
use tracing::warn;

use crate::{
    config::ServerConfig,
    error::StartupError,
    security::{PasswordHasher, TokenService},
    services::{AuthService, AuthorService, CourseService},
};

/// Services handed to every handler
///
/// All services share one [`JsonStore`], so writers to the same file are
/// serialized across endpoints.
#[derive(Debug, Clone)]
pub struct AppState {
    pub courses: CourseService,
    pub authors: AuthorService,
    pub auth: AuthService,
}

impl AppState {
    pub fn from_config(config: &ServerConfig) -> Result<Self, StartupError> {
        let (secret, generated) = config.resolve_secret().map_err(StartupError::Secret)?;
        if generated {
            warn!("No token secret configured; tokens and passwords will not survive a restart");
        }

        let store = JsonStore::new(config.store_config());
        let hasher = PasswordHasher::new(&secret).map_err(StartupError::Key)?;
        let tokens = TokenService::new(&secret, Duration::from_secs(config.token_ttl_secs));

        Ok(Self {
            courses: CourseService::new(store.clone(), config.courses_path()),
            authors: AuthorService::new(store.clone(), config.authors_path()),
            auth: AuthService::new(store, config.users_path(), hasher, tokens),
        })
    }

    pub fn tokens(&self) -> &TokenService {
        self.auth.tokens()
    }
}
