//! Registration, login and logout

use std::path::PathBuf;

use flatstore::{Document, JsonStore};
use flatstore_domain::{Credentials, User};
use serde_json::Value;
use tracing::{debug, info};

use super::{Collection, ServiceResult};
use crate::security::{Claims, PasswordHasher, TokenService};

/// Outcome of a registration attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Registration {
    Created(User),
    EmailTaken,
}

#[derive(Debug, Clone)]
pub struct AuthService {
    users: Collection<User>,
    hasher: PasswordHasher,
    tokens: TokenService,
}

impl AuthService {
    pub fn new(
        store: JsonStore,
        path: impl Into<PathBuf>,
        hasher: PasswordHasher,
        tokens: TokenService,
    ) -> Self {
        Self {
            users: Collection::new(store, path),
            hasher,
            tokens,
        }
    }

    pub fn tokens(&self) -> &TokenService {
        &self.tokens
    }

    pub async fn register(&self, credentials: Credentials) -> ServiceResult<Registration> {
        if self.find_by_email(&credentials.email).await?.is_some() {
            debug!("Registration refused, email already in use");
            return Ok(Registration::EmailTaken);
        }

        let digest = self.hasher.digest(&credentials.password);
        let user = User::register(credentials, digest);
        self.users.add(&user).await?;
        info!("Registered user {}", user.id);
        Ok(Registration::Created(user))
    }

    /// Signed token for matching credentials, `None` otherwise
    pub async fn login(&self, credentials: &Credentials) -> ServiceResult<Option<String>> {
        let Some(user) = self.find_by_email(&credentials.email).await? else {
            return Ok(None);
        };
        if !self.hasher.verify(&credentials.password, &user.password) {
            return Ok(None);
        }

        let token = self.tokens.sign(&user)?;
        info!("User {} logged in", user.id);
        Ok(Some(token))
    }

    pub fn logout(&self, claims: &Claims) {
        self.tokens.revoke(claims);
        info!("User {} logged out", claims.sub);
    }

    async fn find_by_email(&self, email: &str) -> ServiceResult<Option<User>> {
        let mut equality = Document::new();
        equality.insert("email".to_string(), Value::String(email.to_string()));
        self.users.find(&equality).await
    }
}
