//! Signed session tokens

use std::{sync::Arc, time::Duration};

use chrono::Utc;
use dashmap::DashMap;
use flatstore_domain::User;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

const BEARER_PREFIX: &str = "Bearer ";

/// Token errors
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("No token supplied")]
    Missing,

    #[error("Invalid token: {0}")]
    Invalid(#[from] jsonwebtoken::errors::Error),

    #[error("Token has been revoked")]
    Revoked,

    #[error("Failed to sign token: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),
}

/// Claims carried by every token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: String,
    pub email: String,
    /// Issued at, seconds since the epoch
    pub iat: u64,
    /// Expiry, seconds since the epoch
    pub exp: u64,
    /// Unique token id used for revocation
    pub jti: String,
}

struct TokenInner {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
    // jti -> exp
    revoked: DashMap<String, u64>,
}

/// HS256 token issuer and verifier with an in-memory revocation list
#[derive(Clone)]
pub struct TokenService {
    inner: Arc<TokenInner>,
}

impl TokenService {
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            inner: Arc::new(TokenInner {
                encoding: EncodingKey::from_secret(secret),
                decoding: DecodingKey::from_secret(secret),
                validation,
                ttl,
                revoked: DashMap::new(),
            }),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.inner.ttl
    }

    /// Issue a token for `user` valid for the configured lifetime
    pub fn sign(&self, user: &User) -> Result<String, TokenError> {
        self.sign_at(user, now_secs())
    }

    pub(crate) fn sign_at(&self, user: &User, issued_at: u64) -> Result<String, TokenError> {
        let claims = Claims {
            sub: user.id.to_string(),
            email: user.email.clone(),
            iat: issued_at,
            exp: issued_at.saturating_add(self.inner.ttl.as_secs()),
            jti: Uuid::new_v4().to_string(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.inner.encoding)
            .map_err(TokenError::Signing)
    }

    /// Verify a raw `Authorization` value, with or without the `Bearer ` prefix
    pub fn verify(&self, raw: &str) -> Result<Claims, TokenError> {
        let raw = raw.trim();
        let token = raw.strip_prefix(BEARER_PREFIX).unwrap_or(raw).trim();
        if token.is_empty() {
            return Err(TokenError::Missing);
        }

        let claims = decode::<Claims>(token, &self.inner.decoding, &self.inner.validation)?.claims;
        if self.inner.revoked.contains_key(&claims.jti) {
            return Err(TokenError::Revoked);
        }
        Ok(claims)
    }

    /// Reject `claims` until they expire
    pub fn revoke(&self, claims: &Claims) {
        let now = now_secs();
        self.inner.revoked.retain(|_, exp| *exp >= now);
        self.inner.revoked.insert(claims.jti.clone(), claims.exp);
        debug!("Revoked token {} for {}", claims.jti, claims.sub);
    }

    /// Revocations still tracked
    pub fn revoked_count(&self) -> usize {
        self.inner.revoked.len()
    }
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("ttl", &self.inner.ttl)
            .field("revoked", &self.inner.revoked.len())
            .finish_non_exhaustive()
    }
}

fn now_secs() -> u64 {
    u64::try_from(Utc::now().timestamp()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use flatstore_domain::{Credentials, Validate};
    use serde_json::json;

    fn service() -> TokenService {
        TokenService::new(b"test-secret", Duration::from_secs(600))
    }

    fn user() -> User {
        let credentials =
            Credentials::validate(&json!({"email": "a@b.c", "password": "pw"})).unwrap();
        User::register(credentials, "digest".into())
    }

    #[test]
    fn test_sign_and_verify() {
        let tokens = service();
        let user = user();
        let token = tokens.sign(&user).unwrap();

        let claims = tokens.verify(&token).unwrap();
        assert_eq!(claims.sub, user.id.as_str());
        assert_eq!(claims.email, "a@b.c");
        assert_eq!(claims.exp - claims.iat, 600);
    }

    #[test]
    fn test_bearer_prefix_accepted() {
        let tokens = service();
        let token = tokens.sign(&user()).unwrap();
        assert!(tokens.verify(&format!("Bearer {token}")).is_ok());
    }

    #[test]
    fn test_empty_token_is_missing() {
        assert!(matches!(service().verify("Bearer "), Err(TokenError::Missing)));
        assert!(matches!(service().verify(""), Err(TokenError::Missing)));
    }

    #[test]
    fn test_garbage_rejected() {
        assert!(matches!(
            service().verify("not-a-token"),
            Err(TokenError::Invalid(_))
        ));
    }

    #[test]
    fn test_other_secret_rejected() {
        let token = service().sign(&user()).unwrap();
        let other = TokenService::new(b"other-secret", Duration::from_secs(600));
        assert!(matches!(other.verify(&token), Err(TokenError::Invalid(_))));
    }

    #[test]
    fn test_expired_token_rejected() {
        let tokens = service();
        let token = tokens.sign_at(&user(), now_secs() - 3600).unwrap();
        assert!(matches!(tokens.verify(&token), Err(TokenError::Invalid(_))));
    }

    #[test]
    fn test_revoked_token_rejected() {
        let tokens = service();
        let token = tokens.sign(&user()).unwrap();
        let claims = tokens.verify(&token).unwrap();

        tokens.revoke(&claims);
        assert!(matches!(tokens.verify(&token), Err(TokenError::Revoked)));

        let fresh = tokens.sign(&user()).unwrap();
        assert!(tokens.verify(&fresh).is_ok());
    }

    #[test]
    fn test_revoke_purges_expired_entries() {
        let tokens = service();
        let stale = Claims {
            sub: "u".into(),
            email: "e".into(),
            iat: 0,
            exp: 1,
            jti: "stale".into(),
        };
        tokens.revoke(&stale);
        assert_eq!(tokens.revoked_count(), 1);

        let claims = tokens.verify(&tokens.sign(&user()).unwrap()).unwrap();
        tokens.revoke(&claims);
        assert_eq!(tokens.revoked_count(), 1);
    }
}
