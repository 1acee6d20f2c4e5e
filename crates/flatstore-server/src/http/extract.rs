//! Request extractors

use axum::{
    Json,
    extract::{FromRequest, FromRequestParts, Request},
    http::{header::AUTHORIZATION, request::Parts},
};
use flatstore_domain::Validate;
use serde_json::Value;

use crate::{
    error::ApiError,
    security::{Claims, TokenError},
    state::AppState,
};

/// JSON body checked by `T::validate`
///
/// Malformed JSON is a bad request; well-formed bodies that break a field
/// rule report every violated rule.
#[derive(Debug)]
pub struct Payload<T>(pub T);

impl<S, T> FromRequest<S> for Payload<T>
where
    S: Send + Sync,
    T: Validate,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<Value>::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
        Ok(Self(T::validate(&value)?))
    }
}

/// Verified caller of a protected route
///
/// A request without an `Authorization` header is refused with 403, one
/// with an unusable token with 401.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub claims: Claims,
}

impl FromRequestParts<AppState> for AuthContext {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or(ApiError::Forbidden)?;
        let raw = header
            .to_str()
            .map_err(|_| ApiError::Unauthorized(TokenError::Missing))?;

        let claims = state.tokens().verify(raw)?;
        Ok(Self { claims })
    }
}
