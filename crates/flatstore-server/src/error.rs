//! HTTP error mapping

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use flatstore_domain::{DomainError, ValidationErrors};
use serde_json::json;
use tracing::error;

use crate::{security::TokenError, services::ServiceError};

pub type ApiResult<T> = Result<T, ApiError>;

/// Errors returned by handlers and middleware
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Invalid id: {0}")]
    InvalidId(String),

    /// No `Authorization` header on a protected route
    #[error("Authorization required")]
    Forbidden,

    #[error("Unauthorized: {0}")]
    Unauthorized(#[from] TokenError),

    #[error(transparent)]
    Service(#[from] ServiceError),
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(errors) => Self::Validation(errors),
            other => Self::InvalidId(other.to_string()),
        }
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::BadRequest(_) | Self::InvalidId(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Service(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            Self::Validation(errors) => json!({
                "successful": false,
                "errors": errors.messages(),
            }),
            Self::BadRequest(_) | Self::InvalidId(_) => json!({
                "successful": false,
                "errors": [self.to_string()],
            }),
            Self::Forbidden | Self::Unauthorized(_) => json!({ "successful": false }),
            Self::Service(err) => {
                error!("Request failed: {}", err);
                json!({
                    "successful": false,
                    "message": "Internal server error",
                })
            }
        };

        (status, Json(body)).into_response()
    }
}

/// Failures while bringing the server up
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("Failed to generate token secret: {0}")]
    Secret(getrandom::Error),

    #[error("Invalid token secret: {0}")]
    Key(hmac::digest::InvalidLength),

    #[error("Invalid CORS origin {0}")]
    CorsOrigin(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
