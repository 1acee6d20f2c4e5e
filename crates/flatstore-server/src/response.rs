//! Response envelope

use axum::{
    Json,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// `{"successful": bool, "result": ...}` body shared by every endpoint
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Envelope<T> {
    pub successful: bool,
    pub result: T,
}

impl<T: Serialize> Envelope<T> {
    pub fn ok(result: T) -> Self {
        Self {
            successful: true,
            result,
        }
    }

    pub fn failed(result: T) -> Self {
        Self {
            successful: false,
            result,
        }
    }
}

impl<T: Serialize> IntoResponse for Envelope<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}
