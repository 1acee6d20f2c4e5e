//! `/login`, `/register` and `/logout`

use axum::{extract::State, http::StatusCode};
use flatstore_domain::Credentials;

use crate::{
    error::ApiResult,
    http::extract::{AuthContext, Payload},
    response::Envelope,
    services::Registration,
    state::AppState,
};

pub async fn login(
    State(state): State<AppState>,
    Payload(credentials): Payload<Credentials>,
) -> ApiResult<Envelope<String>> {
    let envelope = match state.auth.login(&credentials).await? {
        Some(token) => Envelope::ok(token),
        None => Envelope::failed("User was not found.".to_string()),
    };
    Ok(envelope)
}

pub async fn register(
    State(state): State<AppState>,
    Payload(credentials): Payload<Credentials>,
) -> ApiResult<Envelope<&'static str>> {
    let envelope = match state.auth.register(credentials).await? {
        Registration::Created(_) => Envelope::ok("User was created."),
        Registration::EmailTaken => Envelope::failed("User with this email already exists."),
    };
    Ok(envelope)
}

pub async fn logout(State(state): State<AppState>, auth: AuthContext) -> StatusCode {
    state.auth.logout(&auth.claims);
    StatusCode::OK
}
