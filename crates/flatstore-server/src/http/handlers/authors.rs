//! `/authors` endpoints

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use flatstore_domain::{Author, AuthorDraft, AuthorId};

use crate::{
    error::ApiResult,
    http::extract::{AuthContext, Payload},
    response::Envelope,
    services::Mutation,
    state::AppState,
};

fn not_found(id: &AuthorId) -> String {
    format!("Author with id - {id} was not found.")
}

pub async fn list(State(state): State<AppState>) -> ApiResult<Envelope<Vec<Author>>> {
    Ok(Envelope::ok(state.authors.all().await?))
}

pub async fn add(
    State(state): State<AppState>,
    _auth: AuthContext,
    Payload(draft): Payload<AuthorDraft>,
) -> ApiResult<Envelope<&'static str>> {
    state.authors.add(draft).await?;
    Ok(Envelope::ok("Author was added."))
}

pub async fn get(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Response> {
    let id = AuthorId::parse(id)?;
    let response = match state.authors.get(&id).await? {
        Some(author) => Envelope::ok(author).into_response(),
        None => Envelope::ok(not_found(&id)).into_response(),
    };
    Ok(response)
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    _auth: AuthContext,
    Payload(draft): Payload<AuthorDraft>,
) -> ApiResult<Envelope<String>> {
    let id = AuthorId::parse(id)?;
    let message = match state.authors.update(&id, draft).await? {
        Mutation::Applied => "Author was updated.".to_string(),
        Mutation::NotFound => not_found(&id),
    };
    Ok(Envelope::ok(message))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
    _auth: AuthContext,
) -> ApiResult<Envelope<String>> {
    let id = AuthorId::parse(id)?;
    let message = match state.authors.delete(&id).await? {
        Mutation::Applied => "Author was deleted.".to_string(),
        Mutation::NotFound => not_found(&id),
    };
    Ok(Envelope::ok(message))
}
