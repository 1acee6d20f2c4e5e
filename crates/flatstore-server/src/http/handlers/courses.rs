//! `/courses` endpoints

use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
};
use flatstore_domain::{Course, CourseDraft, CourseId};

use crate::{
    error::ApiResult,
    http::extract::{AuthContext, Payload},
    response::Envelope,
    services::Mutation,
    state::AppState,
};

fn not_found(id: &CourseId) -> String {
    format!("Course with id - {id} was not found.")
}

pub async fn list(State(state): State<AppState>) -> ApiResult<Envelope<Vec<Course>>> {
    Ok(Envelope::ok(state.courses.all().await?))
}

/// `?title=Rust,false&duration=90`
pub async fn filter(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> ApiResult<Envelope<Vec<Course>>> {
    Ok(Envelope::ok(state.courses.filter(pairs).await?))
}

pub async fn add(
    State(state): State<AppState>,
    _auth: AuthContext,
    Payload(draft): Payload<CourseDraft>,
) -> ApiResult<Envelope<&'static str>> {
    state.courses.add(draft).await?;
    Ok(Envelope::ok("Course was added."))
}

pub async fn get(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Response> {
    let id = CourseId::parse(id)?;
    let response = match state.courses.get(&id).await? {
        Some(course) => Envelope::ok(course).into_response(),
        None => Envelope::ok(not_found(&id)).into_response(),
    };
    Ok(response)
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    _auth: AuthContext,
    Payload(draft): Payload<CourseDraft>,
) -> ApiResult<Envelope<String>> {
    let id = CourseId::parse(id)?;
    let message = match state.courses.update(&id, draft).await? {
        Mutation::Applied => "Course was updated.".to_string(),
        Mutation::NotFound => not_found(&id),
    };
    Ok(Envelope::ok(message))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
    _auth: AuthContext,
) -> ApiResult<Envelope<String>> {
    let id = CourseId::parse(id)?;
    let message = match state.courses.delete(&id).await? {
        Mutation::Applied => "Course was deleted.".to_string(),
        Mutation::NotFound => not_found(&id),
    };
    Ok(Envelope::ok(message))
}
