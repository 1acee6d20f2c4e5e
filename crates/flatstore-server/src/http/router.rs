//! Route table and layers

use std::time::Duration;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{
        HeaderValue, Method,
        header::{AUTHORIZATION, CONTENT_TYPE},
    },
    middleware,
    routing::{delete, get, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::{handlers, middleware::security_headers};
use crate::{config::ServerConfig, error::StartupError, state::AppState};

/// Build the application router
///
/// Mutating routes require a bearer token, see
/// [`AuthContext`](super::extract::AuthContext).
pub fn create_router(state: AppState, config: &ServerConfig) -> Result<Router, StartupError> {
    let origins = config
        .cors_origins
        .iter()
        .map(|origin| {
            origin
                .parse::<HeaderValue>()
                .map_err(|_| StartupError::CorsOrigin(origin.clone()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let router = Router::new()
        .route("/courses/all", get(handlers::courses::list))
        .route("/courses/filter", get(handlers::courses::filter))
        .route("/courses/add", post(handlers::courses::add))
        .route(
            "/courses/{id}",
            get(handlers::courses::get)
                .put(handlers::courses::update)
                .delete(handlers::courses::delete),
        )
        .route("/authors/all", get(handlers::authors::list))
        .route("/authors/add", post(handlers::authors::add))
        .route(
            "/authors/{id}",
            get(handlers::authors::get)
                .put(handlers::authors::update)
                .delete(handlers::authors::delete),
        )
        .route("/login", post(handlers::auth::login))
        .route("/register", post(handlers::auth::register))
        .route("/logout", delete(handlers::auth::logout))
        .route("/health", get(handlers::health))
        .with_state(state)
        .layer(middleware::from_fn(security_headers))
        .layer(DefaultBodyLimit::max(config.max_body_bytes))
        .layer(
            CorsLayer::new()
                .allow_origin(origins)
                .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
                .allow_headers([CONTENT_TYPE, AUTHORIZATION])
                .max_age(Duration::from_secs(3600)),
        )
        .layer(TraceLayer::new_for_http());

    Ok(router)
}
