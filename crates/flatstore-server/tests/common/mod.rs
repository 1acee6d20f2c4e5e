//! Shared helpers for HTTP tests

#![allow(dead_code)]

use axum::{
    Router,
    body::Body,
    http::{Request, Response, StatusCode, header},
};
use flatstore_server::{ServerConfig, build_app};
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;

pub const SECRET: &str = "integration-secret";

/// Router over a fresh data directory; keep the directory alive for the test
pub fn test_app() -> (Router, TempDir) {
    let dir = TempDir::new().unwrap();
    let config = ServerConfig::with_data_dir(dir.path()).with_token_secret(SECRET);
    (build_app(&config).unwrap(), dir)
}

pub fn request(method: &str, uri: &str, body: Option<Value>, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response: Response<Body> = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap()
    };
    (status, json)
}

/// Register and log in a user, returning the token
pub async fn login(app: &Router) -> String {
    let credentials = json!({"email": "tester@example.com", "password": "pw"});
    send(app, request("POST", "/register", Some(credentials.clone()), None)).await;
    let (status, body) = send(app, request("POST", "/login", Some(credentials), None)).await;
    assert_eq!(status, StatusCode::OK);
    body["result"].as_str().unwrap().to_string()
}

pub fn course(title: &str) -> Value {
    json!({
        "title": title,
        "description": "An introduction",
        "duration": 120,
        "authors": ["author-1"],
    })
}
