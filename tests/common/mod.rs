#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;
use workout_api::config::{ApiMode, Config};
use workout_api::db;
use workout_api::routes::build_router;
use workout_api::state::AppState;

pub const TEST_SECRET: &str = "integration-test-secret";

/// A router backed by its own in-memory database.
pub async fn app(mode: ApiMode) -> Router {
    let pool = db::connect("sqlite::memory:", 1).await.unwrap();
    db::init_db(&pool).await.unwrap();
    build_router(AppState::new(pool, Config::with_mode(mode, TEST_SECRET)))
}

pub struct TestResponse {
    pub status: StatusCode,
    pub content_type: Option<String>,
    pub body: Value,
}

pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> TestResponse {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .map(|v| v.to_str().unwrap().to_string());
    let bytes = hyper::body::to_bytes(response.into_body()).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    TestResponse {
        status,
        content_type,
        body,
    }
}

pub async fn signup(app: &Router, email: &str, password: &str) -> TestResponse {
    send(
        app,
        Method::POST,
        "/api/user/signup",
        None,
        Some(serde_json::json!({ "email": email, "password": password })),
    )
    .await
}

/// Signs up a fresh user and returns its token.
pub async fn token_for(app: &Router, email: &str) -> String {
    let response = signup(app, email, "R3g5T7#gh").await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    response.body["token"].as_str().unwrap().to_string()
}

pub fn titles(body: &Value) -> Vec<String> {
    body.as_array()
        .unwrap()
        .iter()
        .map(|w| w["title"].as_str().unwrap().to_string())
        .collect()
}
