use axum::extract::Json;
use axum::http::{HeaderName, Request, StatusCode};
use axum::middleware::from_fn_with_state;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::Router;
use serde_json::json;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use crate::config::ApiMode;
use crate::middleware::require_auth;
use crate::state::AppState;
use crate::{users, workouts};

const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({ "status": "ok" })))
}

/// Builds the full application for the configured [`ApiMode`].
pub fn build_router(state: AppState) -> Router {
    let mut workouts = Router::new()
        .route(
            "/api/workouts",
            get(workouts::list_workouts).post(workouts::create_workout),
        )
        .route(
            "/api/workouts/:id",
            get(workouts::get_workout)
                .put(workouts::update_workout)
                .delete(workouts::delete_workout),
        );

    let mut app = Router::new().route("/health", get(health));
    if state.config.mode == ApiMode::Secured {
        workouts = workouts.route_layer(from_fn_with_state(state.clone(), require_auth));
        app = app
            .route("/api/user/signup", post(users::signup))
            .route("/api/user/login", post(users::login));
    }

    let trace_layer = TraceLayer::new_for_http().make_span_with(|req: &Request<_>| {
        let request_id = req
            .headers()
            .get(&REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("-");
        tracing::info_span!(
            "http",
            method = %req.method(),
            uri = %req.uri(),
            request_id = %request_id
        )
    });

    app.merge(workouts)
        .with_state(state)
        .layer(PropagateRequestIdLayer::new(REQUEST_ID_HEADER))
        .layer(SetRequestIdLayer::new(REQUEST_ID_HEADER, MakeRequestUuid))
        .layer(trace_layer)
}
