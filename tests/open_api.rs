mod common;

use axum::http::{Method, StatusCode};
use axum::Router;
use common::{app, send, titles};
use serde_json::json;
use workout_api::config::ApiMode;

async fn seeded_app() -> Router {
    let app = app(ApiMode::Open).await;
    for workout in [
        json!({ "title": "test workout 1", "reps": 11, "load": 101 }),
        json!({ "title": "test workout 2", "reps": 12, "load": 102 }),
    ] {
        let response = send(&app, Method::POST, "/api/workouts", None, Some(workout)).await;
        assert_eq!(response.status, StatusCode::CREATED);
    }
    app
}

#[tokio::test]
async fn all_workouts_are_returned_as_json() {
    let app = seeded_app().await;
    let response = send(&app, Method::GET, "/api/workouts", None, None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response
        .content_type
        .unwrap()
        .starts_with("application/json"));
    assert_eq!(response.body.as_array().unwrap().len(), 2);
    assert!(titles(&response.body).contains(&"test workout 2".to_string()));
}

#[tokio::test]
async fn valid_workout_is_added() {
    let app = seeded_app().await;
    let created = send(
        &app,
        Method::POST,
        "/api/workouts",
        None,
        Some(json!({ "title": "Situps", "reps": 25, "load": 10 })),
    )
    .await;
    assert_eq!(created.status, StatusCode::CREATED);
    assert!(created
        .content_type
        .unwrap()
        .starts_with("application/json"));
    assert_eq!(created.body["title"], "Situps");
    assert!(created.body.get("owner").is_none());

    let listed = send(&app, Method::GET, "/api/workouts", None, None).await;
    assert_eq!(listed.body.as_array().unwrap().len(), 3);
    assert_eq!(titles(&listed.body)[0], "Situps");
}

#[tokio::test]
async fn workout_with_only_a_title_is_added() {
    let app = seeded_app().await;
    let created = send(
        &app,
        Method::POST,
        "/api/workouts",
        None,
        Some(json!({ "title": "Situps" })),
    )
    .await;
    assert_eq!(created.status, StatusCode::CREATED, "{:?}", created.body);
    assert_eq!(created.body["title"], "Situps");
    assert!(created.body.get("reps").is_none());
    assert!(created.body.get("load").is_none());

    let listed = send(&app, Method::GET, "/api/workouts", None, None).await;
    assert_eq!(listed.body.as_array().unwrap().len(), 3);
    assert!(titles(&listed.body).contains(&"Situps".to_string()));

    let uri = format!("/api/workouts/{}", created.body["id"].as_str().unwrap());
    let updated = send(&app, Method::PUT, &uri, None, Some(json!({ "reps": 30 }))).await;
    assert_eq!(updated.status, StatusCode::OK);
    assert_eq!(updated.body["reps"], 30);
    assert!(updated.body.get("load").is_none());
}

#[tokio::test]
async fn workout_without_title_is_not_added() {
    let app = seeded_app().await;
    let response = send(
        &app,
        Method::POST,
        "/api/workouts",
        None,
        Some(json!({ "reps": 23 })),
    )
    .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["emptyFields"], json!(["title"]));

    let listed = send(&app, Method::GET, "/api/workouts", None, None).await;
    assert_eq!(listed.body.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn malformed_body_is_a_json_bad_request() {
    let app = seeded_app().await;
    let response = send(
        &app,
        Method::POST,
        "/api/workouts",
        None,
        Some(json!({ "title": "x", "reps": "many", "load": 1 })),
    )
    .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(response.body["error"].is_string());
}

#[tokio::test]
async fn delete_removes_the_workout() {
    let app = seeded_app().await;
    let listed = send(&app, Method::GET, "/api/workouts", None, None).await;
    let target = listed.body[0].clone();
    let uri = format!("/api/workouts/{}", target["id"].as_str().unwrap());

    let deleted = send(&app, Method::DELETE, &uri, None, None).await;
    assert_eq!(deleted.status, StatusCode::NO_CONTENT);
    assert!(deleted.body.is_null());

    let listed = send(&app, Method::GET, "/api/workouts", None, None).await;
    assert_eq!(listed.body.as_array().unwrap().len(), 1);
    assert!(!titles(&listed.body).contains(&target["title"].as_str().unwrap().to_string()));

    let again = send(&app, Method::DELETE, &uri, None, None).await;
    assert_eq!(again.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn update_and_read_one_work_without_auth() {
    let app = seeded_app().await;
    let listed = send(&app, Method::GET, "/api/workouts", None, None).await;
    let uri = format!("/api/workouts/{}", listed.body[0]["id"].as_str().unwrap());

    let updated = send(&app, Method::PUT, &uri, None, Some(json!({ "load": 150.5 }))).await;
    assert_eq!(updated.status, StatusCode::OK);

    let read = send(&app, Method::GET, &uri, None, None).await;
    assert_eq!(read.status, StatusCode::OK);
    assert_eq!(read.body["title"], "test workout 2");
    assert_eq!(read.body["reps"], 12);
    assert_eq!(read.body["load"], 150.5);
}

#[tokio::test]
async fn unknown_and_malformed_ids_are_not_found() {
    let app = seeded_app().await;
    for uri in [
        "/api/workouts/8f2c5d8e-0000-4000-8000-000000000000",
        "/api/workouts/not-an-id",
    ] {
        let response = send(&app, Method::GET, uri, None, None).await;
        assert_eq!(response.status, StatusCode::NOT_FOUND, "{uri}");
    }
}

#[tokio::test]
async fn user_routes_are_not_mounted() {
    let app = seeded_app().await;
    let response = send(
        &app,
        Method::POST,
        "/api/user/signup",
        None,
        Some(json!({ "email": "mattiv@matti.fi", "password": "R3g5T7#gh" })),
    )
    .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn health_is_ok() {
    let app = app(ApiMode::Open).await;
    let response = send(&app, Method::GET, "/health", None, None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "ok");
}
