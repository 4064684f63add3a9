use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Workout {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reps: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub load: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct User {
    pub id: String,
    pub email: String,
    pub password_hash: String,
}

/// Workout body as sent by the client. Every field is optional here so that
/// missing fields surface as a validation error rather than a parse error.
#[derive(Debug, Default, Deserialize)]
pub struct CreateWorkoutRequest {
    pub title: Option<String>,
    pub reps: Option<i64>,
    pub load: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateWorkoutRequest {
    pub title: Option<String>,
    pub reps: Option<i64>,
    pub load: Option<f64>,
}

/// A validated workout. `reps` and `load` are only absent in open mode.
#[derive(Debug, Clone)]
pub struct NewWorkout {
    pub title: String,
    pub reps: Option<i64>,
    pub load: Option<f64>,
}

#[derive(Debug, Clone, Default)]
pub struct WorkoutPatch {
    pub title: Option<String>,
    pub reps: Option<i64>,
    pub load: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub email: String,
    pub token: String,
}
