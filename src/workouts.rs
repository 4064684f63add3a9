use axum::extract::rejection::JsonRejection;
use axum::extract::{Json, Path, State};
use axum::http::StatusCode;
use axum::Extension;
use uuid::Uuid;

use crate::db::{self, Scope};
use crate::error::AppError;
use crate::middleware::AuthUser;
use crate::models::{CreateWorkoutRequest, UpdateWorkoutRequest, Workout};
use crate::state::AppState;
use crate::validation::{validate_new_workout, validate_workout_patch};

type Requester = Option<Extension<AuthUser>>;

fn scope_of(requester: &Requester) -> Scope<'_> {
    match requester {
        Some(Extension(user)) => Scope::Owner(&user.id),
        None => Scope::All,
    }
}

/// Malformed ids can never match a stored record.
fn parse_id(id: &str) -> Result<String, AppError> {
    Uuid::parse_str(id)
        .map(|id| id.to_string())
        .map_err(|_| AppError::NotFound)
}

pub async fn list_workouts(
    State(state): State<AppState>,
    requester: Requester,
) -> Result<Json<Vec<Workout>>, AppError> {
    let workouts = db::list_workouts(&state.pool, scope_of(&requester)).await?;
    Ok(Json(workouts))
}

pub async fn create_workout(
    State(state): State<AppState>,
    requester: Requester,
    payload: Result<Json<CreateWorkoutRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Workout>), AppError> {
    let Json(payload) = payload?;
    let workout = validate_new_workout(payload, state.config.mode)?;
    let owner = requester.as_ref().map(|Extension(user)| user.id.as_str());

    let created = db::create_workout(&state.pool, &workout, owner).await?;
    tracing::info!(workout_id = %created.id, owner = ?owner, "workout created");
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn get_workout(
    State(state): State<AppState>,
    requester: Requester,
    Path(id): Path<String>,
) -> Result<Json<Workout>, AppError> {
    let id = parse_id(&id)?;
    db::get_workout(&state.pool, &id, scope_of(&requester))
        .await?
        .map(Json)
        .ok_or(AppError::NotFound)
}

pub async fn update_workout(
    State(state): State<AppState>,
    requester: Requester,
    Path(id): Path<String>,
    payload: Result<Json<UpdateWorkoutRequest>, JsonRejection>,
) -> Result<Json<Workout>, AppError> {
    let id = parse_id(&id)?;
    let Json(payload) = payload?;
    let patch = validate_workout_patch(payload)?;

    let updated = db::update_workout(&state.pool, &id, &patch, scope_of(&requester))
        .await?
        .ok_or(AppError::NotFound)?;
    tracing::info!(workout_id = %updated.id, "workout updated");
    Ok(Json(updated))
}

pub async fn delete_workout(
    State(state): State<AppState>,
    requester: Requester,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let id = parse_id(&id)?;
    if !db::delete_workout(&state.pool, &id, scope_of(&requester)).await? {
        return Err(AppError::NotFound);
    }
    tracing::info!(workout_id = %id, "workout deleted");
    Ok(StatusCode::NO_CONTENT)
}
