use axum::extract::rejection::JsonRejection;
use axum::extract::{Json, State};

use crate::auth::{create_token, hash_password, verify_password};
use crate::db;
use crate::error::AppError;
use crate::models::{AuthResponse, LoginRequest, SignupRequest};
use crate::state::AppState;
use crate::validation::{is_strong_password, is_valid_email, normalize_email};

pub async fn signup(
    State(state): State<AppState>,
    payload: Result<Json<SignupRequest>, JsonRejection>,
) -> Result<Json<AuthResponse>, AppError> {
    let Json(payload) = payload?;
    let email = normalize_email(&payload.email);
    if email.is_empty() || payload.password.is_empty() {
        return Err(AppError::BadRequest("all fields must be filled".to_string()));
    }
    if !is_valid_email(&email) {
        return Err(AppError::BadRequest("email is not valid".to_string()));
    }
    if !is_strong_password(&payload.password) {
        return Err(AppError::BadRequest(
            "password is not strong enough".to_string(),
        ));
    }

    let hash = hash_password(&payload.password, &state.config)?;
    let user = db::create_user(&state.pool, &email, &hash)
        .await?
        .ok_or_else(|| AppError::BadRequest("email already in use".to_string()))?;
    let token = create_token(&user.id, &state.config)?;
    tracing::info!(user_id = %user.id, "user signed up");

    Ok(Json(AuthResponse {
        email: user.email,
        token,
    }))
}

pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<AuthResponse>, AppError> {
    let Json(payload) = payload?;
    let email = normalize_email(&payload.email);
    if email.is_empty() || payload.password.is_empty() {
        return Err(AppError::BadRequest("all fields must be filled".to_string()));
    }

    let user = db::find_user_by_email(&state.pool, &email)
        .await?
        .ok_or(AppError::InvalidCredentials)?;
    if !verify_password(&payload.password, &user.password_hash)? {
        return Err(AppError::InvalidCredentials);
    }

    let token = create_token(&user.id, &state.config)?;
    Ok(Json(AuthResponse {
        email: user.email,
        token,
    }))
}
