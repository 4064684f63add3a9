use axum::extract::State;
use axum::http::{HeaderMap, Request};
use axum::middleware::Next;
use axum::response::Response;

use crate::auth::decode_token;
use crate::db;
use crate::error::AppError;
use crate::state::AppState;

/// Identity of the caller, attached to the request by [`require_auth`].
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub id: String,
    pub email: String,
}

pub async fn require_auth<B>(
    State(state): State<AppState>,
    mut request: Request<B>,
    next: Next<B>,
) -> Result<Response, AppError> {
    let token = extract_bearer(request.headers()).ok_or_else(|| {
        tracing::debug!("rejecting request without bearer token");
        AppError::Unauthorized("authorization token required")
    })?;

    let claims = decode_token(&token, &state.config).map_err(|err| {
        tracing::debug!("rejecting request with invalid token");
        err
    })?;

    let user = db::get_user_by_id(&state.pool, &claims.sub)
        .await?
        .ok_or_else(|| {
            tracing::debug!(user_id = %claims.sub, "rejecting token for unknown user");
            AppError::Unauthorized("request is not authorized")
        })?;

    request.extensions_mut().insert(AuthUser {
        id: user.id,
        email: user.email,
    });
    Ok(next.run(request).await)
}

pub fn extract_bearer(headers: &HeaderMap) -> Option<String> {
    let header = headers.get(axum::http::header::AUTHORIZATION)?;
    let value = header.to_str().ok()?.trim();
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then(|| token.to_string())
}
