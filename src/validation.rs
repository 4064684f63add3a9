//! Boundary checks for user credentials and workout payloads.

use std::sync::OnceLock;

use regex::Regex;

use crate::config::ApiMode;
use crate::error::AppError;
use crate::models::{CreateWorkoutRequest, NewWorkout, UpdateWorkoutRequest, WorkoutPatch};

const MIN_PASSWORD_LEN: usize = 8;

fn email_pattern() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9\-]+(\.[A-Za-z0-9\-]+)*\.[A-Za-z]{2,}$")
            .expect("email pattern compiles")
    })
}

pub fn is_valid_email(email: &str) -> bool {
    email.len() <= 254 && email_pattern().is_match(email)
}

/// At least eight characters with a lowercase letter, an uppercase letter,
/// a digit and a symbol.
pub fn is_strong_password(password: &str) -> bool {
    password.chars().count() >= MIN_PASSWORD_LEN
        && password.chars().any(|c| c.is_lowercase())
        && password.chars().any(|c| c.is_uppercase())
        && password.chars().any(|c| c.is_ascii_digit())
        && password
            .chars()
            .any(|c| !c.is_alphanumeric() && !c.is_whitespace())
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Open mode only insists on a title; secured mode needs all three fields.
pub fn validate_new_workout(
    payload: CreateWorkoutRequest,
    mode: ApiMode,
) -> Result<NewWorkout, AppError> {
    let title = payload
        .title
        .map(|title| title.trim().to_string())
        .filter(|title| !title.is_empty());

    let mut empty = Vec::new();
    if title.is_none() {
        empty.push("title");
    }
    if mode == ApiMode::Secured {
        if payload.reps.is_none() {
            empty.push("reps");
        }
        if payload.load.is_none() {
            empty.push("load");
        }
    }

    match title {
        Some(title) if empty.is_empty() => {
            check_numbers(payload.reps, payload.load)?;
            Ok(NewWorkout {
                title,
                reps: payload.reps,
                load: payload.load,
            })
        }
        _ => Err(AppError::MissingFields(empty)),
    }
}

pub fn validate_workout_patch(payload: UpdateWorkoutRequest) -> Result<WorkoutPatch, AppError> {
    let title = match payload.title {
        Some(title) => {
            let title = title.trim().to_string();
            if title.is_empty() {
                return Err(AppError::BadRequest("title must not be empty".to_string()));
            }
            Some(title)
        }
        None => None,
    };
    check_numbers(payload.reps, payload.load)?;

    Ok(WorkoutPatch {
        title,
        reps: payload.reps,
        load: payload.load,
    })
}

fn check_numbers(reps: Option<i64>, load: Option<f64>) -> Result<(), AppError> {
    if reps.is_some_and(|reps| reps < 0) {
        return Err(AppError::BadRequest("reps must not be negative".to_string()));
    }
    if load.is_some_and(|load| !load.is_finite() || load < 0.0) {
        return Err(AppError::BadRequest(
            "load must be a non-negative number".to_string(),
        ));
    }
    Ok(())
}
