use std::str::FromStr;

use crate::error::AppError;
use crate::models::{NewWorkout, User, Workout, WorkoutPatch};
use chrono::{DateTime, TimeZone, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

/// Which workouts a query may see.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope<'a> {
    /// Every workout, regardless of owner.
    All,
    /// Only workouts owned by this user id.
    Owner(&'a str),
}

impl<'a> Scope<'a> {
    fn owner(self) -> Option<&'a str> {
        match self {
            Scope::All => None,
            Scope::Owner(user_id) => Some(user_id),
        }
    }
}

pub async fn connect(db_url: &str, max_connections: u32) -> Result<SqlitePool, AppError> {
    let options = SqliteConnectOptions::from_str(db_url)
        .map_err(|e| AppError::Internal(format!("parse database url: {}", e)))?
        .create_if_missing(true);

    if let Some(parent) = options.get_filename().parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .map_err(|e| AppError::Internal(format!("create database dir: {}", e)))?;
        }
    }

    SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await
        .map_err(|e| AppError::Internal(format!("connect database: {}", e)))
}

pub async fn init_db(pool: &SqlitePool) -> Result<(), AppError> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id TEXT PRIMARY KEY,
            email TEXT NOT NULL UNIQUE,
            password_hash TEXT NOT NULL,
            created_at INTEGER NOT NULL
        );
        "#,
    )
    .execute(pool)
    .await
    .map_err(|e| AppError::Internal(format!("create users table: {}", e)))?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS workouts (
            id TEXT PRIMARY KEY,
            title TEXT NOT NULL,
            reps INTEGER,
            load REAL,
            owner_id TEXT REFERENCES users (id) ON DELETE CASCADE,
            created_at INTEGER NOT NULL,
            updated_at INTEGER NOT NULL
        );
        "#,
    )
    .execute(pool)
    .await
    .map_err(|e| AppError::Internal(format!("create workouts table: {}", e)))?;

    sqlx::query("CREATE INDEX IF NOT EXISTS workouts_owner_idx ON workouts (owner_id, created_at);")
        .execute(pool)
        .await
        .map_err(|e| AppError::Internal(format!("create workouts index: {}", e)))?;

    Ok(())
}

/// Inserts a user; `Ok(None)` means the email is already registered.
pub async fn create_user(
    pool: &SqlitePool,
    email: &str,
    password_hash: &str,
) -> Result<Option<User>, AppError> {
    let user_id = Uuid::new_v4().to_string();
    let now = Utc::now().timestamp_millis();
    let result = sqlx::query(
        r#"
        INSERT INTO users (id, email, password_hash, created_at)
        VALUES (?1, ?2, ?3, ?4);
        "#,
    )
    .bind(&user_id)
    .bind(email)
    .bind(password_hash)
    .bind(now)
    .execute(pool)
    .await;

    match result {
        Ok(_) => Ok(Some(User {
            id: user_id,
            email: email.to_string(),
            password_hash: password_hash.to_string(),
        })),
        Err(sqlx::Error::Database(err)) if err.is_unique_violation() => Ok(None),
        Err(err) => Err(AppError::Internal(format!("create user: {}", err))),
    }
}

pub async fn find_user_by_email(pool: &SqlitePool, email: &str) -> Result<Option<User>, AppError> {
    let row = sqlx::query(
        r#"
        SELECT id, email, password_hash
        FROM users
        WHERE email = ?1;
        "#,
    )
    .bind(email)
    .fetch_optional(pool)
    .await
    .map_err(|e| AppError::Internal(format!("query user: {}", e)))?;

    Ok(row.map(|row| user_from_row(&row)))
}

pub async fn get_user_by_id(pool: &SqlitePool, user_id: &str) -> Result<Option<User>, AppError> {
    let row = sqlx::query(
        r#"
        SELECT id, email, password_hash
        FROM users
        WHERE id = ?1;
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await
    .map_err(|e| AppError::Internal(format!("query user by id: {}", e)))?;

    Ok(row.map(|row| user_from_row(&row)))
}

pub async fn list_workouts(pool: &SqlitePool, scope: Scope<'_>) -> Result<Vec<Workout>, AppError> {
    let rows = sqlx::query(
        r#"
        SELECT id, title, reps, load, owner_id, created_at, updated_at
        FROM workouts
        WHERE ?1 IS NULL OR owner_id = ?1
        ORDER BY created_at DESC, rowid DESC;
        "#,
    )
    .bind(scope.owner())
    .fetch_all(pool)
    .await
    .map_err(|e| AppError::Internal(format!("list workouts: {}", e)))?;

    rows.iter().map(workout_from_row).collect()
}

pub async fn create_workout(
    pool: &SqlitePool,
    workout: &NewWorkout,
    owner_id: Option<&str>,
) -> Result<Workout, AppError> {
    let workout_id = Uuid::new_v4().to_string();
    let now = Utc::now().timestamp_millis();

    sqlx::query(
        r#"
        INSERT INTO workouts (id, title, reps, load, owner_id, created_at, updated_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6);
        "#,
    )
    .bind(&workout_id)
    .bind(&workout.title)
    .bind(workout.reps)
    .bind(workout.load)
    .bind(owner_id)
    .bind(now)
    .execute(pool)
    .await
    .map_err(|e| AppError::Internal(format!("create workout: {}", e)))?;

    let created_at = millis_to_datetime(now)?;
    Ok(Workout {
        id: workout_id,
        title: workout.title.clone(),
        reps: workout.reps,
        load: workout.load,
        owner: owner_id.map(str::to_string),
        created_at,
        updated_at: created_at,
    })
}

pub async fn get_workout(
    pool: &SqlitePool,
    workout_id: &str,
    scope: Scope<'_>,
) -> Result<Option<Workout>, AppError> {
    let row = sqlx::query(
        r#"
        SELECT id, title, reps, load, owner_id, created_at, updated_at
        FROM workouts
        WHERE id = ?1 AND (?2 IS NULL OR owner_id = ?2);
        "#,
    )
    .bind(workout_id)
    .bind(scope.owner())
    .fetch_optional(pool)
    .await
    .map_err(|e| AppError::Internal(format!("get workout: {}", e)))?;

    row.as_ref().map(workout_from_row).transpose()
}

/// Applies the supplied fields and returns the stored record, or `None` when
/// no workout with this id is visible in `scope`.
pub async fn update_workout(
    pool: &SqlitePool,
    workout_id: &str,
    patch: &WorkoutPatch,
    scope: Scope<'_>,
) -> Result<Option<Workout>, AppError> {
    let now = Utc::now().timestamp_millis();
    let result = sqlx::query(
        r#"
        UPDATE workouts
        SET title = COALESCE(?3, title),
            reps = COALESCE(?4, reps),
            load = COALESCE(?5, load),
            updated_at = ?6
        WHERE id = ?1 AND (?2 IS NULL OR owner_id = ?2);
        "#,
    )
    .bind(workout_id)
    .bind(scope.owner())
    .bind(patch.title.as_deref())
    .bind(patch.reps)
    .bind(patch.load)
    .bind(now)
    .execute(pool)
    .await
    .map_err(|e| AppError::Internal(format!("update workout: {}", e)))?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }
    get_workout(pool, workout_id, scope).await
}

/// Returns `false` when nothing visible in `scope` matched.
pub async fn delete_workout(
    pool: &SqlitePool,
    workout_id: &str,
    scope: Scope<'_>,
) -> Result<bool, AppError> {
    let result = sqlx::query(
        r#"
        DELETE FROM workouts
        WHERE id = ?1 AND (?2 IS NULL OR owner_id = ?2);
        "#,
    )
    .bind(workout_id)
    .bind(scope.owner())
    .execute(pool)
    .await
    .map_err(|e| AppError::Internal(format!("delete workout: {}", e)))?;

    Ok(result.rows_affected() > 0)
}

fn user_from_row(row: &SqliteRow) -> User {
    User {
        id: row.get::<String, _>("id"),
        email: row.get::<String, _>("email"),
        password_hash: row.get::<String, _>("password_hash"),
    }
}

fn workout_from_row(row: &SqliteRow) -> Result<Workout, AppError> {
    Ok(Workout {
        id: row.get::<String, _>("id"),
        title: row.get::<String, _>("title"),
        reps: row.get::<Option<i64>, _>("reps"),
        load: row.get::<Option<f64>, _>("load"),
        owner: row.get::<Option<String>, _>("owner_id"),
        created_at: millis_to_datetime(row.get::<i64, _>("created_at"))?,
        updated_at: millis_to_datetime(row.get::<i64, _>("updated_at"))?,
    })
}

fn millis_to_datetime(millis: i64) -> Result<DateTime<Utc>, AppError> {
    Utc.timestamp_millis_opt(millis)
        .single()
        .ok_or_else(|| AppError::Internal(format!("invalid timestamp: {}", millis)))
}
