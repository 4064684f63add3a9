use std::env;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

pub const DEFAULT_JWT_SECRET: &str = "dev-secret-change-me";
const DEFAULT_TOKEN_TTL_SECS: i64 = 60 * 60 * 24 * 3;
const MAX_TOKEN_TTL_SECS: i64 = 60 * 60 * 24 * 365 * 10;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("WORKOUT_API_MODE must be `open` or `secured`, got `{0}`")]
    InvalidMode(String),
    #[error("WORKOUT_TOKEN_TTL_SECS must be between 1 and 315360000 seconds (ten years), got `{0}`")]
    InvalidTokenTtl(String),
    #[error("{name} must be a positive integer of at least {min}, got `{value}`")]
    InvalidPasswordCost {
        name: &'static str,
        min: u32,
        value: String,
    },
}

/// Which iteration of the API the server exposes.
///
/// `Open` serves workouts without any authentication. `Secured` mounts the
/// user routes and scopes every workout operation to the bearer of a token.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ApiMode {
    Open,
    Secured,
}

impl FromStr for ApiMode {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "open" | "v1" => Ok(ApiMode::Open),
            "secured" | "v2" => Ok(ApiMode::Secured),
            _ => Err(ConfigError::InvalidMode(value.to_string())),
        }
    }
}

impl fmt::Display for ApiMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiMode::Open => f.write_str("open"),
            ApiMode::Secured => f.write_str("secured"),
        }
    }
}

/// Argon2id cost used when hashing new passwords. Existing hashes carry
/// their own parameters, so changing these never invalidates stored users.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PasswordCost {
    pub memory_kib: u32,
    pub iterations: u32,
}

impl PasswordCost {
    pub const MIN_MEMORY_KIB: u32 = 8;
    pub const MIN_ITERATIONS: u32 = 1;

    pub const fn minimal() -> Self {
        Self {
            memory_kib: Self::MIN_MEMORY_KIB,
            iterations: Self::MIN_ITERATIONS,
        }
    }
}

impl Default for PasswordCost {
    fn default() -> Self {
        Self {
            memory_kib: 19 * 1024,
            iterations: 2,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub bind: String,
    pub db_url: String,
    pub jwt_secret: String,
    pub mode: ApiMode,
    pub token_ttl_secs: i64,
    pub password_cost: PasswordCost,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let bind = env::var("WORKOUT_BIND").unwrap_or_else(|_| "127.0.0.1:4000".to_string());
        let db_url = env::var("WORKOUT_DB_URL")
            .unwrap_or_else(|_| "sqlite://data/workouts.db".to_string());
        let jwt_secret = secret_or_default(env::var("WORKOUT_JWT_SECRET").ok());
        let mode = match env::var("WORKOUT_API_MODE") {
            Ok(value) => value.parse()?,
            Err(_) => ApiMode::Secured,
        };
        let token_ttl_secs = match env::var("WORKOUT_TOKEN_TTL_SECS") {
            Ok(value) => parse_ttl(&value)?,
            Err(_) => DEFAULT_TOKEN_TTL_SECS,
        };
        let defaults = PasswordCost::default();
        let password_cost = PasswordCost {
            memory_kib: env_cost(
                "WORKOUT_ARGON2_MEMORY_KIB",
                PasswordCost::MIN_MEMORY_KIB,
                defaults.memory_kib,
            )?,
            iterations: env_cost(
                "WORKOUT_ARGON2_ITERATIONS",
                PasswordCost::MIN_ITERATIONS,
                defaults.iterations,
            )?,
        };

        Ok(Self {
            bind,
            db_url,
            jwt_secret,
            mode,
            token_ttl_secs,
            password_cost,
        })
    }

    /// Configuration for an in-process server, e.g. in tests. Passwords are
    /// hashed at the cheapest argon2 cost.
    pub fn with_mode(mode: ApiMode, jwt_secret: impl Into<String>) -> Self {
        Self {
            bind: "127.0.0.1:0".to_string(),
            db_url: "sqlite::memory:".to_string(),
            jwt_secret: jwt_secret.into(),
            mode,
            token_ttl_secs: DEFAULT_TOKEN_TTL_SECS,
            password_cost: PasswordCost::minimal(),
        }
    }
}

/// A blank secret counts as unset, so it falls back to the default and trips
/// the startup guard instead of signing tokens with an empty key.
fn secret_or_default(value: Option<String>) -> String {
    value
        .filter(|secret| !secret.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_JWT_SECRET.to_string())
}

fn parse_ttl(value: &str) -> Result<i64, ConfigError> {
    match value.trim().parse::<i64>() {
        Ok(secs) if (1..=MAX_TOKEN_TTL_SECS).contains(&secs) => Ok(secs),
        _ => Err(ConfigError::InvalidTokenTtl(value.to_string())),
    }
}

fn env_cost(name: &'static str, min: u32, default: u32) -> Result<u32, ConfigError> {
    match env::var(name) {
        Ok(value) => parse_cost(name, min, &value),
        Err(_) => Ok(default),
    }
}

fn parse_cost(name: &'static str, min: u32, value: &str) -> Result<u32, ConfigError> {
    match value.trim().parse::<u32>() {
        Ok(cost) if cost >= min => Ok(cost),
        _ => Err(ConfigError::InvalidPasswordCost {
            name,
            min,
            value: value.to_string(),
        }),
    }
}
