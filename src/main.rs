use std::net::SocketAddr;

use tracing_subscriber::EnvFilter;
use workout_api::config::{ApiMode, Config, DEFAULT_JWT_SECRET};
use workout_api::db;
use workout_api::routes::build_router;
use workout_api::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = Config::from_env()?;
    if config.mode == ApiMode::Secured && config.jwt_secret == DEFAULT_JWT_SECRET {
        if cfg!(debug_assertions) {
            tracing::warn!(
                "WORKOUT_JWT_SECRET is using the default value; do not use this in production."
            );
        } else {
            return Err("WORKOUT_JWT_SECRET must be set for production".into());
        }
    }

    let pool = db::connect(&config.db_url, 5).await?;
    db::init_db(&pool).await?;

    let bind_addr: SocketAddr = config.bind.parse().map_err(|_| "invalid WORKOUT_BIND")?;
    let mode = config.mode;

    let app = build_router(AppState::new(pool, config));
    tracing::info!("workout api ({} mode) listening on {}", mode, bind_addr);
    axum::Server::bind(&bind_addr)
        .serve(app.into_make_service())
        .await?;

    Ok(())
}
