//! Matchday application composition root
//!
//! Chooses the league store and composes the league router with shared
//! infrastructure routes.

use std::sync::Arc;

use axum::Router;
use matchday_auth::{AuthBackend, AuthConfig};
use matchday_common::config::Config;
use matchday_league::{LeagueState, LeagueStore, MemoryLeagueStore, PgLeagueStore};
use sqlx::postgres::PgPoolOptions;

/// Open the configured store.
///
/// With a database URL this connects to Postgres and applies pending
/// migrations; without one the league lives in memory for the process.
pub async fn connect_store(config: &Config) -> Result<Arc<dyn LeagueStore>, anyhow::Error> {
    let Some(database_url) = config.database_url.as_deref() else {
        tracing::warn!("DATABASE_URL not set, using the in-memory league store");
        return Ok(Arc::new(MemoryLeagueStore::new()));
    };

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await
        .map_err(|e| anyhow::anyhow!("Database connection failed: {}", e))?;
    tracing::info!("Database connection established");

    sqlx::migrate!("../../migrations").run(&pool).await?;
    tracing::info!("Database migrations applied");

    Ok(Arc::new(PgLeagueStore::new(pool)))
}

/// Create the main application router with all routes
pub fn create_app(config: &Config, store: Arc<dyn LeagueStore>) -> Router {
    let auth = AuthBackend::new(AuthConfig {
        jwt_secret: config.jwt_secret.clone(),
        issuer: config.jwt_issuer.clone(),
        audience: config.jwt_audience.clone(),
        admin_role: config.admin_role.clone(),
    });

    Router::new()
        .route("/health", axum::routing::get(health_check))
        .merge(matchday_league::routes().with_state(LeagueState::new(store, auth)))
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
