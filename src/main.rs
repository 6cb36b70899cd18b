use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tido::api::{build_router, AppState};
use tido::config::Config;
use tido::db::repositories::{SqlxSessionRepository, SqlxTodoRepository, SqlxUserRepository};
use tido::db::{create_pool, migrations};
use tido::services::{AuthService, SessionService, TodoService};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tido=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load(Path::new("config.yml")).context("Failed to load configuration")?;
    tracing::info!(
        "Starting server on {}:{}",
        config.server.host,
        config.server.port
    );

    let pool = create_pool(&config.database)
        .await
        .context("Failed to create database pool")?;
    migrations::run_migrations(&pool)
        .await
        .context("Failed to run migrations")?;

    let sessions = SessionService::with_ttl_hours(
        SqlxSessionRepository::boxed(pool.clone()),
        config.session.ttl_hours,
    );
    let auth_service = Arc::new(AuthService::new(
        SqlxUserRepository::boxed(pool.clone()),
        sessions,
    ));
    let todo_service = Arc::new(TodoService::new(SqlxTodoRepository::boxed(pool.clone())));

    spawn_session_sweeper(auth_service.clone(), config.session.sweep_interval_secs);

    let state = AppState {
        auth_service,
        todo_service,
    };
    let app = build_router(state, &config.server.cors_origin);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    tracing::info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Shutting down");
    pool.close().await;
    Ok(())
}

/// Periodically delete expired sessions.
///
/// Expired tokens are already rejected at validation time; the sweep keeps
/// the sessions table from accumulating dead rows.
fn spawn_session_sweeper(auth_service: Arc<AuthService>, interval_secs: u64) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(interval_secs));
        // The first tick fires immediately and cleans up anything left over
        // from the previous run.
        loop {
            interval.tick().await;
            match auth_service.sessions().sweep_expired().await {
                Ok(0) => {}
                Ok(count) => tracing::info!("Swept {} expired sessions", count),
                Err(e) => tracing::warn!("Session sweep failed: {:#}", e),
            }
        }
    });
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
