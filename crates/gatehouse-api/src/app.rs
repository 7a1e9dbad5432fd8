//! Application assembly: state construction, background workers, and
//! the HTTP server lifecycle.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::watch;

use gatehouse_auth::client::NoGeoResolver;
use gatehouse_auth::{
    AuthResolver, ClientInfoExtractor, FingerprintCache, SessionCleanup, SessionStore,
    TokenService,
};
use gatehouse_core::config::AppConfig;
use gatehouse_core::error::AppError;
use gatehouse_database::{DatabasePool, Repositories, password, schema};

use crate::middleware::traffic::{MetricRecorder, MetricRetention, TrafficStats};
use crate::router::build_router;
use crate::state::AppState;

/// Wire repositories and config into the shared application state.
///
/// Every service is constructed exactly once here and shared through
/// `AppState`; nothing auth-related lives in process globals.
pub fn build_state(config: AppConfig, repos: Repositories) -> AppState {
    let config = Arc::new(config);

    let session_store = Arc::new(SessionStore::new(
        repos.sessions.clone(),
        config.session.clone(),
    ));
    let token_service = Arc::new(TokenService::new(repos.tokens.clone(), repos.users.clone()));
    let auth_resolver = Arc::new(AuthResolver::new(
        session_store.clone(),
        token_service.clone(),
    ));

    let fingerprint_cache = Arc::new(FingerprintCache::new(&config.cache));
    let client_extractor = Arc::new(ClientInfoExtractor::new(
        fingerprint_cache.clone(),
        Arc::new(NoGeoResolver),
    ));

    let traffic_stats = Arc::new(TrafficStats::new());
    let metric_recorder = MetricRecorder::new(repos.metrics.clone(), traffic_stats.clone());

    AppState {
        config,
        started: Instant::now(),
        repos,
        session_store,
        token_service,
        auth_resolver,
        client_extractor,
        fingerprint_cache,
        traffic_stats,
        metric_recorder,
    }
}

/// Build the complete application router from shared state.
pub fn build_app(state: AppState) -> axum::Router {
    build_router(state)
}

/// Run the Gatehouse server until shutdown.
pub async fn run_server(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting Gatehouse server...");

    // ── Step 1: Initialize repositories ──────────────────────────
    let repos = match config.database.backend.as_str() {
        "memory" => {
            tracing::info!("Using in-memory repositories");
            Repositories::memory()
        }
        _ => {
            tracing::info!("Connecting to PostgreSQL...");
            let pool = DatabasePool::connect(&config.database).await?;
            schema::apply(pool.pool()).await?;
            Repositories::postgres(pool.pool().clone())
        }
    };

    // ── Step 2: Bootstrap admin account ──────────────────────────
    bootstrap_admin(&config, &repos).await?;

    // ── Step 3: Build application state ──────────────────────────
    let state = build_state(config.clone(), repos.clone());

    // ── Step 4: Shutdown channel & workers ───────────────────────
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let cleanup = SessionCleanup::new(
        repos.sessions.clone(),
        Duration::from_secs(config.session.cleanup_interval_minutes * 60),
    );
    tokio::spawn(cleanup.run(shutdown_rx.clone()));

    if config.metrics.enabled {
        let retention = MetricRetention::new(repos.metrics.clone(), config.metrics.retention_days);
        tokio::spawn(retention.run(shutdown_rx.clone()));
    }

    // ── Step 5: Build and start HTTP server ──────────────────────
    let app = build_app(state);
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {}: {}", addr, e)))?;

    tracing::info!("Gatehouse server listening on {}", addr);

    let server = axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(async move {
        shutdown_signal().await;
        let _ = shutdown_tx.send(true);
    });

    server
        .await
        .map_err(|e| AppError::internal(format!("Server error: {}", e)))?;

    Ok(())
}

/// Ensure the configured bootstrap admin exists. A no-op unless both
/// username and password are configured.
async fn bootstrap_admin(config: &AppConfig, repos: &Repositories) -> Result<(), AppError> {
    let (Some(username), Some(pass)) = (
        &config.auth.bootstrap_admin_username,
        &config.auth.bootstrap_admin_password,
    ) else {
        return Ok(());
    };

    let email = config
        .auth
        .bootstrap_admin_email
        .clone()
        .unwrap_or_else(|| format!("{}@localhost", username));

    let user = gatehouse_entity::user::User {
        id: uuid::Uuid::new_v4(),
        username: username.clone(),
        email,
        password_hash: password::hash_password(pass)?,
        is_admin: true,
        is_active: true,
        created_at: chrono::Utc::now(),
    };

    repos.users.ensure_user(&user).await?;
    tracing::info!(username = %username, "Bootstrap admin ensured");

    Ok(())
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
}
