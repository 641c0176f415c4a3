//! Academy back office server.
//!
//! Main entry point that wires all crates together and starts the server.

use std::sync::Arc;

use tracing_subscriber::{EnvFilter, fmt};

use academy_api::{AppState, build_app};
use academy_core::config::{AppConfig, DatabaseProvider};
use academy_core::error::AppError;
use academy_core::{Clock, SystemClock};
use academy_database::{DatabasePool, MemoryDatabase, Repositories, migration};
use academy_worker::CronScheduler;

const DEFAULT_JWT_SECRET: &str = "CHANGE_ME_IN_PRODUCTION";

#[tokio::main]
async fn main() {
    let env = std::env::var("ACADEMY_ENV").unwrap_or_else(|_| "development".to_string());
    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);
    tracing::info!(env = %env, "Configuration loaded");

    if let Err(e) = run(config).await {
        tracing::error!(error = %e, "Server error");
        std::process::exit(1);
    }
}

/// `RUST_LOG` overrides `logging.level`.
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting Academy back office v{}", env!("CARGO_PKG_VERSION"));

    if config.auth.jwt_secret == DEFAULT_JWT_SECRET {
        tracing::warn!("auth.jwt_secret is the built-in default; set ACADEMY__AUTH__JWT_SECRET");
    }

    // ── Step 1: Backing store ────────────────────────────────────
    let (repos, pool) = match config.database.provider {
        DatabaseProvider::Postgres => {
            let pool = DatabasePool::connect(&config.database).await?;
            tracing::info!("Running database migrations...");
            migration::run_migrations(pool.pool()).await?;
            (Repositories::postgres(pool.pool().clone()), Some(pool))
        }
        DatabaseProvider::Memory => {
            tracing::warn!("Using in-memory store; data is lost on exit and not shared");
            (Repositories::memory(MemoryDatabase::new()), None)
        }
    };

    // ── Step 2: Auth, services, job lock ─────────────────────────
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let state = AppState::build(config.clone(), &repos, clock)?;

    // ── Step 3: Scheduled jobs ───────────────────────────────────
    let scheduler = if config.worker.enabled {
        let scheduler = CronScheduler::new(Arc::new(state.job_executor())).await?;
        scheduler.register_default_tasks(&config.worker).await?;
        scheduler.start().await?;
        Some(scheduler)
    } else {
        tracing::info!("Scheduled jobs disabled");
        None
    };

    // ── Step 4: HTTP server ──────────────────────────────────────
    let app = build_app(state);
    let addr = config.server.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!(addr = %addr, "Academy server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    // ── Step 5: Drain ────────────────────────────────────────────
    if let Some(scheduler) = scheduler {
        scheduler.shutdown().await?;
    }
    if let Some(pool) = pool {
        pool.close().await;
    }

    tracing::info!("Academy server shut down gracefully");
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown...");
}
