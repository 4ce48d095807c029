//! BetterQR server.
//!
//! Main entry point that wires all crates together and starts the server.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, fmt};

use betterqr_api::{AppState, build_app, serve};
use betterqr_auth::{
    CaptchaVerifier, LoginService, PgSessionStore, RecaptchaVerifier, RetentionSweeper,
    SessionManager, SessionStore,
};
use betterqr_core::config::AppConfig;
use betterqr_core::config::logging::LoggingConfig;
use betterqr_core::error::AppError;
use betterqr_core::logging::{MAIN, channel_directives};
use betterqr_database::DatabasePool;
use betterqr_database::migration::run_migrations;

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

    let env = std::env::var("BETTERQR_ENV").unwrap_or_else(|_| "development".to_string());
    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = init_logging(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        std::process::exit(1);
    }

    tracing::info!(target: MAIN, env = %env, "Configuration loaded");

    if let Err(e) = run(config).await {
        tracing::error!(target: MAIN, error = %e, "Server error");
        std::process::exit(1);
    }
}

/// Console output plus an optional append-only log file shared by every channel.
fn init_logging(config: &LoggingConfig) -> Result<(), AppError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(channel_directives(&config.level)));

    let console = match config.format.as_str() {
        "json" => fmt::layer()
            .json()
            .with_target(true)
            .with_thread_ids(true)
            .boxed(),
        _ => fmt::layer().pretty().with_target(true).boxed(),
    };

    let file = match &config.file {
        Some(path) => {
            if let Some(dir) = Path::new(path).parent().filter(|d| !d.as_os_str().is_empty()) {
                std::fs::create_dir_all(dir)?;
            }
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            Some(
                fmt::layer()
                    .with_ansi(false)
                    .with_target(true)
                    .with_writer(Mutex::new(file)),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(file)
        .try_init()
        .map_err(|e| AppError::configuration(format!("Failed to install subscriber: {e}")))
}

/// Main server run function.
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!(target: MAIN, "Starting BetterQR v{}", env!("CARGO_PKG_VERSION"));

    // ── Database: connect, ping, migrate ─────────────────────────
    let db = DatabasePool::connect(&config.database).await?;
    run_migrations(db.pool()).await?;

    // ── Session lifecycle ────────────────────────────────────────
    let store: Arc<dyn SessionStore> = Arc::new(PgSessionStore::new(db.pool().clone()));
    store.ensure_retention_index().await?;
    let session_manager = SessionManager::new(Arc::clone(&store), &config.session);
    let captcha: Arc<dyn CaptchaVerifier> =
        Arc::new(RecaptchaVerifier::new(&config.auth.captcha)?);
    let login_service = LoginService::new(session_manager.clone(), captcha);

    // ── Background retention sweep ───────────────────────────────
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let sweeper = RetentionSweeper::new(Arc::clone(&store), &config.session);
    let sweeper_handle = tokio::spawn(async move { sweeper.run(shutdown_rx).await });

    // ── HTTP server ──────────────────────────────────────────────
    let bind_address = config.server.bind_address();
    let grace = Duration::from_secs(config.server.shutdown_grace_seconds);
    let state = AppState::new(config, session_manager, login_service)?;
    let listener = TcpListener::bind(&bind_address).await?;

    let signal_tx = shutdown_tx.clone();
    serve(listener, build_app(state), async move {
        shutdown_signal().await;
        tracing::info!(target: MAIN, "Shutdown signal received");
        let _ = signal_tx.send(true);
    })
    .await?;

    // ── Drain ────────────────────────────────────────────────────
    let _ = shutdown_tx.send(true);
    if tokio::time::timeout(grace, sweeper_handle).await.is_err() {
        tracing::warn!(target: MAIN, "Retention sweeper did not stop within the grace period");
    }
    db.close().await;

    tracing::info!(target: MAIN, "BetterQR stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
