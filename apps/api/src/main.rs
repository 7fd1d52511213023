//! Trackside API server binary.
//!
//! ## Startup Sequence
//! ```text
//! 1. Init tracing (RUST_LOG aware)
//! 2. Load configuration from environment
//! 3. Connect PostgreSQL pool + run migrations
//! 4. Spawn the outbox dispatcher
//! 5. Serve HTTP until SIGINT/SIGTERM, then drain and stop the dispatcher
//! ```

use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use trackside_api::auth::JwtVerifier;
use trackside_api::{api_router, ApiConfig, AppState, Dispatcher};
use trackside_db::{Database, DbConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    info!("Starting Trackside API server...");

    // Load configuration
    let config = ApiConfig::load()?;
    info!(
        port = config.http_port,
        db_url = %config.database_url.chars().take(30).collect::<String>(),
        "Configuration loaded"
    );

    // Connect to database (runs migrations unless disabled)
    let db = Database::connect(
        DbConfig::new(&config.database_url).max_connections(config.db_max_connections),
    )
    .await?;
    info!("Connected to PostgreSQL");

    // The outbox dispatcher delivers audit entries and notifications in the
    // background. It gets its own shutdown channel so the HTTP server can
    // finish draining requests before delivery stops.
    let (dispatcher_stop, stop_rx) = mpsc::channel::<()>(1);
    let dispatcher_handle = tokio::spawn(Dispatcher::new(db.clone(), &config).run(stop_rx));

    let state = AppState {
        db: db.clone(),
        verifier: JwtVerifier::new(&config.jwt_secret),
    };
    let app = api_router(state);

    let listener = TcpListener::bind(("0.0.0.0", config.http_port)).await?;
    info!(port = config.http_port, "Starting HTTP server");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    let _ = dispatcher_stop.send(()).await;
    if let Err(e) = dispatcher_handle.await {
        error!(?e, "Outbox dispatcher task panicked");
    }
    db.close().await;

    info!("Server shutdown complete");
    Ok(())
}

/// Initializes the tracing subscriber.
///
/// ## Filtering
/// - `RUST_LOG` env var, if set
/// - Default: info globally, debug for trackside crates, warn for sqlx
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("info,trackside_api=debug,trackside_db=debug,sqlx=warn")
    });

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown...");
}
