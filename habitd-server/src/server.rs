//! Main server module - Axum setup and router configuration
//!
//! Starts an HTTP server with owner-scoped habit routes.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    routing::{get, post, put},
    Router,
};
use clap::Parser;
use tokio::net::TcpListener;
use tokio::signal;
use tokio::sync::RwLock;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::{info, warn};

use crate::db::Database;
use crate::routes::{self, health::ServerState};

/// Server command-line arguments
#[derive(Parser, Debug, Clone)]
#[command(name = "habitd", version, about = "Habit tracking REST backend")]
pub struct ServerArgs {
    /// Port to listen on
    #[arg(short, long, default_value = "3030")]
    pub port: u16,

    /// Bind address
    #[arg(short, long, default_value = "127.0.0.1")]
    pub bind: String,

    /// Database file path (default: ~/.habitd/habits.db)
    #[arg(long, env = "HABITD_DB")]
    pub db_path: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(long, default_value = "30")]
    pub timeout: u64,
}

impl Default for ServerArgs {
    fn default() -> Self {
        Self {
            port: 3030,
            bind: "127.0.0.1".to_string(),
            db_path: None,
            timeout: 30,
        }
    }
}

/// Run the server with the given arguments
pub async fn run_server(args: ServerArgs) -> anyhow::Result<()> {
    // Determine database path
    let db_path = args.db_path.unwrap_or_else(|| {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".habitd")
            .join("habits.db")
    });

    info!("Opening database at {}", db_path.display());
    let db = Database::open(&db_path)?;

    // Create shared state
    let state = Arc::new(RwLock::new(ServerState::new(db.clone())));

    // Build router
    let app = create_router(db, state, args.timeout);

    // Bind address
    let addr: SocketAddr = format!("{}:{}", args.bind, args.port).parse()?;

    info!("Starting habitd on http://{}", addr);
    info!("Database: {}", db_path.display());

    // Create listener
    let listener = TcpListener::bind(addr).await?;

    // Run with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Create the Axum router with all routes
pub fn create_router(
    db: Database,
    state: Arc<RwLock<ServerState>>,
    timeout_secs: u64,
) -> Router {
    // CORS layer: the API is consumed by browser frontends on any origin
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Middleware stack
    let middleware = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(timeout_secs)))
        .layer(cors);

    // Build routes
    Router::new()
        // Health
        .route("/health", get(routes::health_check))
        // Habits
        .route("/habits", get(routes::list_habits).post(routes::create_habit))
        .route(
            "/habits/{id}",
            put(routes::update_habit).delete(routes::delete_habit),
        )
        .route("/habits/{id}/done", post(routes::mark_done))
        // State
        .with_state(db)
        // Health needs full state for uptime
        .layer(axum::Extension(state))
        .layer(middleware)
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            warn!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            warn!("Received SIGTERM, initiating graceful shutdown...");
        }
    }
}
