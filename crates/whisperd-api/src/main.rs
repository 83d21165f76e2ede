//! Main entry point for the `whisperd` API server

use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use whisperd_api::build_router;
use whisperd_core::{Config, context_error, context_error::Result, init_logging};
use whisperd_engine::{SttEngine, WhisperEngine};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (for development convenience)
    if let Err(e) = dotenvy::dotenv() {
        // It's okay if .env doesn't exist, just log it
        eprintln!("Note: .env file not loaded: {e}");
    }

    // Load configuration
    let config = Config::load().unwrap_or_else(|err| {
        eprintln!("Failed to load config ({err}), using defaults");
        Config::default()
    });

    // Initialize logging
    init_logging(&config.logging)?;

    info!("╔══════════════════════════════════════════════════════════╗");
    info!(
        "║           whisperd transcription server v{}           ║",
        env!("CARGO_PKG_VERSION")
    );
    info!("╚══════════════════════════════════════════════════════════╝");

    // Load the model once; it is shared read-only by all requests
    info!(
        "🧠 Loading model from {}...",
        config.engine.model_path.display()
    );
    let engine = match WhisperEngine::load(&config.engine) {
        Ok(engine) => {
            info!("✅ Model loaded: {}", engine.identity());
            Arc::new(engine) as Arc<dyn SttEngine>
        }
        Err(e) => {
            error!("Failed to load model: {}", e);
            return Err(context_error!("Model load failed: {}", e));
        }
    };

    // Build the application router
    info!("🛠️  Building application routes...");
    let app = build_router(config.clone(), engine)?
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()));

    // Create server address
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .map_err(|e| context_error!("Invalid server address: {}", e))?;

    // Create TCP listener
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| context_error!("Failed to bind to {}: {}", addr, e))?;

    info!("╔══════════════════════════════════════════════════════════╗");
    info!("║                     SERVER READY                         ║");
    info!("╟──────────────────────────────────────────────────────────╢");
    info!("║ 🎙️  Upload:  POST http://{:12}/audio/transcriptions", addr);
    info!("║ 💚 Health:  http://{:12}/health", addr);
    info!("╚══════════════════════════════════════════════════════════╝\n");

    // Start the server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| context_error!("Server error: {}", e))?;

    info!("👋 Server shutdown complete");
    Ok(())
}

/// Handle graceful shutdown signals
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
        () = ctrl_c => {
            info!("Received Ctrl+C, shutting down gracefully...");
        },
        () = terminate => {
            info!("Received terminate signal, shutting down gracefully...");
        },
    }
}
