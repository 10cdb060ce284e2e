use std::net::SocketAddr;
use std::sync::Arc;

use reelgen_provider::client::{FalClient, VideoProvider};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use reelgen_api::config::{LogFormat, ServerConfig};
use reelgen_api::router::build_app_router;
use reelgen_api::state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Configuration ---
    let config = ServerConfig::from_env();

    // --- Tracing ---
    init_tracing(config.log_format);
    tracing::info!(
        host = %config.host,
        port = %config.port,
        environment = %config.environment,
        max_body_bytes = config.max_body_bytes,
        request_timeout_secs = config.request_timeout_secs,
        "Loaded server configuration",
    );

    // --- Provider ---
    let provider: Option<Arc<dyn VideoProvider>> = match config.provider.fal_config() {
        Some(fal) => {
            let client = FalClient::new(fal);
            tracing::info!(
                model = %client.model(),
                queue_url = %config.provider.queue_url,
                api_key_len = config.provider.api_key_len(),
                "Video provider configured",
            );
            Some(Arc::new(client) as Arc<dyn VideoProvider>)
        }
        None => {
            tracing::warn!("FAL_KEY is not set; generation requests will fail until it is configured");
            None
        }
    };

    // --- App state ---
    let state = AppState {
        config: Arc::new(config.clone()),
        provider,
    };

    // --- Router ---
    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    tracing::info!("Graceful shutdown complete");
}

fn init_tracing(format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        "reelgen_api=debug,reelgen_provider=debug,tower_http=debug".into()
    });

    match format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init(),
    }
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix) so the server
/// shuts down cleanly whether stopped interactively or by a process
/// manager. In-flight generations are dropped with their connections.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
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
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
