use std::sync::Arc;

use reelgen_provider::client::VideoProvider;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Video provider, or `None` when no credential is configured.
    pub provider: Option<Arc<dyn VideoProvider>>,
}
