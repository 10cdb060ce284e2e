use std::time::Duration;

use reelgen_provider::client::{FalConfig, DEFAULT_MODEL, DEFAULT_QUEUE_URL};
use reelgen_provider::poll::PollConfig;

/// Name of the environment variable holding the provider credential.
pub const FAL_KEY_VAR: &str = "FAL_KEY";

/// Default inbound body limit: 4.5 MB.
pub const DEFAULT_MAX_BODY_BYTES: usize = 4_718_592;

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable lines.
    Pretty,
    /// One JSON object per event.
    Json,
}

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// Whole-request timeout in seconds (default: `300`). Generation
    /// usually takes about two minutes.
    pub request_timeout_secs: u64,
    /// Maximum inbound request body in bytes (default: 4.5 MB).
    pub max_body_bytes: usize,
    /// Deployment label included in request logs (default: `local`).
    pub environment: String,
    pub log_format: LogFormat,
    pub provider: ProviderSettings,
}

/// Settings for the external video provider.
#[derive(Debug, Clone)]
pub struct ProviderSettings {
    /// Credential from `FAL_KEY`; `None` when unset or blank.
    pub api_key: Option<String>,
    pub queue_url: String,
    pub model: String,
    pub poll: PollConfig,
}

impl ProviderSettings {
    /// Client settings, or `None` when no credential is configured.
    pub fn fal_config(&self) -> Option<FalConfig> {
        self.api_key.as_ref().map(|api_key| FalConfig {
            queue_url: self.queue_url.clone(),
            model: self.model.clone(),
            api_key: api_key.clone(),
            poll: self.poll.clone(),
        })
    }

    /// Length of the configured credential (0 when absent). Logged instead
    /// of the value itself.
    pub fn api_key_len(&self) -> usize {
        self.api_key.as_deref().map_or(0, str::len)
    }
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                              |
    /// |------------------------|--------------------------------------|
    /// | `HOST`                 | `0.0.0.0`                            |
    /// | `PORT`                 | `3000`                               |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`              |
    /// | `REQUEST_TIMEOUT_SECS` | `300`                                |
    /// | `MAX_BODY_BYTES`       | `4718592`                            |
    /// | `APP_ENV`              | `local`                              |
    /// | `LOG_FORMAT`           | `pretty` (`json` for JSON lines)     |
    /// | `FAL_KEY`              | unset                                |
    /// | `FAL_QUEUE_URL`        | `https://queue.fal.run`              |
    /// | `FAL_MODEL`            | `fal-ai/veo3.1/reference-to-video`   |
    /// | `FAL_POLL_INITIAL_MS`  | `1000`                               |
    /// | `FAL_POLL_MAX_MS`      | `5000`                               |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "300".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let max_body_bytes: usize = std::env::var("MAX_BODY_BYTES")
            .map(|v| v.parse().expect("MAX_BODY_BYTES must be a valid usize"))
            .unwrap_or(DEFAULT_MAX_BODY_BYTES);

        let environment = std::env::var("APP_ENV").unwrap_or_else(|_| "local".into());

        let log_format = match std::env::var("LOG_FORMAT").as_deref() {
            Ok("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        };

        let api_key = std::env::var(FAL_KEY_VAR)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());

        let queue_url = std::env::var("FAL_QUEUE_URL").unwrap_or_else(|_| DEFAULT_QUEUE_URL.into());
        let model = std::env::var("FAL_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.into());

        let poll_initial_ms: u64 = std::env::var("FAL_POLL_INITIAL_MS")
            .unwrap_or_else(|_| "1000".into())
            .parse()
            .expect("FAL_POLL_INITIAL_MS must be a valid u64");

        let poll_max_ms: u64 = std::env::var("FAL_POLL_MAX_MS")
            .unwrap_or_else(|_| "5000".into())
            .parse()
            .expect("FAL_POLL_MAX_MS must be a valid u64");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            max_body_bytes,
            environment,
            log_format,
            provider: ProviderSettings {
                api_key,
                queue_url,
                model,
                poll: PollConfig {
                    initial_delay: Duration::from_millis(poll_initial_ms),
                    max_delay: Duration::from_millis(poll_max_ms),
                    ..PollConfig::default()
                },
            },
        }
    }
}
