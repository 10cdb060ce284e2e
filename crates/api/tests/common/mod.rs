#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use reelgen_api::config::{LogFormat, ProviderSettings, ServerConfig};
use reelgen_api::router::build_app_router;
use reelgen_api::state::AppState;
use reelgen_provider::client::{ProviderError, VideoJob, VideoProvider};
use reelgen_provider::events::{ProgressSender, ProviderEvent};
use reelgen_provider::poll::PollConfig;

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses `http://localhost:5173` as CORS origin (matching the dev default),
/// a 30-second request timeout and a fake credential.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        max_body_bytes: 64 * 1024,
        environment: "test".to_string(),
        log_format: LogFormat::Pretty,
        provider: ProviderSettings {
            api_key: Some("test-key".to_string()),
            queue_url: "http://127.0.0.1:9".to_string(),
            model: "fal-ai/test-model".to_string(),
            poll: PollConfig::default(),
        },
    }
}

// ---------------------------------------------------------------------------
// Provider test double
// ---------------------------------------------------------------------------

/// What the recording provider answers with.
pub enum Canned {
    Result(Value),
    Failure(fn() -> ProviderError),
    /// Sleep for the given time before answering with an empty result.
    Stall(Duration),
}

/// A [`VideoProvider`] that records calls and returns a canned outcome.
pub struct RecordingProvider {
    canned: Canned,
    calls: AtomicUsize,
    last_job: Mutex<Option<VideoJob>>,
}

impl RecordingProvider {
    pub fn returning(result: Value) -> Arc<Self> {
        Arc::new(Self {
            canned: Canned::Result(result),
            calls: AtomicUsize::new(0),
            last_job: Mutex::new(None),
        })
    }

    pub fn failing(make_error: fn() -> ProviderError) -> Arc<Self> {
        Arc::new(Self {
            canned: Canned::Failure(make_error),
            calls: AtomicUsize::new(0),
            last_job: Mutex::new(None),
        })
    }

    pub fn stalling(delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            canned: Canned::Stall(delay),
            calls: AtomicUsize::new(0),
            last_job: Mutex::new(None),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_job(&self) -> Option<VideoJob> {
        self.last_job.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl VideoProvider for RecordingProvider {
    async fn subscribe(
        &self,
        job: &VideoJob,
        progress: ProgressSender,
    ) -> Result<Value, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_job.lock().unwrap() = Some(job.clone());

        let _ = progress.send(ProviderEvent::Submitted {
            request_id: "test-request".into(),
        });
        let _ = progress.send(ProviderEvent::InProgress {
            logs: vec!["rendering".into()],
        });

        match &self.canned {
            Canned::Result(value) => Ok(value.clone()),
            Canned::Failure(make_error) => Err(make_error()),
            Canned::Stall(delay) => {
                tokio::time::sleep(*delay).await;
                Ok(json!({}))
            }
        }
    }
}

// ---------------------------------------------------------------------------
// App builders
// ---------------------------------------------------------------------------

/// Build the full application router around the given provider.
///
/// Goes through `build_app_router` so tests exercise the same middleware
/// stack (CORS, request ID, timeout, tracing, panic recovery, body limit)
/// that production uses.
pub fn build_test_app(provider: Arc<RecordingProvider>) -> Router {
    build_test_app_with_config(provider, test_config())
}

/// Like [`build_test_app`] with a caller-supplied configuration.
pub fn build_test_app_with_config(provider: Arc<RecordingProvider>, config: ServerConfig) -> Router {
    let state = AppState {
        config: Arc::new(config.clone()),
        provider: Some(provider as Arc<dyn VideoProvider>),
    };
    build_app_router(state, &config)
}

/// Build the router with no provider credential configured.
pub fn build_unconfigured_app() -> Router {
    let mut config = test_config();
    config.provider.api_key = None;
    let state = AppState {
        config: Arc::new(config.clone()),
        provider: None,
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Request fixtures
// ---------------------------------------------------------------------------

/// A valid request: three moments (`Open`, `Pour`, `Close`), three images.
pub fn valid_request() -> Value {
    json!({
        "storyboard": {
            "moments": [
                {
                    "timing": "0-3s",
                    "title": "Open",
                    "description": "Hands lift the lid of a tea tin",
                    "cameraMovement": "slow push in"
                },
                {
                    "timing": "3-6s",
                    "title": "Pour",
                    "description": "Steaming water pours over loose leaves",
                    "cameraMovement": "top-down"
                },
                {
                    "timing": "6-8s",
                    "title": "Close",
                    "description": "The cup rests beside the tin at sunrise",
                    "cameraMovement": "pull back"
                }
            ],
            "audioStrategy": "ambient kettle sounds",
            "musicStyle": "soft acoustic guitar"
        },
        "images": [
            "data:image/png;base64,iVBORw0KGgo=",
            "https://cdn.example.com/tin.png",
            "https://cdn.example.com/cup.png"
        ],
        "productDescription": "herbal tea",
        "style": "cinematic"
    })
}

// ---------------------------------------------------------------------------
// HTTP helpers
// ---------------------------------------------------------------------------

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: &Value) -> Response<Body> {
    post_raw(app, uri, serde_json::to_vec(body).unwrap()).await
}

pub async fn post_raw(app: Router, uri: &str, body: Vec<u8>) -> Response<Body> {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
