//! Subscribe-style job execution against the provider.
//!
//! [`VideoProvider::subscribe`] submits one job and resolves only when the
//! job reaches a terminal state. Progress is reported on a separate
//! [`ProgressSender`] channel; dropped receivers are ignored.

use reelgen_core::generation::{GENERATE_AUDIO, VIDEO_ASPECT_RATIO, VIDEO_DURATION, VIDEO_RESOLUTION};
use reelgen_core::prompt::CompiledPrompt;
use reelgen_core::storyboard::ImageSet;
use serde::Serialize;

use crate::api::{FalApiError, FalQueueApi};
use crate::events::{ProgressSender, ProviderEvent};
use crate::messages::{parse_status, QueueStatus};
use crate::poll::{next_delay, PollConfig};

/// Default queue endpoint.
pub const DEFAULT_QUEUE_URL: &str = "https://queue.fal.run";

/// Default model: reference-image-to-video.
pub const DEFAULT_MODEL: &str = "fal-ai/veo3.1/reference-to-video";

/// Provider input for one generation job.
///
/// Serializes to `{ image_urls, prompt, negative_prompt, duration,
/// resolution, aspect_ratio, generate_audio }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VideoJob {
    pub image_urls: Vec<String>,
    pub prompt: String,
    pub negative_prompt: String,
    pub duration: &'static str,
    pub resolution: &'static str,
    pub aspect_ratio: &'static str,
    pub generate_audio: bool,
}

impl VideoJob {
    /// Build a job with the fixed generation parameters.
    pub fn new(images: &ImageSet, prompt: &CompiledPrompt) -> Self {
        Self {
            image_urls: images.to_urls(),
            prompt: prompt.positive.clone(),
            negative_prompt: prompt.negative.clone(),
            duration: VIDEO_DURATION,
            resolution: VIDEO_RESOLUTION,
            aspect_ratio: VIDEO_ASPECT_RATIO,
            generate_audio: GENERATE_AUDIO,
        }
    }
}

/// Errors that end a subscription.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// Submission, polling or result retrieval failed.
    #[error(transparent)]
    Api(#[from] FalApiError),

    /// The provider finished the job but reported a failure.
    #[error("Video generation failed: {0}")]
    Failed(String),
}

impl ProviderError {
    /// Short stable name of the failure kind, safe to show to callers.
    pub fn kind(&self) -> &'static str {
        match self {
            ProviderError::Api(FalApiError::Request(_)) => "TransportError",
            ProviderError::Api(FalApiError::ApiError { .. }) => "ProviderApiError",
            ProviderError::Failed(_) => "GenerationFailed",
        }
    }
}

/// An asynchronous video-synthesis backend.
#[async_trait::async_trait]
pub trait VideoProvider: Send + Sync {
    /// Submit `job` and wait for its terminal result.
    ///
    /// Returns the provider's raw result payload on success. Progress
    /// events go to `progress`; send failures are ignored.
    async fn subscribe(
        &self,
        job: &VideoJob,
        progress: ProgressSender,
    ) -> Result<serde_json::Value, ProviderError>;
}

/// Connection settings for [`FalClient`].
#[derive(Debug, Clone)]
pub struct FalConfig {
    pub queue_url: String,
    pub model: String,
    pub api_key: String,
    pub poll: PollConfig,
}

/// [`VideoProvider`] backed by the fal queue API.
pub struct FalClient {
    api: FalQueueApi,
    model: String,
    poll: PollConfig,
}

impl FalClient {
    pub fn new(config: FalConfig) -> Self {
        Self {
            api: FalQueueApi::new(config.queue_url, config.api_key),
            model: config.model,
            poll: config.poll,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait::async_trait]
impl VideoProvider for FalClient {
    async fn subscribe(
        &self,
        job: &VideoJob,
        progress: ProgressSender,
    ) -> Result<serde_json::Value, ProviderError> {
        let submitted = self.api.submit(&self.model, job).await?;
        let request_id = submitted.request_id;

        tracing::info!(
            model = %self.model,
            provider_request_id = %request_id,
            "Job submitted to provider",
        );
        let _ = progress.send(ProviderEvent::Submitted {
            request_id: request_id.clone(),
        });

        let status_url = submitted
            .status_url
            .unwrap_or_else(|| self.api.status_url(&self.model, &request_id));
        let response_url = submitted
            .response_url
            .unwrap_or_else(|| self.api.response_url(&self.model, &request_id));

        let mut delay = self.poll.initial_delay;
        let mut forwarded_logs = 0usize;

        loop {
            let raw = self.api.status(&status_url).await?;

            match parse_status(&raw) {
                Ok(QueueStatus::InQueue { queue_position }) => {
                    let _ = progress.send(ProviderEvent::Queued {
                        position: queue_position,
                    });
                }
                Ok(QueueStatus::InProgress { logs }) => {
                    // Status documents repeat every log line seen so far.
                    if logs.len() < forwarded_logs {
                        forwarded_logs = 0;
                    }
                    let fresh = logs[forwarded_logs..]
                        .iter()
                        .filter(|entry| !entry.message.is_empty())
                        .map(|entry| entry.message.clone())
                        .collect();
                    forwarded_logs = logs.len();
                    let _ = progress.send(ProviderEvent::InProgress { logs: fresh });
                }
                Ok(QueueStatus::Completed { error: Some(error), .. }) => {
                    tracing::warn!(
                        provider_request_id = %request_id,
                        error = %error,
                        "Provider reported job failure",
                    );
                    return Err(ProviderError::Failed(error));
                }
                Ok(QueueStatus::Completed { error: None, .. }) => break,
                Err(e) => {
                    tracing::warn!(
                        provider_request_id = %request_id,
                        error = %e,
                        raw_status = %raw,
                        "Unrecognized provider status",
                    );
                }
            }

            tokio::time::sleep(delay).await;
            delay = next_delay(delay, &self.poll);
        }

        let result = self.api.result(&response_url).await?;
        tracing::info!(provider_request_id = %request_id, "Provider job completed");

        Ok(result)
    }
}
