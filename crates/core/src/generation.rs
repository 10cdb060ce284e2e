//! Fixed generation parameters and the canonical result contract.

use serde::Serialize;

use crate::storyboard::GenerationRequest;

/// Target clip length sent to the provider and echoed in metadata.
pub const VIDEO_DURATION: &str = "8s";

/// Output resolution requested from the provider.
pub const VIDEO_RESOLUTION: &str = "720p";

/// Output aspect ratio requested from the provider.
pub const VIDEO_ASPECT_RATIO: &str = "16:9";

/// Whether the provider should synthesize a soundtrack.
pub const GENERATE_AUDIO: bool = true;

/// Descriptive metadata returned alongside the video URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationMetadata {
    pub duration: &'static str,
    pub resolution: &'static str,
    pub aspect_ratio: &'static str,
    pub style: String,
    pub scenes_count: usize,
}

impl GenerationMetadata {
    pub fn for_request(request: &GenerationRequest) -> Self {
        Self {
            duration: VIDEO_DURATION,
            resolution: VIDEO_RESOLUTION,
            aspect_ratio: VIDEO_ASPECT_RATIO,
            style: request.style.clone(),
            scenes_count: request.scene_count(),
        }
    }
}

/// Successful response body: `{ videoUrl, prompt, metadata }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationResult {
    pub video_url: String,
    /// The compiled positive prompt, echoed back to the caller.
    pub prompt: String,
    pub metadata: GenerationMetadata,
}
