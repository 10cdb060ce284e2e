//! Storyboard domain types.
//!
//! A [`GenerationRequest`] is built once per inbound call by
//! [`crate::validation::validate_request`] and never mutated afterwards.

use serde::{Deserialize, Deserializer, Serialize};

/// Number of reference images every request must carry.
pub const REQUIRED_IMAGE_COUNT: usize = 3;

/// Prefix identifying an embedded (binary-as-text) image.
pub const DATA_URL_PREFIX: &str = "data:";

// ---------------------------------------------------------------------------
// Storyboard
// ---------------------------------------------------------------------------

/// One scene of the storyboard.
///
/// Missing or `null` text fields deserialize as empty strings; the prompt
/// compiler renders whatever it is given.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Moment {
    /// Time span within the video, e.g. `"0-2s"`.
    #[serde(deserialize_with = "null_as_default")]
    pub timing: String,
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(deserialize_with = "null_as_default")]
    pub camera_movement: String,
}

/// Ordered scene list plus the audio direction for the whole video.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Storyboard {
    #[serde(deserialize_with = "null_as_default")]
    pub moments: Vec<Moment>,
    #[serde(deserialize_with = "null_as_default")]
    pub audio_strategy: String,
    #[serde(deserialize_with = "null_as_default")]
    pub music_style: String,
}

/// Treat an explicit JSON `null` like an absent field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// ---------------------------------------------------------------------------
// Images
// ---------------------------------------------------------------------------

/// How a reference image is transported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    /// Inline `data:` URL carrying the encoded bytes.
    Embedded,
    /// Remote address the provider fetches itself.
    Remote,
}

impl ImageKind {
    /// Classify a raw image reference.
    pub fn of(image: &str) -> Self {
        if image.starts_with(DATA_URL_PREFIX) {
            ImageKind::Embedded
        } else {
            ImageKind::Remote
        }
    }
}

/// A single reference image, passed to the provider verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageRef(String);

impl ImageRef {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Exactly [`REQUIRED_IMAGE_COUNT`] reference images, in caller order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageSet([ImageRef; REQUIRED_IMAGE_COUNT]);

impl ImageSet {
    pub fn new(images: [ImageRef; REQUIRED_IMAGE_COUNT]) -> Self {
        Self(images)
    }

    /// Image references as the plain strings the provider expects.
    pub fn to_urls(&self) -> Vec<String> {
        self.0.iter().map(|img| img.as_str().to_string()).collect()
    }
}

// ---------------------------------------------------------------------------
// Request aggregate
// ---------------------------------------------------------------------------

/// A validated generation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub storyboard: Storyboard,
    pub images: ImageSet,
    pub product_description: String,
    pub style: String,
}

impl GenerationRequest {
    /// Number of scenes in the storyboard.
    pub fn scene_count(&self) -> usize {
        self.storyboard.moments.len()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
