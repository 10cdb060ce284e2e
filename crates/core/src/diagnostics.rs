//! Size and shape diagnostics for inbound requests.
//!
//! Computed from the raw body before validation so that rejected requests
//! can be diagnosed too. Nothing here inspects image contents.

use serde::Serialize;
use serde_json::Value;

use crate::storyboard::ImageKind;

/// Maximum characters of a remote image address kept in logs.
pub const IMAGE_PREVIEW_CHARS: usize = 100;

/// Preview shown in place of embedded image data.
pub const EMBEDDED_PREVIEW: &str = "data:...";

static NULL: Value = Value::Null;

/// Per-image summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageSummary {
    /// 1-based position in the request.
    pub index: usize,
    pub is_data_url: bool,
    pub size_kb: f64,
    pub preview: String,
}

/// Summary of an inbound request body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequestDiagnostics {
    pub body_bytes: usize,
    pub image_count: usize,
    pub images: Vec<ImageSummary>,
    pub storyboard_bytes: usize,
    pub moment_count: usize,
}

impl RequestDiagnostics {
    /// Summarize a parsed body whose encoded length was `body_bytes`.
    pub fn from_body(body_bytes: usize, body: &Value) -> Self {
        let images: Vec<ImageSummary> = body
            .get("images")
            .and_then(Value::as_array)
            .map(|list| {
                list.iter()
                    .enumerate()
                    .map(|(idx, img)| summarize_image(idx + 1, img.as_str().unwrap_or_default()))
                    .collect()
            })
            .unwrap_or_default();

        let storyboard = body.get("storyboard").unwrap_or(&NULL);
        let moment_count = storyboard
            .get("moments")
            .and_then(Value::as_array)
            .map_or(0, Vec::len);

        Self {
            body_bytes,
            image_count: images.len(),
            images,
            storyboard_bytes: encoded_len(storyboard),
            moment_count,
        }
    }

    pub fn body_kb(&self) -> f64 {
        to_kb(self.body_bytes)
    }

    pub fn body_mb(&self) -> f64 {
        to_mb(self.body_bytes)
    }

    pub fn storyboard_kb(&self) -> f64 {
        to_kb(self.storyboard_bytes)
    }
}

fn summarize_image(index: usize, image: &str) -> ImageSummary {
    let is_data_url = ImageKind::of(image) == ImageKind::Embedded;
    let preview = if is_data_url {
        EMBEDDED_PREVIEW.to_string()
    } else {
        image.chars().take(IMAGE_PREVIEW_CHARS).collect()
    };

    ImageSummary {
        index,
        is_data_url,
        size_kb: round2(to_kb(image.len())),
        preview,
    }
}

/// Length of the compact JSON encoding of `value`.
pub fn encoded_len<T: Serialize + ?Sized>(value: &T) -> usize {
    serde_json::to_vec(value).map_or(0, |bytes| bytes.len())
}

/// Bytes to kilobytes (1 KB = 1024 bytes).
pub fn to_kb(bytes: usize) -> f64 {
    bytes as f64 / 1024.0
}

/// Bytes to megabytes (1 MB = 1024 KB).
pub fn to_mb(bytes: usize) -> f64 {
    bytes as f64 / 1024.0 / 1024.0
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
