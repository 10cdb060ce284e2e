//! Input validation for generation requests.
//!
//! Turns a raw JSON body into a [`GenerationRequest`] or a
//! [`CoreError::Validation`]. Checks run in a fixed order and stop at the
//! first failure so callers always see the most fundamental problem.

use serde_json::Value;

use crate::error::CoreError;
use crate::storyboard::{GenerationRequest, ImageRef, ImageSet, Storyboard, REQUIRED_IMAGE_COUNT};

/// Message returned when either top-level collection is absent.
pub const MISSING_FIELDS_MESSAGE: &str = "Storyboard and images are required";

/// Validate a raw request body.
///
/// Order of checks:
///
/// 1. `storyboard` and `images` present and non-null.
/// 2. `images` is an array of exactly [`REQUIRED_IMAGE_COUNT`] entries.
/// 3. every image is a non-empty string.
/// 4. the storyboard parses and has at least one moment.
/// 5. `productDescription` and `style` are non-empty strings.
pub fn validate_request(body: &Value) -> Result<GenerationRequest, CoreError> {
    let storyboard = present(body, "storyboard");
    let images = present(body, "images");

    let (Some(storyboard), Some(images)) = (storyboard, images) else {
        return Err(CoreError::Validation(MISSING_FIELDS_MESSAGE.to_string()));
    };

    let images = validate_images(images)?;
    let storyboard = validate_storyboard(storyboard)?;
    let product_description = required_text(body, "productDescription")?;
    let style = required_text(body, "style")?;

    Ok(GenerationRequest {
        storyboard,
        images,
        product_description,
        style,
    })
}

/// Validate the image list, reporting the received count on a mismatch.
pub fn validate_images(images: &Value) -> Result<ImageSet, CoreError> {
    let entries = images.as_array().ok_or_else(|| {
        CoreError::Validation(format!(
            "images must be an array of {REQUIRED_IMAGE_COUNT} image references"
        ))
    })?;

    if entries.len() != REQUIRED_IMAGE_COUNT {
        return Err(CoreError::Validation(format!(
            "Expected {REQUIRED_IMAGE_COUNT} images but received {}",
            entries.len()
        )));
    }

    for (idx, entry) in entries.iter().enumerate() {
        if !matches!(entry.as_str(), Some(s) if !s.trim().is_empty()) {
            return Err(CoreError::Validation(format!(
                "Image {} must be a non-empty data URL or remote address",
                idx + 1
            )));
        }
    }

    Ok(ImageSet::new(std::array::from_fn(|idx| {
        ImageRef::new(entries[idx].as_str().unwrap_or_default())
    })))
}

fn validate_storyboard(value: &Value) -> Result<Storyboard, CoreError> {
    let storyboard: Storyboard = serde_json::from_value(value.clone())
        .map_err(|e| CoreError::Validation(format!("storyboard is malformed: {e}")))?;

    if storyboard.moments.is_empty() {
        return Err(CoreError::Validation(
            "Storyboard must contain at least one moment".to_string(),
        ));
    }

    Ok(storyboard)
}

/// Field value unless absent or JSON `null`.
fn present<'a>(body: &'a Value, field: &str) -> Option<&'a Value> {
    body.get(field).filter(|v| !v.is_null())
}

fn required_text(body: &Value, field: &str) -> Result<String, CoreError> {
    match present(body, field).and_then(Value::as_str) {
        Some(s) if !s.trim().is_empty() => Ok(s.to_string()),
        _ => Err(CoreError::Validation(format!("{field} is required"))),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
