//! Tests for `AppError` → HTTP response mapping.
//!
//! These tests verify that each `AppError` variant produces the correct HTTP
//! status code, error code, and message. They do NOT need an HTTP server --
//! they call `IntoResponse` directly on `AppError` values.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use http_body_util::BodyExt;
use reelgen_api::error::{handle_panic, AppError};
use reelgen_core::error::CoreError;
use reelgen_core::normalize::NormalizeError;
use reelgen_provider::client::ProviderError;

/// Helper: convert an `AppError` into its status code and parsed JSON body.
async fn error_to_response(err: AppError) -> (StatusCode, serde_json::Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

// ---------------------------------------------------------------------------
// Test: CoreError::Validation maps to 400 with the message in error and details
// ---------------------------------------------------------------------------

#[tokio::test]
async fn validation_error_returns_400() {
    let err = AppError::Core(CoreError::Validation("Expected 3 images but received 1".into()));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["error"], "Expected 3 images but received 1");
    assert_eq!(json["details"], "Expected 3 images but received 1");
}

// ---------------------------------------------------------------------------
// Test: every payload carries the troubleshooting hints
// ---------------------------------------------------------------------------

#[tokio::test]
async fn error_payload_includes_troubleshooting() {
    let err = AppError::BadRequest("bad".into());

    let (_, json) = error_to_response(err).await;

    let hints = json["troubleshooting"].as_object().unwrap();
    for key in ["fal_key", "timeout", "images", "request_size"] {
        assert!(hints[key].is_string(), "missing hint {key}");
    }
}

// ---------------------------------------------------------------------------
// Test: CoreError::MissingConfig maps to 500 naming the variable
// ---------------------------------------------------------------------------

#[tokio::test]
async fn missing_config_returns_500_with_variable_name() {
    let err = AppError::Core(CoreError::MissingConfig("FAL_KEY"));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "CONFIGURATION_ERROR");
    assert_eq!(json["error"], "FAL_KEY not configured");
    assert!(json["details"].as_str().unwrap().contains("FAL_KEY"));
}

// ---------------------------------------------------------------------------
// Test: ProviderError maps to 500 with errorName
// ---------------------------------------------------------------------------

#[tokio::test]
async fn provider_error_returns_500_with_error_name() {
    let err = AppError::Provider(ProviderError::Failed("model overloaded".into()));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "PROVIDER_ERROR");
    assert_eq!(json["error"], "Failed to generate video");
    assert_eq!(json["details"], "Video generation failed: model overloaded");
    assert_eq!(json["errorName"], "GenerationFailed");
}

// ---------------------------------------------------------------------------
// Test: NormalizeError maps to 500 URL_NOT_FOUND with the available keys
// ---------------------------------------------------------------------------

#[tokio::test]
async fn url_not_found_returns_500_with_keys() {
    let err = AppError::Normalize(NormalizeError::UrlNotFound {
        available_keys: vec!["status".into(), "payload".into()],
    });

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "URL_NOT_FOUND");
    let details = json["details"].as_str().unwrap();
    assert!(details.starts_with("Failed to extract video URL: "));
    assert!(details.contains("status, payload"));
}

// ---------------------------------------------------------------------------
// Test: AppError::PayloadTooLarge maps to 413
// ---------------------------------------------------------------------------

#[tokio::test]
async fn payload_too_large_returns_413() {
    let err = AppError::PayloadTooLarge("length limit exceeded".into());

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(json["error"], "length limit exceeded");
}

// ---------------------------------------------------------------------------
// Test: AppError::InternalError maps to 500 and sanitizes the message
// ---------------------------------------------------------------------------

#[tokio::test]
async fn internal_error_returns_500_and_sanitizes_message() {
    let err = AppError::InternalError("secret credential leaked".into());

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "INTERNAL_ERROR");
    assert_eq!(json["details"], "An internal error occurred");
    assert!(!json.to_string().contains("secret"));
}

// ---------------------------------------------------------------------------
// Test: AppError::Timeout maps to 500 with the Timeout error name
// ---------------------------------------------------------------------------

#[tokio::test]
async fn timeout_returns_500_with_error_name() {
    let err = AppError::Timeout { secs: 300 };

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "PROVIDER_ERROR");
    assert_eq!(json["errorName"], "Timeout");
    assert_eq!(json["details"], "Video generation did not finish within 300 seconds");
}

// ---------------------------------------------------------------------------
// Test: invalid JSON keeps the parser detail out of the short message
// ---------------------------------------------------------------------------

#[tokio::test]
async fn invalid_json_puts_parser_detail_in_details() {
    let parse_err = serde_json::from_str::<serde_json::Value>("{oops").unwrap_err();
    let err = AppError::from(parse_err);

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "Request body is not valid JSON");
    assert!(json["details"].as_str().unwrap().contains("line 1"));
}

// ---------------------------------------------------------------------------
// Test: a panic is rendered as the sanitized internal error payload
// ---------------------------------------------------------------------------

#[tokio::test]
async fn panic_renders_internal_error_payload() {
    let response = handle_panic(Box::new("secret index out of bounds"));
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "INTERNAL_ERROR");
    assert_eq!(json["errorName"], "InternalError");
    assert!(!json.to_string().contains("secret"));
}
