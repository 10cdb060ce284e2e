//! Handler for `POST /api/generate-video`.
//!
//! Validates the storyboard request, compiles the prompt, runs one provider
//! job to completion and normalizes its result into `{ videoUrl, prompt,
//! metadata }`. Validation and configuration failures are detected before
//! any provider call.

use std::time::{Duration, Instant};

use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use reelgen_core::diagnostics::{encoded_len, to_kb, RequestDiagnostics};
use reelgen_core::error::CoreError;
use reelgen_core::generation::{GenerationMetadata, GenerationResult};
use reelgen_core::normalize::extract_video_url;
use reelgen_core::prompt;
use reelgen_core::validation::validate_request;
use reelgen_provider::client::VideoJob;
use reelgen_provider::events::progress_channel;
use serde_json::Value;
use tracing::Instrument;
use uuid::Uuid;

use crate::config::FAL_KEY_VAR;
use crate::engine::progress::log_progress;
use crate::error::{AppError, AppResult};
use crate::router::REQUEST_ID_HEADER;
use crate::state::AppState;

/// POST /api/generate-video
///
/// Runs inside a `generate_video` span keyed by the request ID set by the
/// request-id middleware (or a fresh UUID when absent).
pub async fn generate_video(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> AppResult<Json<GenerationResult>> {
    let request_id = headers
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let span = tracing::info_span!("generate_video", %request_id);
    run_generation(state, body).instrument(span).await.map(Json)
}

async fn run_generation(
    state: AppState,
    body: Result<Bytes, BytesRejection>,
) -> AppResult<GenerationResult> {
    let body = body.map_err(reject_body)?;
    let value: Value = serde_json::from_slice(&body).inspect_err(|e| {
        tracing::warn!(kind = "validation_failed", error = %e, "Request body is not valid JSON");
    })?;

    log_request(&state, body.len(), &value);

    let request = validate_request(&value).inspect_err(|e| {
        tracing::warn!(kind = "validation_failed", error = %e, "Rejected generation request");
    })?;

    let provider = state.provider.clone().ok_or_else(|| {
        tracing::error!(
            kind = "configuration_missing",
            env_var = FAL_KEY_VAR,
            "Provider credential is not configured",
        );
        CoreError::MissingConfig(FAL_KEY_VAR)
    })?;

    let compiled = prompt::compile(&request);
    let job = VideoJob::new(&request.images, &compiled);

    tracing::info!(
        kind = "provider_call_started",
        model = %state.config.provider.model,
        scenes = request.scene_count(),
        style = %request.style,
        prompt_chars = compiled.positive.len(),
        negative_prompt_chars = compiled.negative.len(),
        payload_kb = to_kb(encoded_len(&job)),
        "Submitting generation job",
    );

    let started = Instant::now();
    let (tx, rx) = progress_channel();
    let progress = tokio::spawn(log_progress(rx).in_current_span());

    let deadline = Duration::from_secs(state.config.request_timeout_secs);
    let outcome = tokio::time::timeout(deadline, provider.subscribe(&job, tx)).await;
    let progress_events = progress.await.unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Progress logging task did not finish cleanly");
        0
    });

    let raw = match outcome {
        Ok(result) => result.inspect_err(|e| {
            tracing::error!(
                kind = "provider_call_failed",
                error_name = e.kind(),
                error = %e,
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Provider call failed",
            );
        })?,
        Err(_) => {
            tracing::error!(
                kind = "provider_call_failed",
                error_name = "Timeout",
                timeout_secs = state.config.request_timeout_secs,
                progress_events,
                "Provider call exceeded the request timeout",
            );
            return Err(AppError::Timeout {
                secs: state.config.request_timeout_secs,
            });
        }
    };

    tracing::info!(
        kind = "provider_call_completed",
        progress_events,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Provider job finished",
    );

    let extracted = extract_video_url(&raw).inspect_err(|e| {
        tracing::error!(
            kind = "normalization_failed",
            error = %e,
            raw_result = %raw,
            "Could not find a video URL in the provider result",
        );
    })?;

    tracing::info!(
        kind = "generation_succeeded",
        video_url = %extracted.url,
        rule = extracted.rule,
        "Video generated",
    );

    Ok(GenerationResult {
        video_url: extracted.url,
        prompt: compiled.positive,
        metadata: GenerationMetadata::for_request(&request),
    })
}

/// Map a body read failure to a 413 (over the limit) or 400.
fn reject_body(rejection: BytesRejection) -> AppError {
    let message = rejection.body_text();
    tracing::warn!(kind = "validation_failed", error = %message, "Could not read request body");
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(message)
    } else {
        AppError::BadRequest(message)
    }
}

/// Log request diagnostics: sizes, image summaries and credential presence.
fn log_request(state: &AppState, body_bytes: usize, body: &Value) {
    let diagnostics = RequestDiagnostics::from_body(body_bytes, body);

    tracing::info!(
        kind = "request_received",
        environment = %state.config.environment,
        provider_configured = state.provider.is_some(),
        api_key_len = state.config.provider.api_key_len(),
        body_kb = diagnostics.body_kb(),
        body_mb = diagnostics.body_mb(),
        image_count = diagnostics.image_count,
        storyboard_kb = diagnostics.storyboard_kb(),
        moment_count = diagnostics.moment_count,
        "Generation request received",
    );

    for image in &diagnostics.images {
        tracing::debug!(
            index = image.index,
            is_data_url = image.is_data_url,
            size_kb = image.size_kb,
            preview = %image.preview,
            "Reference image",
        );
    }
}
