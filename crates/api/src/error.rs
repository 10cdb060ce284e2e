use std::any::Any;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use reelgen_core::error::CoreError;
use reelgen_core::normalize::NormalizeError;
use reelgen_provider::api::FalApiError;
use reelgen_provider::client::ProviderError;
use serde::Serialize;

/// Top-level message for every failure after validation.
const GENERATION_FAILED: &str = "Failed to generate video";

/// Application-level error type for HTTP handlers.
///
/// Wraps the domain, provider and normalizer errors and adds HTTP-specific
/// variants. Implements [`IntoResponse`] to produce the uniform error
/// payload with troubleshooting hints.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `reelgen_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The provider call failed or the provider reported a failed job.
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// The provider result did not contain a recognizable video URL.
    #[error(transparent)]
    Normalize(#[from] NormalizeError),

    /// The body was read but is not valid JSON.
    #[error("Invalid JSON body: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// The body could not be read.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// The provider did not finish within the request timeout.
    #[error("Video generation timed out after {secs}s")]
    Timeout { secs: u64 },

    /// The body exceeded the configured limit.
    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    /// An unexpected failure, such as a handler panic. The message is
    /// logged, never returned.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

/// Static hints returned with every error.
#[derive(Debug, Serialize)]
struct Troubleshooting {
    fal_key: &'static str,
    timeout: &'static str,
    images: &'static str,
    request_size: &'static str,
}

const TROUBLESHOOTING: Troubleshooting = Troubleshooting {
    fal_key: "Check that the FAL_KEY environment variable is set on the server",
    timeout: "Video generation takes about 2 minutes; the request may have hit the server timeout",
    images: "Provide exactly 3 reference images as data URLs or https URLs",
    request_size: "Keep the request body under 4.5 MB; large data URLs count toward the limit",
};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    error: String,
    details: String,
    code: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    error_name: Option<&'static str>,
    troubleshooting: Troubleshooting,
}

struct Classified {
    status: StatusCode,
    code: &'static str,
    error: String,
    details: String,
    error_name: Option<&'static str>,
}

impl Classified {
    fn client(status: StatusCode, code: &'static str, message: String) -> Self {
        Self {
            status,
            code,
            error: message.clone(),
            details: message,
            error_name: None,
        }
    }

    fn server(code: &'static str, details: String, error_name: &'static str) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            code,
            error: GENERATION_FAILED.to_string(),
            details,
            error_name: Some(error_name),
        }
    }
}

impl AppError {
    fn classify(&self) -> Classified {
        match self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::Validation(msg) => {
                    Classified::client(StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::MissingConfig(var) => Classified {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    code: "CONFIGURATION_ERROR",
                    error: core.to_string(),
                    details: format!("Set the {var} environment variable on the server"),
                    error_name: Some("ConfigurationError"),
                },
            },

            // --- Provider errors ---
            AppError::Provider(err) => {
                let details = match err {
                    // Raw provider bodies stay in the logs.
                    ProviderError::Api(FalApiError::ApiError { status, .. }) => {
                        format!("Provider rejected the request with status {status}")
                    }
                    other => other.to_string(),
                };
                Classified::server("PROVIDER_ERROR", details, err.kind())
            }

            // --- Normalization errors ---
            AppError::Normalize(err) => Classified::server(
                "URL_NOT_FOUND",
                format!("Failed to extract video URL: {err}"),
                "UrlNotFound",
            ),

            AppError::Timeout { secs } => Classified::server(
                "PROVIDER_ERROR",
                format!("Video generation did not finish within {secs} seconds"),
                "Timeout",
            ),

            // --- HTTP-specific errors ---
            AppError::InvalidJson(err) => Classified {
                status: StatusCode::BAD_REQUEST,
                code: "VALIDATION_ERROR",
                error: "Request body is not valid JSON".to_string(),
                details: err.to_string(),
                error_name: None,
            },
            AppError::BadRequest(msg) => {
                Classified::client(StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
            AppError::PayloadTooLarge(msg) => Classified::client(
                StatusCode::PAYLOAD_TOO_LARGE,
                "VALIDATION_ERROR",
                msg.clone(),
            ),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                Classified::server(
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                    "InternalError",
                )
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let Classified {
            status,
            code,
            error,
            details,
            error_name,
        } = self.classify();

        let body = ErrorBody {
            error,
            details,
            code,
            error_name,
            troubleshooting: TROUBLESHOOTING,
        };

        (status, axum::Json(body)).into_response()
    }
}

/// Panic handler for `CatchPanicLayer`: renders the uniform error payload
/// instead of a bare 500.
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let message = err
        .downcast_ref::<String>()
        .cloned()
        .or_else(|| err.downcast_ref::<&str>().map(|s| s.to_string()))
        .unwrap_or_else(|| "unknown panic payload".to_string());
    AppError::InternalError(format!("handler panicked: {message}")).into_response()
}
