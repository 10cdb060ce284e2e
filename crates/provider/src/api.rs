//! REST client for the fal queue endpoints.
//!
//! Wraps job submission, status polling and result retrieval using
//! [`reqwest`]. Every request carries the `Authorization: Key ...` header.

use serde::Deserialize;

/// HTTP client for the provider's queue API.
pub struct FalQueueApi {
    client: reqwest::Client,
    queue_url: String,
    api_key: String,
}

/// Response returned by the queue after accepting a job.
#[derive(Debug, Deserialize)]
pub struct SubmitResponse {
    /// Provider-assigned identifier for the queued request.
    pub request_id: String,
    /// Absolute URL to poll for status, when the provider supplies one.
    pub status_url: Option<String>,
    /// Absolute URL of the final result, when the provider supplies one.
    pub response_url: Option<String>,
}

/// Errors from the queue REST layer.
#[derive(Debug, thiserror::Error)]
pub enum FalApiError {
    /// The HTTP request itself failed (network, DNS, TLS, decoding).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The provider returned a non-2xx status code.
    #[error("Provider API error ({status}): {body}")]
    ApiError {
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },
}

impl FalQueueApi {
    /// Create a client for the queue at `queue_url`, e.g.
    /// `https://queue.fal.run`.
    pub fn new(queue_url: String, api_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            queue_url: queue_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    /// Queue a job for `model`.
    ///
    /// Sends `POST {queue_url}/{model}` with `input` as the JSON body.
    pub async fn submit<T: serde::Serialize + ?Sized>(
        &self,
        model: &str,
        input: &T,
    ) -> Result<SubmitResponse, FalApiError> {
        let response = self
            .client
            .post(format!("{}/{}", self.queue_url, model))
            .header(reqwest::header::AUTHORIZATION, self.auth_header())
            .json(input)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// Fetch the current status document, including log lines.
    pub async fn status(&self, status_url: &str) -> Result<serde_json::Value, FalApiError> {
        let response = self
            .client
            .get(format!("{status_url}?logs=1"))
            .header(reqwest::header::AUTHORIZATION, self.auth_header())
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// Fetch the result payload of a completed request.
    pub async fn result(&self, response_url: &str) -> Result<serde_json::Value, FalApiError> {
        let response = self
            .client
            .get(response_url)
            .header(reqwest::header::AUTHORIZATION, self.auth_header())
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// Status URL for a request when the submit response did not include one.
    pub fn status_url(&self, model: &str, request_id: &str) -> String {
        format!("{}/status", self.response_url(model, request_id))
    }

    /// Result URL for a request when the submit response did not include one.
    pub fn response_url(&self, model: &str, request_id: &str) -> String {
        format!("{}/{}/requests/{}", self.queue_url, model, request_id)
    }

    // ---- private helpers ----

    fn auth_header(&self) -> String {
        format!("Key {}", self.api_key)
    }

    /// Ensure the response has a success status code. Returns the
    /// response unchanged on success, or a [`FalApiError::ApiError`]
    /// containing the status and body text on failure.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, FalApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(FalApiError::ApiError {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    /// Parse a successful JSON response body into the expected type.
    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, FalApiError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }
}
