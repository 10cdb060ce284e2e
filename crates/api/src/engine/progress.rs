//! Provider event handler for job progress logging.
//!
//! Events are informational; nothing here can fail the request.

use reelgen_provider::events::{ProgressReceiver, ProviderEvent};

/// Log a single provider event.
pub fn handle_provider_event(event: &ProviderEvent) {
    match event {
        ProviderEvent::Submitted { request_id } => {
            tracing::info!(
                kind = "provider_queued",
                provider_request_id = %request_id,
                "Job accepted by provider",
            );
        }
        ProviderEvent::Queued { position } => {
            tracing::debug!(kind = "provider_queued", position = ?position, "Job waiting in queue");
        }
        ProviderEvent::InProgress { logs } if logs.is_empty() => {
            tracing::debug!(kind = "provider_progress", "Job in progress");
        }
        ProviderEvent::InProgress { logs } => {
            for line in logs {
                tracing::info!(kind = "provider_progress", log = %line, "Provider log");
            }
        }
    }
}

/// Drain the progress channel until the sender side is dropped.
///
/// Returns the number of events seen.
pub async fn log_progress(mut rx: ProgressReceiver) -> usize {
    let mut seen = 0;
    while let Some(event) = rx.recv().await {
        handle_provider_event(&event);
        seen += 1;
    }
    seen
}
