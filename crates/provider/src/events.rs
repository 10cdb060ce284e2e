//! Progress events emitted while a job is in flight.
//!
//! Events are informational only. They travel on a side channel separate
//! from the job's terminal result and never influence control flow.

use serde::Serialize;
use tokio::sync::mpsc;

/// A progress notification for one provider job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProviderEvent {
    /// The provider accepted the job.
    Submitted { request_id: String },

    /// The job is waiting for a worker.
    Queued {
        /// Best-effort queue position, when reported.
        position: Option<u32>,
    },

    /// The job is running. `logs` holds lines not yet forwarded (may be empty).
    InProgress { logs: Vec<String> },
}

/// Sender half of the per-job progress channel.
pub type ProgressSender = mpsc::UnboundedSender<ProviderEvent>;

/// Receiver half of the per-job progress channel.
pub type ProgressReceiver = mpsc::UnboundedReceiver<ProviderEvent>;

/// Create a progress channel for one job.
pub fn progress_channel() -> (ProgressSender, ProgressReceiver) {
    mpsc::unbounded_channel()
}
