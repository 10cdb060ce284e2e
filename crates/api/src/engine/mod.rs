//! Generation engine helpers.
//!
//! Contains the progress handler that turns provider events into
//! structured log lines for the request that owns the job.

pub mod progress;
