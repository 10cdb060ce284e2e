//! Client library for the external video-synthesis provider.
//!
//! Provides the queue REST wrapper, typed status messages, progress
//! events, poll backoff, and the [`client::VideoProvider`] trait the API
//! layer drives a generation job through.

pub mod api;
pub mod client;
pub mod events;
pub mod messages;
pub mod poll;
