//! Domain logic for storyboard-driven video generation.
//!
//! Everything in this crate is pure and synchronous: request validation,
//! prompt compilation, provider-response normalization and the request
//! diagnostics logged by the API layer.

pub mod diagnostics;
pub mod error;
pub mod generation;
pub mod normalize;
pub mod prompt;
pub mod storyboard;
pub mod validation;
