pub mod health;

use axum::routing::post;
use axum::Router;

use crate::handlers::generation;
use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /generate-video    POST  compile a storyboard and render a video
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().route("/generate-video", post(generation::generate_video))
}
