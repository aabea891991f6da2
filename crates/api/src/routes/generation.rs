//! Route definitions for affirmation generation.

use axum::routing::post;
use axum::Router;

use crate::handlers::generation;
use crate::state::AppState;

/// Routes mounted at `/generation` (encadrant-only).
///
/// ```text
/// POST /affirmations  -> generate_affirmations
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/affirmations", post(generation::generate_affirmations))
}
