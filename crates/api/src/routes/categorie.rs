//! Route definitions for categories.

use axum::routing::get;
use axum::Router;

use crate::handlers::categorie;
use crate::state::AppState;

/// Routes mounted at `/categories` (encadrant-only).
///
/// ```text
/// GET  /  -> list
/// POST /  -> create
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(categorie::list).post(categorie::create))
}
