//! Route definitions for the affirmation pool.

use axum::routing::get;
use axum::Router;

use crate::handlers::affirmation;
use crate::state::AppState;

/// Routes mounted at `/affirmations` (encadrant-only).
///
/// ```text
/// GET    /      -> list
/// POST   /      -> create
/// GET    /{id}  -> get_by_id
/// PUT    /{id}  -> update
/// DELETE /{id}  -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(affirmation::list).post(affirmation::create))
        .route(
            "/{id}",
            get(affirmation::get_by_id)
                .put(affirmation::update)
                .delete(affirmation::delete),
        )
}
