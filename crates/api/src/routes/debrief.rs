//! Route definitions for debriefs.

use axum::routing::get;
use axum::Router;

use crate::handlers::debrief;
use crate::state::AppState;

/// Routes mounted at `/debriefs` (encadrant-only).
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
        .route("/", get(debrief::list).post(debrief::create))
        .route(
            "/{id}",
            get(debrief::get_by_id)
                .put(debrief::update)
                .delete(debrief::delete),
        )
}
