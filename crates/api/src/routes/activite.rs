//! Route definitions for activities.

use axum::routing::get;
use axum::Router;

use crate::handlers::activite;
use crate::state::AppState;

/// Routes mounted at `/activites`.
///
/// ```text
/// GET    /        -> list
/// POST   /        -> create
/// GET    /{code}  -> get_by_code
/// PUT    /{code}  -> update
/// DELETE /{code}  -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(activite::list).post(activite::create))
        .route(
            "/{code}",
            get(activite::get_by_code)
                .put(activite::update)
                .delete(activite::delete),
        )
}
