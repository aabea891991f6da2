//! Route definitions for student responses.

use axum::routing::get;
use axum::Router;

use crate::handlers::reponse;
use crate::state::AppState;

/// Routes mounted at `/reponses`.
///
/// DELETE is deliberately unrouted: responses are never deleted through the
/// API, and axum answers 405 for the missing method.
///
/// ```text
/// GET  /       -> list (?activity_code, ?affirmation_id)
/// POST /       -> submit (create/update upsert)
/// GET  /{id}   -> get_by_id
/// PUT  /{id}   -> update
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(reponse::list).post(reponse::submit))
        .route("/{id}", get(reponse::get_by_id).put(reponse::update))
}
