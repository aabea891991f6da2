//! Route definitions for authentication.

use axum::routing::post;
use axum::Router;

use crate::handlers::auth;
use crate::state::AppState;

/// Authentication routes mounted directly under `/api`.
///
/// ```text
/// POST /login/encadrant  -> login_encadrant
/// POST /login/activite   -> login_activite
/// POST /auth/refresh     -> refresh
/// POST /logout           -> logout
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login/encadrant", post(auth::login_encadrant))
        .route("/login/activite", post(auth::login_activite))
        .route("/auth/refresh", post(auth::refresh))
        .route("/logout", post(auth::logout))
}
