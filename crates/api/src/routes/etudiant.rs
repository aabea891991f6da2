//! Route definitions for student lookups.

use axum::routing::post;
use axum::Router;

use crate::handlers::etudiant;
use crate::state::AppState;

/// Routes mounted at `/etudiants` (encadrant-only).
///
/// ```text
/// POST /resolve-emails  -> resolve_emails
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/resolve-emails", post(etudiant::resolve_emails))
}
