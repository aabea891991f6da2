pub mod activite;
pub mod affirmation;
pub mod auth;
pub mod categorie;
pub mod debrief;
pub mod etudiant;
pub mod generation;
pub mod health;
pub mod reponse;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /login/encadrant                 encadrant login (public)
/// /login/activite                  student login via activity code (public)
/// /auth/refresh                    refresh token rotation (public)
/// /logout                          revoke sessions (requires auth)
///
/// /activites                       list, create
/// /activites/{code}                get, update, delete
///
/// /affirmations                    list, create (encadrant only)
/// /affirmations/{id}               get, update, delete
///
/// /reponses                        list (?activity_code, ?affirmation_id), submit (upsert)
/// /reponses/{id}                   get, update (DELETE not allowed)
///
/// /debriefs                        list, create (encadrant only)
/// /debriefs/{id}                   get, update, delete
///
/// /categories                      list, create (encadrant only)
///
/// /etudiants/resolve-emails        resolve student emails to ids (POST)
///
/// /generation/affirmations         generate false affirmations (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Authentication (two login flows, refresh, logout).
        .merge(auth::router())
        // Activities and their associations.
        .nest("/activites", activite::router())
        // The shared affirmation pool.
        .nest("/affirmations", affirmation::router())
        // Student responses (format reconciliation happens here).
        .nest("/reponses", reponse::router())
        // Instructor feedback.
        .nest("/debriefs", debrief::router())
        // Student categories.
        .nest("/categories", categorie::router())
        // Email-to-id resolution for the activity configuration UI.
        .nest("/etudiants", etudiant::router())
        // LLM-backed affirmation generation.
        .nest("/generation", generation::router())
}
