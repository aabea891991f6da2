//! Handlers for student lookups used by the activity configuration UI.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use troublemaker_core::types::DbId;
use troublemaker_db::repositories::UserRepo;

use crate::error::AppResult;
use crate::middleware::rbac::RequireEncadrant;
use crate::state::AppState;

/// Request body for `POST /api/etudiants/resolve-emails`.
#[derive(Debug, Deserialize)]
pub struct ResolveEmailsRequest {
    pub emails: Vec<String>,
}

/// Resolution result: ids of the student accounts found, plus the emails
/// that matched no account.
#[derive(Debug, Serialize)]
pub struct ResolveEmailsResponse {
    pub ids: Vec<DbId>,
    pub found_count: usize,
    pub requested_count: usize,
    pub missing_emails: Vec<String>,
}

/// POST /api/etudiants/resolve-emails
///
/// Resolve student emails to their user ids. Unknown emails are reported,
/// not provisioned (provisioning happens through activity creation).
pub async fn resolve_emails(
    State(state): State<AppState>,
    RequireEncadrant(_user): RequireEncadrant,
    Json(input): Json<ResolveEmailsRequest>,
) -> AppResult<Json<ResolveEmailsResponse>> {
    let cleaned: Vec<String> = input
        .emails
        .iter()
        .map(|e| e.trim().to_lowercase())
        .filter(|e| !e.is_empty())
        .collect();

    let found = UserRepo::list_etudiants_by_emails(&state.pool, &cleaned).await?;

    let found_emails: Vec<&str> = found.iter().map(|u| u.email.as_str()).collect();
    let missing_emails: Vec<String> = cleaned
        .iter()
        .filter(|e| !found_emails.contains(&e.as_str()))
        .cloned()
        .collect();

    if !missing_emails.is_empty() {
        tracing::warn!(?missing_emails, "No student account for some emails");
    }

    Ok(Json(ResolveEmailsResponse {
        ids: found.iter().map(|u| u.id).collect(),
        found_count: found.len(),
        requested_count: cleaned.len(),
        missing_emails,
    }))
}
