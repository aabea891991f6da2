//! Handlers for the `/debriefs` resource (encadrant-only).
//!
//! A debrief attaches instructor feedback to exactly one student response.
//! Encadrants may only debrief responses belonging to activities they own,
//! and each response gets at most one debrief.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use troublemaker_core::error::CoreError;
use troublemaker_core::types::DbId;
use troublemaker_db::models::debrief::{CreateDebrief, Debrief, UpdateDebrief};
use troublemaker_db::repositories::{DebriefRepo, ReponseRepo};

use crate::error::{AppError, AppResult};
use crate::handlers::activite::find_owned_activite;
use crate::middleware::rbac::RequireEncadrant;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/debriefs
pub async fn list(
    State(state): State<AppState>,
    RequireEncadrant(user): RequireEncadrant,
) -> AppResult<Json<Vec<Debrief>>> {
    let debriefs = DebriefRepo::list_by_encadrant(&state.pool, user.user_id).await?;
    Ok(Json(debriefs))
}

/// GET /api/debriefs/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    RequireEncadrant(user): RequireEncadrant,
    Path(id): Path<DbId>,
) -> AppResult<Json<Debrief>> {
    let debrief = find_owned_debrief(&state, id, user.user_id).await?;
    Ok(Json(debrief))
}

/// POST /api/debriefs
///
/// Attach feedback to a response. 409 if the response already has a
/// debrief.
pub async fn create(
    State(state): State<AppState>,
    RequireEncadrant(user): RequireEncadrant,
    Json(input): Json<CreateDebrief>,
) -> AppResult<(StatusCode, Json<Debrief>)> {
    let reponse = ReponseRepo::find_by_id(&state.pool, input.reponse_id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "Reponse",
                id: input.reponse_id.to_string(),
            })
        })?;

    // The response must belong to one of the encadrant's own activities.
    find_owned_activite(&state, &reponse.activite_code, user.user_id).await?;

    if DebriefRepo::exists_for_reponse(&state.pool, input.reponse_id).await? {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "A debrief already exists for response {}",
            input.reponse_id
        ))));
    }

    // uq_debriefs_reponse still backstops a concurrent duplicate as 409.
    let debrief = DebriefRepo::create(&state.pool, &input, user.user_id).await?;
    Ok((StatusCode::CREATED, Json(debrief)))
}

/// PUT /api/debriefs/{id}
pub async fn update(
    State(state): State<AppState>,
    RequireEncadrant(user): RequireEncadrant,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateDebrief>,
) -> AppResult<Json<Debrief>> {
    find_owned_debrief(&state, id, user.user_id).await?;

    let updated = DebriefRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(updated))
}

/// DELETE /api/debriefs/{id}
pub async fn delete(
    State(state): State<AppState>,
    RequireEncadrant(user): RequireEncadrant,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    find_owned_debrief(&state, id, user.user_id).await?;

    DebriefRepo::delete(&state.pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Debrief",
        id: id.to_string(),
    })
}

async fn find_owned_debrief(state: &AppState, id: DbId, encadrant_id: DbId) -> AppResult<Debrief> {
    let debrief = DebriefRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    if debrief.encadrant_id != encadrant_id {
        return Err(AppError::Core(CoreError::Forbidden(
            "You do not own this debrief".into(),
        )));
    }
    Ok(debrief)
}
