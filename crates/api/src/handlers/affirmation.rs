//! Handlers for the `/affirmations` resource (encadrant-only).
//!
//! Affirmations are a shared pool: any encadrant may list and read them all
//! when configuring an activity, but editing and deletion require owning at
//! least one activity the affirmation is linked to.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use troublemaker_core::activity::normalize_code;
use troublemaker_core::affirmation::validate_ground_truth;
use troublemaker_core::error::CoreError;
use troublemaker_core::reconciliation::Cardinality;
use troublemaker_core::types::DbId;
use troublemaker_db::models::affirmation::{Affirmation, CreateAffirmation, UpdateAffirmation};
use troublemaker_db::repositories::{ActiviteRepo, AffirmationRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireEncadrant;
use crate::state::AppState;

/// Response for affirmation creation: the created row plus an optional
/// warning when direct activity linking was requested but failed.
#[derive(Debug, Serialize)]
pub struct CreateAffirmationResponse {
    #[serde(flatten)]
    pub affirmation: Affirmation,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning_activity_linking: Option<String>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/affirmations
pub async fn list(
    State(state): State<AppState>,
    RequireEncadrant(_user): RequireEncadrant,
) -> AppResult<Json<Vec<Affirmation>>> {
    let affirmations = AffirmationRepo::list_all(&state.pool).await?;
    Ok(Json(affirmations))
}

/// GET /api/affirmations/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    RequireEncadrant(_user): RequireEncadrant,
    Path(id): Path<DbId>,
) -> AppResult<Json<Affirmation>> {
    let affirmation = find_affirmation(&state, id).await?;
    Ok(Json(affirmation))
}

/// POST /api/affirmations
///
/// Create an affirmation, optionally linking it directly to an owned
/// activity via `activity_code`. A failed link (unknown or unowned
/// activity) still creates the affirmation and reports a warning, matching
/// the authoring UI's expectations.
pub async fn create(
    State(state): State<AppState>,
    RequireEncadrant(user): RequireEncadrant,
    Json(input): Json<CreateAffirmation>,
) -> AppResult<(StatusCode, Json<CreateAffirmationResponse>)> {
    let native = Cardinality::from_count(input.nbr_reponses).map_err(CoreError::from)?;
    validate_ground_truth(native, Some(input.is_correct_vf), input.reponse_correcte_qcm)?;

    let affirmation = AffirmationRepo::create(&state.pool, &input, user.user_id).await?;

    let mut warning = None;
    if let Some(raw_code) = &input.activity_code {
        let code = normalize_code(raw_code)?;
        let owned = ActiviteRepo::find_by_code(&state.pool, &code)
            .await?
            .is_some_and(|a| a.encadrant_id == user.user_id);
        if owned {
            ActiviteRepo::add_affirmation(&state.pool, &code, affirmation.id).await?;
        } else {
            tracing::warn!(
                affirmation_id = affirmation.id,
                activity_code = %code,
                "Created affirmation but could not link to activity"
            );
            warning = Some(format!(
                "Activity '{code}' not found or not owned; the affirmation was not linked"
            ));
        }
    }

    Ok((
        StatusCode::CREATED,
        Json(CreateAffirmationResponse {
            affirmation,
            warning_activity_linking: warning,
        }),
    ))
}

/// PUT /api/affirmations/{id}
///
/// Update text and ground-truth fields. The native format (`nbr_reponses`)
/// is immutable; the resulting state must stay consistent with it.
pub async fn update(
    State(state): State<AppState>,
    RequireEncadrant(user): RequireEncadrant,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateAffirmation>,
) -> AppResult<Json<Affirmation>> {
    let current = find_affirmation(&state, id).await?;
    ensure_editable(&state, id, user.user_id).await?;

    // Validate the row as it will look after COALESCE is applied.
    let native = Cardinality::from_count(current.nbr_reponses).map_err(CoreError::from)?;
    validate_ground_truth(
        native,
        Some(input.is_correct_vf.unwrap_or(current.is_correct_vf)),
        input.reponse_correcte_qcm.or(current.reponse_correcte_qcm),
    )?;

    let updated = AffirmationRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(updated))
}

/// DELETE /api/affirmations/{id}
///
/// Removes the affirmation from every activity it is linked to; stored
/// responses cascade.
pub async fn delete(
    State(state): State<AppState>,
    RequireEncadrant(user): RequireEncadrant,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    find_affirmation(&state, id).await?;
    ensure_editable(&state, id, user.user_id).await?;

    AffirmationRepo::delete(&state.pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Affirmation",
        id: id.to_string(),
    })
}

async fn find_affirmation(state: &AppState, id: DbId) -> AppResult<Affirmation> {
    AffirmationRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))
}

/// An encadrant may modify an affirmation only when they own at least one
/// activity it is linked to.
async fn ensure_editable(state: &AppState, id: DbId, encadrant_id: DbId) -> AppResult<()> {
    if AffirmationRepo::is_editable_by(&state.pool, id, encadrant_id).await? {
        Ok(())
    } else {
        Err(AppError::Core(CoreError::Forbidden(
            "You do not have permission to modify this affirmation".into(),
        )))
    }
}
