//! Handlers for the `/reponses` resource.
//!
//! The submit flow is where format reconciliation happens: the client sends
//! the raw selection in the activity's presented vocabulary, and the server
//! encodes it into the affirmation's native format before persisting.
//! Listing endpoints run the decoder so every record carries its display
//! label.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use troublemaker_core::activity::normalize_code;
use troublemaker_core::error::CoreError;
use troublemaker_core::reconciliation::{decode, encode, Cardinality, ResponseFields, Selection};
use troublemaker_core::roles::{ROLE_ENCADRANT, ROLE_ETUDIANT};
use troublemaker_core::types::{DbId, Timestamp};
use troublemaker_db::models::reponse::{
    Reponse, ReponseAvecFormat, SubmitReponse, UpsertReponse,
};
use troublemaker_db::repositories::{ActiviteRepo, AffirmationRepo, ReponseRepo};

use crate::error::{AppError, AppResult};
use crate::handlers::activite::find_owned_activite;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireEtudiant;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Query parameters for `GET /api/reponses`.
#[derive(Debug, Deserialize)]
pub struct ListReponsesParams {
    pub activity_code: Option<String>,
    pub affirmation_id: Option<DbId>,
}

/// A response record as served to clients: the stored payload plus the
/// decoded display label in the activity's required vocabulary.
#[derive(Debug, Serialize)]
pub struct ReponseAffichage {
    pub id: DbId,
    pub activite: String,
    pub affirmation: DbId,
    pub affirmation_texte: String,
    pub etudiant: DbId,
    pub etudiant_email: String,
    pub reponse_vf: Option<bool>,
    pub reponse_choisie_qcm: Option<i16>,
    pub justification: Option<String>,
    /// Human-readable label: "Vrai", "Toujours faux", "Non répondu", ...
    pub affichage: &'static str,
    pub timestamp: Timestamp,
}

impl ReponseAffichage {
    /// Decode the display label for a stored row. Rows with a cardinality
    /// the decoder does not know get the sentinel label, never an error.
    fn from_row(row: ReponseAvecFormat) -> Self {
        let affichage = match (
            Cardinality::from_count(row.nbr_reponses),
            Cardinality::from_count(row.type_affirmation_requise),
        ) {
            (Ok(native), Ok(required)) => decode(&row.fields(), native, required),
            _ => troublemaker_core::reconciliation::LABEL_FORMAT_INCONNU,
        };

        ReponseAffichage {
            id: row.id,
            activite: row.activite_code,
            affirmation: row.affirmation_id,
            affirmation_texte: row.affirmation,
            etudiant: row.etudiant_id,
            etudiant_email: row.etudiant_email,
            reponse_vf: row.reponse_vf,
            reponse_choisie_qcm: row.reponse_choisie_qcm,
            justification: row.justification,
            affichage,
            timestamp: row.created_at,
        }
    }
}

/// Body for `PUT /api/reponses/{id}`: partial update of an existing
/// response. Omitted fields keep their stored value.
#[derive(Debug, Deserialize)]
pub struct UpdateReponseBody {
    pub selection: Option<String>,
    pub justification: Option<String>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/reponses
///
/// Students list their own responses (optionally filtered by activity code
/// and affirmation). Encadrants list all responses of an owned activity;
/// for them `activity_code` is required.
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
    Query(params): Query<ListReponsesParams>,
) -> AppResult<Json<Vec<ReponseAffichage>>> {
    let rows = match user.role.as_str() {
        ROLE_ETUDIANT => {
            let code = match &params.activity_code {
                Some(raw) => Some(normalize_code(raw)?),
                None => None,
            };
            ReponseRepo::list_for_etudiant(
                &state.pool,
                user.user_id,
                code.as_deref(),
                params.affirmation_id,
            )
            .await?
        }
        ROLE_ENCADRANT => {
            let raw = params.activity_code.as_deref().ok_or_else(|| {
                AppError::BadRequest(
                    "The 'activity_code' parameter is required for encadrants".into(),
                )
            })?;
            let code = normalize_code(raw)?;
            find_owned_activite(&state, &code, user.user_id).await?;
            ReponseRepo::list_by_activite(&state.pool, &code).await?
        }
        other => {
            return Err(AppError::Core(CoreError::Forbidden(format!(
                "Unknown role '{other}'"
            ))))
        }
    };

    Ok(Json(rows.into_iter().map(ReponseAffichage::from_row).collect()))
}

/// GET /api/reponses/{id}
///
/// Students read their own responses; encadrants read responses belonging
/// to activities they own.
pub async fn get_by_id(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<Reponse>> {
    let reponse = find_reponse(&state, id).await?;

    match user.role.as_str() {
        ROLE_ETUDIANT => {
            if reponse.etudiant_id != user.user_id {
                return Err(AppError::Core(CoreError::Forbidden(
                    "You may only read your own responses".into(),
                )));
            }
        }
        _ => {
            find_owned_activite(&state, &reponse.activite_code, user.user_id).await?;
        }
    }

    Ok(Json(reponse))
}

/// POST /api/reponses
///
/// Submit or update the answer to one affirmation of an activity (upsert).
///
/// A raw `selection` is parsed against the activity's required cardinality
/// and encoded into the affirmation's native cardinality; a pre-encoded
/// `reponse_vf`/`reponse_choisie_qcm` pair is validated against the native
/// format instead. When the resulting payload and justification match what
/// is already stored -- including the case of "Je ne sais pas" with no
/// prior row -- no write is performed.
pub async fn submit(
    State(state): State<AppState>,
    RequireEtudiant(user): RequireEtudiant,
    Json(input): Json<SubmitReponse>,
) -> AppResult<(StatusCode, Json<Option<Reponse>>)> {
    let code = normalize_code(&input.activite)?;

    let activite = ActiviteRepo::find_by_code(&state.pool, &code)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "Activite",
                id: code.clone(),
            })
        })?;

    if !ActiviteRepo::is_etudiant_authorized(&state.pool, &code, user.user_id).await? {
        return Err(AppError::Core(CoreError::Forbidden(
            "You are not authorized for this activity".into(),
        )));
    }

    if !ActiviteRepo::contains_affirmation(&state.pool, &code, input.affirmation).await? {
        return Err(AppError::Core(CoreError::Validation(
            "This affirmation does not belong to the given activity".into(),
        )));
    }

    let affirmation = AffirmationRepo::find_by_id(&state.pool, input.affirmation)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "Affirmation",
                id: input.affirmation.to_string(),
            })
        })?;

    let required =
        Cardinality::from_count(activite.type_affirmation_requise).map_err(CoreError::from)?;
    let native = Cardinality::from_count(affirmation.nbr_reponses).map_err(CoreError::from)?;

    let fields = match &input.selection {
        // Raw selection in the presented vocabulary: run the encoder.
        Some(raw) => {
            let selection = Selection::parse(raw, required).map_err(CoreError::from)?;
            ResponseFields::from_answer(encode(selection, required, native).map_err(CoreError::from)?)
        }
        // Pre-encoded payload: validate it against the native format.
        None => {
            let fields = ResponseFields {
                reponse_vf: input.reponse_vf,
                reponse_choisie_qcm: input.reponse_choisie_qcm,
            };
            fields.to_answer(native).map_err(CoreError::from)?;
            fields
        }
    };

    let justification = input
        .justification
        .as_deref()
        .map(str::trim)
        .filter(|j| !j.is_empty())
        .map(String::from);

    let existing =
        ReponseRepo::find_for_etudiant(&state.pool, &code, input.affirmation, user.user_id)
            .await?;

    // Skip the write when nothing meaningful changed.
    match &existing {
        Some(prev) => {
            if prev.fields() == fields && prev.justification == justification {
                return Ok((StatusCode::OK, Json(existing)));
            }
        }
        None => {
            if fields.is_empty() && justification.is_none() {
                return Ok((StatusCode::OK, Json(None)));
            }
        }
    }

    let upsert = UpsertReponse {
        activite_code: code,
        affirmation_id: input.affirmation,
        etudiant_id: user.user_id,
        reponse_vf: fields.reponse_vf,
        reponse_choisie_qcm: fields.reponse_choisie_qcm,
        justification,
    };
    let saved = ReponseRepo::upsert(&state.pool, &upsert).await?;

    let status = if existing.is_some() {
        StatusCode::OK
    } else {
        StatusCode::CREATED
    };
    tracing::info!(
        reponse_id = saved.id,
        etudiant_id = user.user_id,
        activite = %saved.activite_code,
        affirmation_id = saved.affirmation_id,
        created = existing.is_none(),
        "Stored response"
    );
    Ok((status, Json(Some(saved))))
}

/// PUT /api/reponses/{id}
///
/// Update an owned response in place. A new selection is re-encoded against
/// the same activity/affirmation pairing.
pub async fn update(
    State(state): State<AppState>,
    RequireEtudiant(user): RequireEtudiant,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateReponseBody>,
) -> AppResult<Json<Reponse>> {
    let reponse = find_reponse(&state, id).await?;
    if reponse.etudiant_id != user.user_id {
        return Err(AppError::Core(CoreError::Forbidden(
            "You may only modify your own responses".into(),
        )));
    }

    let fields = match &input.selection {
        Some(raw) => {
            let activite = ActiviteRepo::find_by_code(&state.pool, &reponse.activite_code)
                .await?
                .ok_or_else(|| {
                    AppError::Core(CoreError::NotFound {
                        entity: "Activite",
                        id: reponse.activite_code.clone(),
                    })
                })?;
            let affirmation = AffirmationRepo::find_by_id(&state.pool, reponse.affirmation_id)
                .await?
                .ok_or_else(|| {
                    AppError::Core(CoreError::NotFound {
                        entity: "Affirmation",
                        id: reponse.affirmation_id.to_string(),
                    })
                })?;

            let required = Cardinality::from_count(activite.type_affirmation_requise)
                .map_err(CoreError::from)?;
            let native =
                Cardinality::from_count(affirmation.nbr_reponses).map_err(CoreError::from)?;
            let selection = Selection::parse(raw, required).map_err(CoreError::from)?;
            ResponseFields::from_answer(encode(selection, required, native).map_err(CoreError::from)?)
        }
        None => reponse.fields(),
    };

    let upsert = UpsertReponse {
        activite_code: reponse.activite_code.clone(),
        affirmation_id: reponse.affirmation_id,
        etudiant_id: reponse.etudiant_id,
        reponse_vf: fields.reponse_vf,
        reponse_choisie_qcm: fields.reponse_choisie_qcm,
        justification: input.justification.or(reponse.justification),
    };
    let saved = ReponseRepo::upsert(&state.pool, &upsert).await?;
    Ok(Json(saved))
}

// Note: DELETE is intentionally not routed. Responses are never deleted
// through the API; axum answers 405 for the unregistered method.

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

async fn find_reponse(state: &AppState, id: DbId) -> AppResult<Reponse> {
    ReponseRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "Reponse",
                id: id.to_string(),
            })
        })
}
