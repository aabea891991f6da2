//! Handlers for the `/activites` resource.
//!
//! Encadrants manage the activities they own; students only see published
//! activities they are authorized for. The activity code is the primary key
//! and is immutable after creation.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use troublemaker_core::activity::{normalize_code, validate_type_apprenant};
use troublemaker_core::error::CoreError;
use troublemaker_core::reconciliation::Cardinality;
use troublemaker_core::roles::{ROLE_ENCADRANT, ROLE_ETUDIANT};
use troublemaker_core::types::DbId;
use troublemaker_db::models::activite::{
    Activite, ActiviteDetail, CreateActivite, UpdateActivite,
};
use troublemaker_db::models::user::{CreateUser, EtudiantInfo, User};
use troublemaker_db::repositories::{ActiviteRepo, AffirmationRepo, CategorieRepo, UserRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireEncadrant;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/activites
///
/// Encadrants list their own activities; students list published activities
/// they are authorized for.
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<Vec<Activite>>> {
    let activites = match user.role.as_str() {
        ROLE_ENCADRANT => ActiviteRepo::list_by_encadrant(&state.pool, user.user_id).await?,
        ROLE_ETUDIANT => {
            ActiviteRepo::list_published_for_etudiant(&state.pool, user.user_id).await?
        }
        other => {
            return Err(AppError::Core(CoreError::Forbidden(format!(
                "Unknown role '{other}'"
            ))))
        }
    };
    Ok(Json(activites))
}

/// POST /api/activites
///
/// Create an activity owned by the authenticated encadrant. Associated
/// students may be given as ids and/or a comma-separated email list;
/// unknown student emails are provisioned as new accounts.
pub async fn create(
    State(state): State<AppState>,
    RequireEncadrant(user): RequireEncadrant,
    Json(input): Json<CreateActivite>,
) -> AppResult<(StatusCode, Json<ActiviteDetail>)> {
    let code = normalize_code(&input.code)?;

    if let Some(count) = input.type_affirmation_requise {
        Cardinality::from_count(count).map_err(CoreError::from)?;
    }
    if let Some(type_apprenant) = &input.type_apprenant {
        validate_type_apprenant(type_apprenant)?;
    }

    // Explicit duplicate check: the primary key is not a `uq_` constraint,
    // so the generic sqlx classifier would report 500 instead of 409.
    if ActiviteRepo::find_by_code(&state.pool, &code).await?.is_some() {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Activity code '{code}' already exists"
        ))));
    }

    let activite = ActiviteRepo::create(&state.pool, &code, &input, user.user_id).await?;

    let etudiant_ids = collect_etudiants(
        &state,
        &input.etudiants_autorises_ids,
        input.etudiants_emails.as_deref(),
    )
    .await?;
    if !etudiant_ids.is_empty() {
        ActiviteRepo::set_etudiants(&state.pool, &code, &etudiant_ids).await?;
    }

    if !input.affirmations_associes_ids.is_empty() {
        validate_affirmation_ids(&state, &input.affirmations_associes_ids).await?;
        ActiviteRepo::set_affirmations(&state.pool, &code, &input.affirmations_associes_ids)
            .await?;
    }

    let detail = load_detail(&state, activite).await?;
    Ok((StatusCode::CREATED, Json(detail)))
}

/// GET /api/activites/{code}
///
/// Owning encadrants see any of their activities; authorized students see
/// only published ones.
pub async fn get_by_code(
    State(state): State<AppState>,
    user: AuthUser,
    Path(code): Path<String>,
) -> AppResult<Json<ActiviteDetail>> {
    let code = normalize_code(&code)?;
    let activite = find_activite(&state, &code).await?;

    match user.role.as_str() {
        ROLE_ENCADRANT => {
            if activite.encadrant_id != user.user_id {
                return Err(AppError::Core(CoreError::Forbidden(
                    "You do not own this activity".into(),
                )));
            }
        }
        ROLE_ETUDIANT => {
            if !ActiviteRepo::is_etudiant_authorized(&state.pool, &code, user.user_id).await? {
                return Err(AppError::Core(CoreError::Forbidden(
                    "You are not authorized for this activity".into(),
                )));
            }
            if !activite.is_published {
                return Err(AppError::Core(CoreError::Forbidden(
                    "This activity is not published yet".into(),
                )));
            }
        }
        other => {
            return Err(AppError::Core(CoreError::Forbidden(format!(
                "Unknown role '{other}'"
            ))))
        }
    }

    let detail = load_detail(&state, activite).await?;
    Ok(Json(detail))
}

/// PUT /api/activites/{code}
///
/// Update an owned activity. The code and response format are immutable.
pub async fn update(
    State(state): State<AppState>,
    RequireEncadrant(user): RequireEncadrant,
    Path(code): Path<String>,
    Json(input): Json<UpdateActivite>,
) -> AppResult<Json<ActiviteDetail>> {
    let code = normalize_code(&code)?;
    let activite = find_owned_activite(&state, &code, user.user_id).await?;

    if let Some(type_apprenant) = &input.type_apprenant {
        validate_type_apprenant(type_apprenant)?;
    }

    let updated = ActiviteRepo::update(&state.pool, &activite.code, &input)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "Activite",
                id: code.clone(),
            })
        })?;

    // Replace associations only when the caller provided them.
    if input.etudiants_autorises_ids.is_some() || input.etudiants_emails.is_some() {
        let ids = collect_etudiants(
            &state,
            input.etudiants_autorises_ids.as_deref().unwrap_or(&[]),
            input.etudiants_emails.as_deref(),
        )
        .await?;
        ActiviteRepo::set_etudiants(&state.pool, &code, &ids).await?;
    }

    if let Some(affirmation_ids) = &input.affirmations_associes_ids {
        validate_affirmation_ids(&state, affirmation_ids).await?;
        ActiviteRepo::set_affirmations(&state.pool, &code, affirmation_ids).await?;
    }

    let detail = load_detail(&state, updated).await?;
    Ok(Json(detail))
}

/// DELETE /api/activites/{code}
pub async fn delete(
    State(state): State<AppState>,
    RequireEncadrant(user): RequireEncadrant,
    Path(code): Path<String>,
) -> AppResult<StatusCode> {
    let code = normalize_code(&code)?;
    find_owned_activite(&state, &code, user.user_id).await?;

    ActiviteRepo::delete(&state.pool, &code).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

async fn find_activite(state: &AppState, code: &str) -> AppResult<Activite> {
    ActiviteRepo::find_by_code(&state.pool, code)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "Activite",
                id: code.to_string(),
            })
        })
}

/// Find an activity and verify the encadrant owns it.
pub(crate) async fn find_owned_activite(
    state: &AppState,
    code: &str,
    encadrant_id: DbId,
) -> AppResult<Activite> {
    let activite = find_activite(state, code).await?;
    if activite.encadrant_id != encadrant_id {
        return Err(AppError::Core(CoreError::Forbidden(
            "You do not own this activity".into(),
        )));
    }
    Ok(activite)
}

/// Assemble the nested activity detail: ordered affirmations, authorized
/// students, and the target category.
async fn load_detail(state: &AppState, activite: Activite) -> AppResult<ActiviteDetail> {
    let affirmations = ActiviteRepo::list_affirmations(&state.pool, &activite.code).await?;
    let etudiants = ActiviteRepo::list_etudiants(&state.pool, &activite.code).await?;

    let destine_a_categorie = match activite.destine_a {
        Some(id) => CategorieRepo::find_by_id(&state.pool, id).await?,
        None => None,
    };

    let nbr_affirmations_associe = affirmations.len();
    Ok(ActiviteDetail {
        activite,
        destine_a_categorie,
        etudiants_autorises: etudiants.iter().map(EtudiantInfo::from).collect(),
        affirmations_associes: affirmations,
        nbr_affirmations_associe,
    })
}

/// Resolve the authorized-students set from explicit ids plus an optional
/// comma-separated email list, provisioning accounts for unknown emails.
/// Returns deduplicated ids.
async fn collect_etudiants(
    state: &AppState,
    ids: &[DbId],
    emails: Option<&str>,
) -> AppResult<Vec<DbId>> {
    let mut result: Vec<DbId> = Vec::new();

    if !ids.is_empty() {
        let mut unique_ids = ids.to_vec();
        unique_ids.sort_unstable();
        unique_ids.dedup();
        let valid =
            UserRepo::list_by_ids_with_role(&state.pool, &unique_ids, ROLE_ETUDIANT).await?;
        if valid.len() != unique_ids.len() {
            return Err(AppError::Core(CoreError::Validation(
                "One or more student ids are invalid or not students".into(),
            )));
        }
        result.extend(valid.iter().map(|u| u.id));
    }

    if let Some(emails) = emails {
        for email in emails.split(',') {
            let email = email.trim().to_lowercase();
            // Skip blanks and obvious non-addresses, as the original did.
            if email.is_empty() || !email.contains('@') {
                continue;
            }
            let etudiant = match UserRepo::find_etudiant_by_email(&state.pool, &email).await? {
                Some(existing) => existing,
                None => provision_etudiant(state, &email).await?,
            };
            result.push(etudiant.id);
        }
    }

    result.sort_unstable();
    result.dedup();
    Ok(result)
}

/// Create a student account for an email, deriving a unique username from
/// the local part.
async fn provision_etudiant(state: &AppState, email: &str) -> AppResult<User> {
    let base = email.split('@').next().unwrap_or(email);
    let mut username = base.to_string();
    let mut counter = 1;
    while UserRepo::username_exists(&state.pool, &username).await? {
        username = format!("{base}{counter}");
        counter += 1;
    }

    let input = CreateUser {
        username,
        email: email.to_string(),
        password_hash: None,
        first_name: None,
        last_name: None,
        role: ROLE_ETUDIANT.to_string(),
    };
    let user = UserRepo::create(&state.pool, &input).await?;
    tracing::info!(user_id = user.id, email = %user.email, "Provisioned student account");
    Ok(user)
}

async fn validate_affirmation_ids(state: &AppState, ids: &[DbId]) -> AppResult<()> {
    for id in ids {
        if AffirmationRepo::find_by_id(&state.pool, *id).await?.is_none() {
            return Err(AppError::Core(CoreError::Validation(format!(
                "Affirmation {id} does not exist"
            ))));
        }
    }
    Ok(())
}
