//! Handlers for login, refresh, and logout.
//!
//! Two login flows exist:
//! - Encadrants authenticate with email + password.
//! - Students authenticate with email + activity code: the account must be
//!   authorized for the activity and the activity must be published.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use troublemaker_core::activity::normalize_code;
use troublemaker_core::error::CoreError;
use troublemaker_core::roles::ROLE_ENCADRANT;
use troublemaker_db::models::session::CreateSession;
use troublemaker_db::models::user::{User, UserInfo};
use troublemaker_db::repositories::{ActiviteRepo, SessionRepo, UserRepo};

use crate::auth::jwt::{generate_access_token, generate_refresh_token, hash_refresh_token};
use crate::auth::password::verify_password;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /api/login/encadrant`.
#[derive(Debug, Deserialize)]
pub struct EncadrantLoginRequest {
    pub email: String,
    pub password: String,
}

/// Request body for `POST /api/login/activite`.
#[derive(Debug, Deserialize)]
pub struct ActiviteLoginRequest {
    pub email: String,
    pub code_activite: String,
}

/// Request body for `POST /api/auth/refresh`.
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Successful authentication response returned by both login flows.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub user: UserInfo,
    /// The activity code used to log in (student flow only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code_activite: Option<String>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/login/encadrant
///
/// Authenticate an encadrant with email + password.
pub async fn login_encadrant(
    State(state): State<AppState>,
    Json(input): Json<EncadrantLoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let email = input.email.trim().to_lowercase();

    let user = UserRepo::find_by_email(&state.pool, &email)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized("Invalid email or password".into()))
        })?;

    if user.role != ROLE_ENCADRANT {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only encadrants can log in here".into(),
        )));
    }

    // Students have no password hash; an encadrant row always does.
    let hash = user.password_hash.as_deref().ok_or_else(|| {
        AppError::InternalError(format!("Encadrant {} has no password hash", user.id))
    })?;

    let password_valid = verify_password(&input.password, hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;

    if !password_valid {
        return Err(AppError::Core(CoreError::Unauthorized(
            "Invalid email or password".into(),
        )));
    }

    let response = create_auth_response(&state, &user, None).await?;
    Ok(Json(response))
}

/// POST /api/login/activite
///
/// Authenticate a student with email + activity code. The student must be
/// authorized for the activity and the activity must be published.
pub async fn login_activite(
    State(state): State<AppState>,
    Json(input): Json<ActiviteLoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let email = input.email.trim().to_lowercase();
    let code = normalize_code(&input.code_activite)?;

    let user = UserRepo::find_etudiant_by_email(&state.pool, &email)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "Etudiant",
                id: email.clone(),
            })
        })?;

    let activite = ActiviteRepo::find_by_code(&state.pool, &code)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "Activite",
                id: code.clone(),
            })
        })?;

    if !ActiviteRepo::is_etudiant_authorized(&state.pool, &code, user.id).await? {
        return Err(AppError::Core(CoreError::Forbidden(
            "This student is not authorized for this activity".into(),
        )));
    }

    if !activite.is_published {
        return Err(AppError::Core(CoreError::Forbidden(
            "This activity is not published yet".into(),
        )));
    }

    let response = create_auth_response(&state, &user, Some(activite.code)).await?;
    Ok(Json(response))
}

/// POST /api/auth/refresh
///
/// Exchange a valid refresh token for new access + refresh tokens.
pub async fn refresh(
    State(state): State<AppState>,
    Json(input): Json<RefreshRequest>,
) -> AppResult<Json<AuthResponse>> {
    let token_hash = hash_refresh_token(&input.refresh_token);

    let session = SessionRepo::find_active_by_refresh_token_hash(&state.pool, &token_hash)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid or expired refresh token".into(),
            ))
        })?;

    // Token rotation: the old session is dead as soon as it is used.
    SessionRepo::revoke(&state.pool, session.id).await?;

    let user = UserRepo::find_by_id(&state.pool, session.user_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("User no longer exists".into())))?;

    let response = create_auth_response(&state, &user, None).await?;
    Ok(Json(response))
}

/// POST /api/logout
///
/// Revoke all sessions for the authenticated user. Returns 204 No Content.
pub async fn logout(State(state): State<AppState>, auth_user: AuthUser) -> AppResult<StatusCode> {
    SessionRepo::revoke_all_for_user(&state.pool, auth_user.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Generate access + refresh tokens, persist a session row, and build the response.
async fn create_auth_response(
    state: &AppState,
    user: &User,
    code_activite: Option<String>,
) -> AppResult<AuthResponse> {
    let access_token = generate_access_token(user.id, &user.role, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    let (refresh_plaintext, refresh_hash) = generate_refresh_token();

    let expires_at =
        Utc::now() + chrono::Duration::days(state.config.jwt.refresh_token_expiry_days);

    let session_input = CreateSession {
        user_id: user.id,
        refresh_token_hash: refresh_hash,
        expires_at,
    };
    SessionRepo::create(&state.pool, &session_input).await?;

    let expires_in = state.config.jwt.access_token_expiry_mins * 60;

    Ok(AuthResponse {
        access_token,
        refresh_token: refresh_plaintext,
        expires_in,
        user: UserInfo::from(user),
        code_activite,
    })
}
