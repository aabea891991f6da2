//! Role-based access control (RBAC) extractors.
//!
//! Each extractor wraps [`AuthUser`] and rejects requests whose role does not
//! meet the requirement. Use these in route handlers to enforce
//! authorization at the type level.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use troublemaker_core::error::CoreError;
use troublemaker_core::roles::{ROLE_ENCADRANT, ROLE_ETUDIANT};

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Requires the `encadrant` role. Rejects with 403 Forbidden otherwise.
///
/// ```ignore
/// async fn encadrant_only(RequireEncadrant(user): RequireEncadrant) -> AppResult<Json<()>> {
///     // user is guaranteed to be an encadrant here
///     Ok(Json(()))
/// }
/// ```
pub struct RequireEncadrant(pub AuthUser);

impl FromRequestParts<AppState> for RequireEncadrant {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if user.role != ROLE_ENCADRANT {
            return Err(AppError::Core(CoreError::Forbidden(
                "Encadrant role required".into(),
            )));
        }
        Ok(RequireEncadrant(user))
    }
}

/// Requires the `etudiant` role. Rejects with 403 Forbidden otherwise.
///
/// ```ignore
/// async fn etudiant_only(RequireEtudiant(user): RequireEtudiant) -> AppResult<Json<()>> {
///     Ok(Json(()))
/// }
/// ```
pub struct RequireEtudiant(pub AuthUser);

impl FromRequestParts<AppState> for RequireEtudiant {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if user.role != ROLE_ETUDIANT {
            return Err(AppError::Core(CoreError::Forbidden(
                "Etudiant role required".into(),
            )));
        }
        Ok(RequireEtudiant(user))
    }
}
