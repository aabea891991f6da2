//! Handlers for the `/categories` resource (encadrant-only).

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use troublemaker_db::models::categorie::{Categorie, CreateCategorie};
use troublemaker_db::repositories::CategorieRepo;

use crate::error::AppResult;
use crate::middleware::rbac::RequireEncadrant;
use crate::state::AppState;

/// GET /api/categories
pub async fn list(
    State(state): State<AppState>,
    RequireEncadrant(_user): RequireEncadrant,
) -> AppResult<Json<Vec<Categorie>>> {
    let categories = CategorieRepo::list(&state.pool).await?;
    Ok(Json(categories))
}

/// POST /api/categories
///
/// A duplicate name violates `uq_categories_nom` and maps to 409.
pub async fn create(
    State(state): State<AppState>,
    RequireEncadrant(_user): RequireEncadrant,
    Json(input): Json<CreateCategorie>,
) -> AppResult<(StatusCode, Json<Categorie>)> {
    let categorie = CategorieRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(categorie)))
}
