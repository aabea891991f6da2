//! Category entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use troublemaker_core::types::{DbId, Timestamp};

/// A row from the `categories` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Categorie {
    pub id: DbId,
    pub nom: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new category.
#[derive(Debug, Deserialize)]
pub struct CreateCategorie {
    pub nom: String,
}
