//! Repository for the `categories` table.

use sqlx::PgPool;
use troublemaker_core::types::DbId;

use crate::models::categorie::{Categorie, CreateCategorie};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, nom, created_at, updated_at";

/// Provides CRUD operations for categories.
pub struct CategorieRepo;

impl CategorieRepo {
    /// Insert a new category, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateCategorie) -> Result<Categorie, sqlx::Error> {
        let query = format!(
            "INSERT INTO categories (nom) VALUES ($1) RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Categorie>(&query)
            .bind(&input.nom)
            .fetch_one(pool)
            .await
    }

    /// Find a category by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Categorie>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM categories WHERE id = $1");
        sqlx::query_as::<_, Categorie>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all categories, alphabetically.
    pub async fn list(pool: &PgPool) -> Result<Vec<Categorie>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM categories ORDER BY nom");
        sqlx::query_as::<_, Categorie>(&query).fetch_all(pool).await
    }
}
