//! Repository for the `debriefs` table.

use sqlx::PgPool;
use troublemaker_core::types::DbId;

use crate::models::debrief::{CreateDebrief, Debrief, UpdateDebrief};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, reponse_id, encadrant_id, feedback, created_at, updated_at";

/// Provides CRUD operations for debriefs.
pub struct DebriefRepo;

impl DebriefRepo {
    /// Insert a new debrief, returning the created row. A second debrief
    /// for the same response violates `uq_debriefs_reponse`.
    pub async fn create(
        pool: &PgPool,
        input: &CreateDebrief,
        encadrant_id: DbId,
    ) -> Result<Debrief, sqlx::Error> {
        let query = format!(
            "INSERT INTO debriefs (reponse_id, encadrant_id, feedback)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Debrief>(&query)
            .bind(input.reponse_id)
            .bind(encadrant_id)
            .bind(&input.feedback)
            .fetch_one(pool)
            .await
    }

    /// Find a debrief by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Debrief>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM debriefs WHERE id = $1");
        sqlx::query_as::<_, Debrief>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List debriefs authored by an encadrant, most recent first.
    pub async fn list_by_encadrant(
        pool: &PgPool,
        encadrant_id: DbId,
    ) -> Result<Vec<Debrief>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM debriefs
             WHERE encadrant_id = $1
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Debrief>(&query)
            .bind(encadrant_id)
            .fetch_all(pool)
            .await
    }

    /// Whether a debrief already exists for a response.
    pub async fn exists_for_reponse(pool: &PgPool, reponse_id: DbId) -> Result<bool, sqlx::Error> {
        let row: (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM debriefs WHERE reponse_id = $1)")
                .bind(reponse_id)
                .fetch_one(pool)
                .await?;
        Ok(row.0)
    }

    /// Update a debrief's feedback. Only non-`None` fields are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateDebrief,
    ) -> Result<Option<Debrief>, sqlx::Error> {
        let query = format!(
            "UPDATE debriefs SET feedback = COALESCE($2, feedback)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Debrief>(&query)
            .bind(id)
            .bind(&input.feedback)
            .fetch_optional(pool)
            .await
    }

    /// Delete a debrief by ID. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM debriefs WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
