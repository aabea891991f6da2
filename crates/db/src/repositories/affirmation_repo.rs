//! Repository for the `affirmations` table.

use sqlx::PgPool;
use troublemaker_core::types::DbId;

use crate::models::affirmation::{Affirmation, CreateAffirmation, UpdateAffirmation};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, affirmation, explication, nbr_reponses, is_correct_vf, \
                       reponse_correcte_qcm, encadrant_id, created_at, updated_at";

/// Provides CRUD operations for affirmations.
pub struct AffirmationRepo;

impl AffirmationRepo {
    /// Insert a new affirmation, returning the created row. Ground-truth
    /// consistency is validated in core before this is called.
    pub async fn create(
        pool: &PgPool,
        input: &CreateAffirmation,
        encadrant_id: DbId,
    ) -> Result<Affirmation, sqlx::Error> {
        let query = format!(
            "INSERT INTO affirmations
                (affirmation, explication, nbr_reponses, is_correct_vf,
                 reponse_correcte_qcm, encadrant_id)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Affirmation>(&query)
            .bind(&input.affirmation)
            .bind(&input.explication)
            .bind(input.nbr_reponses)
            .bind(input.is_correct_vf)
            .bind(input.reponse_correcte_qcm)
            .bind(encadrant_id)
            .fetch_one(pool)
            .await
    }

    /// Find an affirmation by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Affirmation>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM affirmations WHERE id = $1");
        sqlx::query_as::<_, Affirmation>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List every affirmation, oldest first. Encadrants pick from the whole
    /// pool when configuring an activity.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<Affirmation>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM affirmations ORDER BY id");
        sqlx::query_as::<_, Affirmation>(&query)
            .fetch_all(pool)
            .await
    }

    /// Update an affirmation. Only non-`None` fields in `input` are
    /// applied; `nbr_reponses` is immutable (stored responses depend on it).
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateAffirmation,
    ) -> Result<Option<Affirmation>, sqlx::Error> {
        let query = format!(
            "UPDATE affirmations SET
                affirmation = COALESCE($2, affirmation),
                explication = COALESCE($3, explication),
                is_correct_vf = COALESCE($4, is_correct_vf),
                reponse_correcte_qcm = COALESCE($5, reponse_correcte_qcm)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Affirmation>(&query)
            .bind(id)
            .bind(&input.affirmation)
            .bind(&input.explication)
            .bind(input.is_correct_vf)
            .bind(input.reponse_correcte_qcm)
            .fetch_optional(pool)
            .await
    }

    /// Delete an affirmation by ID. Returns `true` if a row was removed.
    /// Join-table rows and responses cascade.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM affirmations WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Whether an encadrant may edit an affirmation: they must own at least
    /// one activity the affirmation is linked to.
    pub async fn is_editable_by(
        pool: &PgPool,
        id: DbId,
        encadrant_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let row: (bool,) = sqlx::query_as(
            "SELECT EXISTS(
                 SELECT 1
                 FROM activite_affirmations aa
                 JOIN activites act ON act.code = aa.activite_code
                 WHERE aa.affirmation_id = $1 AND act.encadrant_id = $2)",
        )
        .bind(id)
        .bind(encadrant_id)
        .fetch_one(pool)
        .await?;
        Ok(row.0)
    }
}
