//! Repository for the `reponses` table.

use sqlx::PgPool;
use troublemaker_core::types::DbId;

use crate::models::reponse::{Reponse, ReponseAvecFormat, UpsertReponse};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, activite_code, affirmation_id, etudiant_id, reponse_vf, \
                       reponse_choisie_qcm, justification, created_at, updated_at";

/// Columns for listing queries joined with the affirmation's format and the
/// student's email.
const JOINED_COLUMNS: &str = "r.id, r.activite_code, r.affirmation_id, r.etudiant_id, \
    r.reponse_vf, r.reponse_choisie_qcm, r.justification, r.created_at, r.updated_at, \
    a.nbr_reponses, act.type_affirmation_requise, a.affirmation, u.email AS etudiant_email";

/// Provides CRUD operations for student responses.
pub struct ReponseRepo;

impl ReponseRepo {
    /// Insert or update the response for one (activity, affirmation,
    /// student) triple. The unique constraint makes concurrent submissions
    /// collapse into a single row.
    pub async fn upsert(pool: &PgPool, input: &UpsertReponse) -> Result<Reponse, sqlx::Error> {
        let query = format!(
            "INSERT INTO reponses
                (activite_code, affirmation_id, etudiant_id,
                 reponse_vf, reponse_choisie_qcm, justification)
             VALUES ($1, $2, $3, $4, $5, $6)
             ON CONFLICT ON CONSTRAINT uq_reponses_activite_affirmation_etudiant
             DO UPDATE SET
                reponse_vf = EXCLUDED.reponse_vf,
                reponse_choisie_qcm = EXCLUDED.reponse_choisie_qcm,
                justification = EXCLUDED.justification
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Reponse>(&query)
            .bind(&input.activite_code)
            .bind(input.affirmation_id)
            .bind(input.etudiant_id)
            .bind(input.reponse_vf)
            .bind(input.reponse_choisie_qcm)
            .bind(&input.justification)
            .fetch_one(pool)
            .await
    }

    /// Find a response by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Reponse>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM reponses WHERE id = $1");
        sqlx::query_as::<_, Reponse>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find the response a student gave to one affirmation of an activity.
    pub async fn find_for_etudiant(
        pool: &PgPool,
        activite_code: &str,
        affirmation_id: DbId,
        etudiant_id: DbId,
    ) -> Result<Option<Reponse>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM reponses
             WHERE activite_code = $1 AND affirmation_id = $2 AND etudiant_id = $3"
        );
        sqlx::query_as::<_, Reponse>(&query)
            .bind(activite_code)
            .bind(affirmation_id)
            .bind(etudiant_id)
            .fetch_optional(pool)
            .await
    }

    /// List a student's own responses, optionally filtered by activity code
    /// and/or affirmation.
    pub async fn list_for_etudiant(
        pool: &PgPool,
        etudiant_id: DbId,
        activite_code: Option<&str>,
        affirmation_id: Option<DbId>,
    ) -> Result<Vec<ReponseAvecFormat>, sqlx::Error> {
        let query = format!(
            "SELECT {JOINED_COLUMNS}
             FROM reponses r
             JOIN affirmations a ON a.id = r.affirmation_id
             JOIN activites act ON act.code = r.activite_code
             JOIN users u ON u.id = r.etudiant_id
             WHERE r.etudiant_id = $1
               AND ($2::text IS NULL OR r.activite_code = $2)
               AND ($3::bigint IS NULL OR r.affirmation_id = $3)
             ORDER BY r.id"
        );
        sqlx::query_as::<_, ReponseAvecFormat>(&query)
            .bind(etudiant_id)
            .bind(activite_code)
            .bind(affirmation_id)
            .fetch_all(pool)
            .await
    }

    /// List every response of an activity (debrief view), grouped by
    /// student then affirmation.
    pub async fn list_by_activite(
        pool: &PgPool,
        activite_code: &str,
    ) -> Result<Vec<ReponseAvecFormat>, sqlx::Error> {
        let query = format!(
            "SELECT {JOINED_COLUMNS}
             FROM reponses r
             JOIN affirmations a ON a.id = r.affirmation_id
             JOIN activites act ON act.code = r.activite_code
             JOIN users u ON u.id = r.etudiant_id
             WHERE r.activite_code = $1
             ORDER BY u.email, r.affirmation_id"
        );
        sqlx::query_as::<_, ReponseAvecFormat>(&query)
            .bind(activite_code)
            .fetch_all(pool)
            .await
    }
}
