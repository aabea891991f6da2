//! Repository for the `activites` table and its join tables.

use sqlx::PgPool;
use troublemaker_core::types::DbId;

use crate::models::activite::{Activite, CreateActivite, UpdateActivite};
use crate::models::affirmation::Affirmation;
use crate::models::user::User;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "code, titre, presentation_publique, description, \
    type_affirmation_requise, type_apprenant, destine_a, encadrant_id, \
    is_published, created_at, updated_at";

const AFFIRMATION_COLUMNS: &str = "a.id, a.affirmation, a.explication, a.nbr_reponses, \
    a.is_correct_vf, a.reponse_correcte_qcm, a.encadrant_id, a.created_at, a.updated_at";

const USER_COLUMNS: &str = "u.id, u.username, u.email, u.password_hash, u.first_name, \
    u.last_name, u.role, u.created_at, u.updated_at";

/// Provides CRUD operations for activities.
pub struct ActiviteRepo;

impl ActiviteRepo {
    /// Insert a new activity (scalar fields only; associations are set via
    /// [`Self::set_etudiants`] / [`Self::set_affirmations`]).
    ///
    /// `code` must already be normalized (upper-cased, validated).
    /// If `type_affirmation_requise` is `None`, defaults to 2 (Vrai/Faux).
    /// If `type_apprenant` is `None`, defaults to `'interne'`.
    pub async fn create(
        pool: &PgPool,
        code: &str,
        input: &CreateActivite,
        encadrant_id: DbId,
    ) -> Result<Activite, sqlx::Error> {
        let query = format!(
            "INSERT INTO activites
                (code, titre, presentation_publique, description,
                 type_affirmation_requise, type_apprenant, destine_a,
                 encadrant_id, is_published)
             VALUES ($1, $2, $3, $4, COALESCE($5, 2), COALESCE($6, 'interne'),
                     $7, $8, COALESCE($9, false))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Activite>(&query)
            .bind(code)
            .bind(&input.titre)
            .bind(&input.presentation_publique)
            .bind(&input.description)
            .bind(input.type_affirmation_requise)
            .bind(&input.type_apprenant)
            .bind(input.destine_a)
            .bind(encadrant_id)
            .bind(input.is_published)
            .fetch_one(pool)
            .await
    }

    /// Find an activity by its code.
    pub async fn find_by_code(pool: &PgPool, code: &str) -> Result<Option<Activite>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM activites WHERE code = $1");
        sqlx::query_as::<_, Activite>(&query)
            .bind(code)
            .fetch_optional(pool)
            .await
    }

    /// List activities owned by an encadrant, most recently created first.
    pub async fn list_by_encadrant(
        pool: &PgPool,
        encadrant_id: DbId,
    ) -> Result<Vec<Activite>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM activites
             WHERE encadrant_id = $1
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Activite>(&query)
            .bind(encadrant_id)
            .fetch_all(pool)
            .await
    }

    /// List published activities a student is authorized for.
    pub async fn list_published_for_etudiant(
        pool: &PgPool,
        etudiant_id: DbId,
    ) -> Result<Vec<Activite>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM activites
             WHERE is_published
               AND code IN (SELECT activite_code FROM activite_etudiants
                            WHERE etudiant_id = $1)
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Activite>(&query)
            .bind(etudiant_id)
            .fetch_all(pool)
            .await
    }

    /// Update an activity's scalar fields. Only non-`None` fields are
    /// applied. The code and `type_affirmation_requise` are immutable.
    ///
    /// Returns `None` if no row with the given `code` exists.
    pub async fn update(
        pool: &PgPool,
        code: &str,
        input: &UpdateActivite,
    ) -> Result<Option<Activite>, sqlx::Error> {
        let query = format!(
            "UPDATE activites SET
                titre = COALESCE($2, titre),
                presentation_publique = COALESCE($3, presentation_publique),
                description = COALESCE($4, description),
                type_apprenant = COALESCE($5, type_apprenant),
                destine_a = COALESCE($6, destine_a),
                is_published = COALESCE($7, is_published)
             WHERE code = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Activite>(&query)
            .bind(code)
            .bind(&input.titre)
            .bind(&input.presentation_publique)
            .bind(&input.description)
            .bind(&input.type_apprenant)
            .bind(input.destine_a)
            .bind(input.is_published)
            .fetch_optional(pool)
            .await
    }

    /// Delete an activity by code. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, code: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM activites WHERE code = $1")
            .bind(code)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Replace the authorized-students set of an activity.
    pub async fn set_etudiants(
        pool: &PgPool,
        code: &str,
        etudiant_ids: &[DbId],
    ) -> Result<(), sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query("DELETE FROM activite_etudiants WHERE activite_code = $1")
            .bind(code)
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            "INSERT INTO activite_etudiants (activite_code, etudiant_id)
             SELECT $1, id FROM UNNEST($2::bigint[]) AS ids(id)",
        )
        .bind(code)
        .bind(etudiant_ids)
        .execute(&mut *tx)
        .await?;

        tx.commit().await
    }

    /// Replace the ordered affirmation set of an activity. Position follows
    /// the order of `affirmation_ids`.
    pub async fn set_affirmations(
        pool: &PgPool,
        code: &str,
        affirmation_ids: &[DbId],
    ) -> Result<(), sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query("DELETE FROM activite_affirmations WHERE activite_code = $1")
            .bind(code)
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            "INSERT INTO activite_affirmations (activite_code, affirmation_id, position)
             SELECT $1, id, (ord - 1)::int
             FROM UNNEST($2::bigint[]) WITH ORDINALITY AS ids(id, ord)",
        )
        .bind(code)
        .bind(affirmation_ids)
        .execute(&mut *tx)
        .await?;

        tx.commit().await
    }

    /// Append one affirmation at the end of an activity's ordered set.
    /// A no-op if the affirmation is already associated.
    pub async fn add_affirmation(
        pool: &PgPool,
        code: &str,
        affirmation_id: DbId,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO activite_affirmations (activite_code, affirmation_id, position)
             SELECT $1, $2, COALESCE(MAX(position) + 1, 0)
             FROM activite_affirmations WHERE activite_code = $1
             ON CONFLICT (activite_code, affirmation_id) DO NOTHING",
        )
        .bind(code)
        .bind(affirmation_id)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// List an activity's affirmations in presentation order.
    pub async fn list_affirmations(
        pool: &PgPool,
        code: &str,
    ) -> Result<Vec<Affirmation>, sqlx::Error> {
        let query = format!(
            "SELECT {AFFIRMATION_COLUMNS}
             FROM affirmations a
             JOIN activite_affirmations aa ON aa.affirmation_id = a.id
             WHERE aa.activite_code = $1
             ORDER BY aa.position, a.id"
        );
        sqlx::query_as::<_, Affirmation>(&query)
            .bind(code)
            .fetch_all(pool)
            .await
    }

    /// List the students authorized for an activity.
    pub async fn list_etudiants(pool: &PgPool, code: &str) -> Result<Vec<User>, sqlx::Error> {
        let query = format!(
            "SELECT {USER_COLUMNS}
             FROM users u
             JOIN activite_etudiants ae ON ae.etudiant_id = u.id
             WHERE ae.activite_code = $1
             ORDER BY u.email"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(code)
            .fetch_all(pool)
            .await
    }

    /// Whether a student is authorized for an activity.
    pub async fn is_etudiant_authorized(
        pool: &PgPool,
        code: &str,
        etudiant_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let row: (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM activite_etudiants
                           WHERE activite_code = $1 AND etudiant_id = $2)",
        )
        .bind(code)
        .bind(etudiant_id)
        .fetch_one(pool)
        .await?;
        Ok(row.0)
    }

    /// Whether an affirmation belongs to an activity.
    pub async fn contains_affirmation(
        pool: &PgPool,
        code: &str,
        affirmation_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let row: (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM activite_affirmations
                           WHERE activite_code = $1 AND affirmation_id = $2)",
        )
        .bind(code)
        .bind(affirmation_id)
        .fetch_one(pool)
        .await?;
        Ok(row.0)
    }
}
