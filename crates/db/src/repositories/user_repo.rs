//! Repository for the `users` table.

use sqlx::PgPool;
use troublemaker_core::roles::ROLE_ETUDIANT;
use troublemaker_core::types::DbId;

use crate::models::user::{CreateUser, User};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, username, email, password_hash, first_name, last_name, role, \
                       created_at, updated_at";

/// Provides CRUD operations for users.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (username, email, password_hash, first_name, last_name, role)
             VALUES ($1, $2, $3, COALESCE($4, ''), COALESCE($5, ''), $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.username)
            .bind(&input.email)
            .bind(&input.password_hash)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(&input.role)
            .fetch_one(pool)
            .await
    }

    /// Find a user by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by email (emails are stored lower-cased).
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE email = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// Find a student account by email. Returns `None` for encadrants.
    pub async fn find_etudiant_by_email(
        pool: &PgPool,
        email: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE email = $1 AND role = $2");
        sqlx::query_as::<_, User>(&query)
            .bind(email)
            .bind(ROLE_ETUDIANT)
            .fetch_optional(pool)
            .await
    }

    /// Fetch the subset of `ids` that exist with the given role.
    pub async fn list_by_ids_with_role(
        pool: &PgPool,
        ids: &[DbId],
        role: &str,
    ) -> Result<Vec<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = ANY($1) AND role = $2");
        sqlx::query_as::<_, User>(&query)
            .bind(ids)
            .bind(role)
            .fetch_all(pool)
            .await
    }

    /// Fetch existing student accounts for the given emails.
    pub async fn list_etudiants_by_emails(
        pool: &PgPool,
        emails: &[String],
    ) -> Result<Vec<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE email = ANY($1) AND role = $2");
        sqlx::query_as::<_, User>(&query)
            .bind(emails)
            .bind(ROLE_ETUDIANT)
            .fetch_all(pool)
            .await
    }

    /// Whether a username is already taken.
    pub async fn username_exists(pool: &PgPool, username: &str) -> Result<bool, sqlx::Error> {
        let row: (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM users WHERE username = $1)")
                .bind(username)
                .fetch_one(pool)
                .await?;
        Ok(row.0)
    }
}
