//! Refresh-token session model and DTOs.

use sqlx::FromRow;
use troublemaker_core::types::{DbId, Timestamp};

/// A row from the `sessions` table. Only the SHA-256 hash of the refresh
/// token is stored, never the plaintext.
#[derive(Debug, Clone, FromRow)]
pub struct Session {
    pub id: DbId,
    pub user_id: DbId,
    pub refresh_token_hash: String,
    pub expires_at: Timestamp,
    pub revoked_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new session.
#[derive(Debug)]
pub struct CreateSession {
    pub user_id: DbId,
    pub refresh_token_hash: String,
    pub expires_at: Timestamp,
}
