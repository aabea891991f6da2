//! Debrief entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use troublemaker_core::types::{DbId, Timestamp};

/// A row from the `debriefs` table. At most one debrief exists per
/// response (`uq_debriefs_reponse`).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Debrief {
    pub id: DbId,
    pub reponse_id: DbId,
    pub encadrant_id: DbId,
    pub feedback: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new debrief.
#[derive(Debug, Deserialize)]
pub struct CreateDebrief {
    pub reponse_id: DbId,
    pub feedback: String,
}

/// DTO for updating a debrief's feedback text.
#[derive(Debug, Deserialize)]
pub struct UpdateDebrief {
    pub feedback: Option<String>,
}
