//! Affirmation entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use troublemaker_core::types::{DbId, Timestamp};

/// A row from the `affirmations` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Affirmation {
    pub id: DbId,
    /// The statement text shown to the student.
    pub affirmation: String,
    /// Why the statement is true/false; shown during debrief.
    pub explication: Option<String>,
    /// Native cardinality (2 or 4), fixed at authoring time. Stored
    /// responses are always expressed in this format.
    pub nbr_reponses: i16,
    pub is_correct_vf: bool,
    /// Correct level index (1-4); set iff `nbr_reponses` is 4.
    pub reponse_correcte_qcm: Option<i16>,
    pub encadrant_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new affirmation.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAffirmation {
    pub affirmation: String,
    pub explication: Option<String>,
    pub nbr_reponses: i16,
    pub is_correct_vf: bool,
    pub reponse_correcte_qcm: Option<i16>,
    /// Optional activity to link the new affirmation to directly.
    pub activity_code: Option<String>,
}

/// DTO for updating an existing affirmation. `nbr_reponses` is immutable
/// after creation (stored responses depend on it); text and ground-truth
/// fields may change.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateAffirmation {
    pub affirmation: Option<String>,
    pub explication: Option<String>,
    pub is_correct_vf: Option<bool>,
    pub reponse_correcte_qcm: Option<i16>,
}
