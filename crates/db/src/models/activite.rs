//! Activity entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use troublemaker_core::types::{DbId, Timestamp};

use crate::models::affirmation::Affirmation;
use crate::models::categorie::Categorie;
use crate::models::user::EtudiantInfo;

/// A row from the `activites` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Activite {
    /// Primary key: 3-8 uppercase alphanumerics.
    pub code: String,
    pub titre: String,
    pub presentation_publique: Option<String>,
    pub description: Option<String>,
    /// Response cardinality presented to students (2 or 4), independent of
    /// each affirmation's own `nbr_reponses`. Fixed per activity.
    pub type_affirmation_requise: i16,
    /// `"interne"` or `"externe"`.
    pub type_apprenant: String,
    pub destine_a: Option<DbId>,
    pub encadrant_id: DbId,
    pub is_published: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Activity detail as served to clients: the row plus its ordered
/// affirmations, authorized students, and target category.
#[derive(Debug, Serialize)]
pub struct ActiviteDetail {
    #[serde(flatten)]
    pub activite: Activite,
    pub destine_a_categorie: Option<Categorie>,
    pub etudiants_autorises: Vec<EtudiantInfo>,
    pub affirmations_associes: Vec<Affirmation>,
    pub nbr_affirmations_associe: usize,
}

/// DTO for creating a new activity.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateActivite {
    pub code: String,
    pub titre: String,
    pub presentation_publique: Option<String>,
    pub description: Option<String>,
    /// Defaults to 2 (Vrai/Faux) if omitted.
    pub type_affirmation_requise: Option<i16>,
    /// Defaults to `"interne"` if omitted.
    pub type_apprenant: Option<String>,
    pub destine_a: Option<DbId>,
    pub is_published: Option<bool>,
    /// Authorized students by id.
    #[serde(default)]
    pub etudiants_autorises_ids: Vec<DbId>,
    /// Additional authorized students as a comma-separated email list.
    /// Unknown emails are provisioned as new student accounts.
    pub etudiants_emails: Option<String>,
    /// Associated affirmations by id, in presentation order.
    #[serde(default)]
    pub affirmations_associes_ids: Vec<DbId>,
}

/// DTO for updating an existing activity. The code is immutable; all other
/// fields are optional. `None` leaves a field unchanged.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateActivite {
    pub titre: Option<String>,
    pub presentation_publique: Option<String>,
    pub description: Option<String>,
    pub type_apprenant: Option<String>,
    pub destine_a: Option<DbId>,
    pub is_published: Option<bool>,
    pub etudiants_autorises_ids: Option<Vec<DbId>>,
    pub etudiants_emails: Option<String>,
    pub affirmations_associes_ids: Option<Vec<DbId>>,
}
