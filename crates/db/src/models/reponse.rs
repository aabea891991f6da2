//! Response entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use troublemaker_core::reconciliation::ResponseFields;
use troublemaker_core::types::{DbId, Timestamp};

/// A row from the `reponses` table.
///
/// The payload is stored in the affirmation's native cardinality: exactly
/// one of `reponse_vf` / `reponse_choisie_qcm` is set, or both are null for
/// an explicit "Je ne sais pas".
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Reponse {
    pub id: DbId,
    pub activite_code: String,
    pub affirmation_id: DbId,
    pub etudiant_id: DbId,
    pub reponse_vf: Option<bool>,
    pub reponse_choisie_qcm: Option<i16>,
    pub justification: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Reponse {
    /// The stored payload as the wire pair used by the encoder/decoder.
    pub fn fields(&self) -> ResponseFields {
        ResponseFields {
            reponse_vf: self.reponse_vf,
            reponse_choisie_qcm: self.reponse_choisie_qcm,
        }
    }
}

/// A response joined with its affirmation's format, as needed by listing
/// endpoints to decode the display label.
#[derive(Debug, Clone, FromRow)]
pub struct ReponseAvecFormat {
    pub id: DbId,
    pub activite_code: String,
    pub affirmation_id: DbId,
    pub etudiant_id: DbId,
    pub reponse_vf: Option<bool>,
    pub reponse_choisie_qcm: Option<i16>,
    pub justification: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    /// The affirmation's native cardinality (`affirmations.nbr_reponses`).
    pub nbr_reponses: i16,
    /// The activity's required cardinality (`activites.type_affirmation_requise`).
    pub type_affirmation_requise: i16,
    /// The affirmation text, for debrief tables.
    pub affirmation: String,
    /// The responding student's email, for grouping in the debrief view.
    pub etudiant_email: String,
}

impl ReponseAvecFormat {
    pub fn fields(&self) -> ResponseFields {
        ResponseFields {
            reponse_vf: self.reponse_vf,
            reponse_choisie_qcm: self.reponse_choisie_qcm,
        }
    }
}

/// DTO for the student submit/update flow.
///
/// Two body shapes are accepted: a raw `selection` in the activity's
/// presented vocabulary (encoded server-side), or the pre-encoded
/// `reponse_vf` / `reponse_choisie_qcm` pair, which is validated against
/// the affirmation's native format. `selection` wins when both are sent.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitReponse {
    pub activite: String,
    pub affirmation: DbId,
    /// Raw radio-group value: `"Vrai"`, `"Faux"`, `"1"`..`"4"`, or
    /// `"Je ne sais pas"`.
    pub selection: Option<String>,
    pub reponse_vf: Option<bool>,
    pub reponse_choisie_qcm: Option<i16>,
    pub justification: Option<String>,
}

/// The encoded payload written by [`ReponseRepo::upsert`].
///
/// [`ReponseRepo::upsert`]: crate::repositories::ReponseRepo::upsert
#[derive(Debug, Clone)]
pub struct UpsertReponse {
    pub activite_code: String,
    pub affirmation_id: DbId,
    pub etudiant_id: DbId,
    pub reponse_vf: Option<bool>,
    pub reponse_choisie_qcm: Option<i16>,
    pub justification: Option<String>,
}
