//! Response format reconciliation.
//!
//! An affirmation is authored once with a fixed *native* response format
//! (binary true/false or four-level graded certainty), but an activity
//! presents every affirmation it contains in the activity's own *required*
//! format. The [`encode`] function translates a student's selection from
//! the presented vocabulary into the affirmation's native storage format;
//! [`decode`] reconstructs the display label for confirmation and debrief
//! screens.
//!
//! The 4-to-2 direction is deliberately lossy: both "true-leaning" levels
//! collapse into `true` and both "false-leaning" levels into `false`, and
//! the Toujours/Généralement distinction is not recoverable.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/* --------------------------------------------------------------------------
Display labels
-------------------------------------------------------------------------- */

pub const LABEL_VRAI: &str = "Vrai";
pub const LABEL_FAUX: &str = "Faux";
pub const LABEL_TOUJOURS_VRAI: &str = "Toujours vrai";
pub const LABEL_GENERALEMENT_VRAI: &str = "Généralement vrai";
pub const LABEL_GENERALEMENT_FAUX: &str = "Généralement faux";
pub const LABEL_TOUJOURS_FAUX: &str = "Toujours faux";
pub const LABEL_JE_NE_SAIS_PAS: &str = "Je ne sais pas";

/// Shown when a response has no stored answer at all.
pub const LABEL_NON_REPONDU: &str = "Non répondu";

/// Soft-failure sentinel for stored data that matches no known combination.
/// Returned instead of an error because the decoder only feeds read-only
/// display paths.
pub const LABEL_FORMAT_INCONNU: &str = "Format inconnu";

/* --------------------------------------------------------------------------
Types
-------------------------------------------------------------------------- */

/// Errors for malformed reconciliation input. These are precondition
/// violations, surfaced explicitly rather than silently coerced.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReconcileError {
    #[error("Invalid cardinality {0}: must be 2 or 4")]
    InvalidCardinality(i16),

    #[error("Invalid selection '{selection}' for a {presented}-option prompt")]
    InvalidSelection { selection: String, presented: i16 },

    #[error("Both reponse_vf and reponse_choisie_qcm are set")]
    ConflictingFields,

    #[error("Stored field does not match the affirmation format ({0} options)")]
    FieldFormatMismatch(i16),
}

impl From<ReconcileError> for CoreError {
    fn from(err: ReconcileError) -> Self {
        CoreError::Validation(err.to_string())
    }
}

/// Number of selectable response options: 2 (Vrai/Faux) or 4 (graded
/// certainty). Fixed at authoring time for affirmations and at creation
/// time for activities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    Binary,
    Graded,
}

impl Cardinality {
    /// Parse the wire/database option count. Anything outside {2, 4} is an
    /// error, never a default.
    pub fn from_count(count: i16) -> Result<Self, ReconcileError> {
        match count {
            2 => Ok(Cardinality::Binary),
            4 => Ok(Cardinality::Graded),
            other => Err(ReconcileError::InvalidCardinality(other)),
        }
    }

    /// The option count as stored in `nbr_reponses` / `type_affirmation_requise`.
    pub fn count(self) -> i16 {
        match self {
            Cardinality::Binary => 2,
            Cardinality::Graded => 4,
        }
    }
}

/// One of the four graded certainty levels, in numeric order from
/// "Toujours vrai" (1) to "Toujours faux" (4).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    ToujoursVrai,
    GeneralementVrai,
    GeneralementFaux,
    ToujoursFaux,
}

impl Level {
    /// Parse the 1-based index used on the wire (`reponse_choisie_qcm`).
    pub fn from_index(index: i16) -> Result<Self, ReconcileError> {
        match index {
            1 => Ok(Level::ToujoursVrai),
            2 => Ok(Level::GeneralementVrai),
            3 => Ok(Level::GeneralementFaux),
            4 => Ok(Level::ToujoursFaux),
            other => Err(ReconcileError::InvalidSelection {
                selection: other.to_string(),
                presented: 4,
            }),
        }
    }

    /// The 1-based index stored in `reponse_choisie_qcm`.
    pub fn index(self) -> i16 {
        match self {
            Level::ToujoursVrai => 1,
            Level::GeneralementVrai => 2,
            Level::GeneralementFaux => 3,
            Level::ToujoursFaux => 4,
        }
    }

    /// Levels 1 and 2 lean true; 3 and 4 lean false.
    pub fn leans_true(self) -> bool {
        matches!(self, Level::ToujoursVrai | Level::GeneralementVrai)
    }

    pub fn label(self) -> &'static str {
        match self {
            Level::ToujoursVrai => LABEL_TOUJOURS_VRAI,
            Level::GeneralementVrai => LABEL_GENERALEMENT_VRAI,
            Level::GeneralementFaux => LABEL_GENERALEMENT_FAUX,
            Level::ToujoursFaux => LABEL_TOUJOURS_FAUX,
        }
    }
}

/// A student's selection, expressed in the vocabulary the activity
/// presented: "Vrai"/"Faux" for a binary prompt, "1".."4" for a graded
/// prompt, "Je ne sais pas" for either.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    Vrai,
    Faux,
    Niveau(Level),
    JeNeSaisPas,
}

impl Selection {
    /// Parse the raw radio-group value submitted by the client, validated
    /// against the cardinality the prompt actually offered.
    pub fn parse(raw: &str, presented: Cardinality) -> Result<Self, ReconcileError> {
        if raw == LABEL_JE_NE_SAIS_PAS {
            return Ok(Selection::JeNeSaisPas);
        }

        let invalid = || ReconcileError::InvalidSelection {
            selection: raw.to_string(),
            presented: presented.count(),
        };

        match presented {
            Cardinality::Binary => match raw {
                LABEL_VRAI => Ok(Selection::Vrai),
                LABEL_FAUX => Ok(Selection::Faux),
                _ => Err(invalid()),
            },
            Cardinality::Graded => {
                let index: i16 = raw.parse().map_err(|_| invalid())?;
                Level::from_index(index).map(Selection::Niveau).map_err(|_| invalid())
            }
        }
    }

    /// The label a confirmation screen would show for this selection, in
    /// the vocabulary it was made in.
    pub fn label(self) -> &'static str {
        match self {
            Selection::Vrai => LABEL_VRAI,
            Selection::Faux => LABEL_FAUX,
            Selection::Niveau(level) => level.label(),
            Selection::JeNeSaisPas => LABEL_JE_NE_SAIS_PAS,
        }
    }
}

/// The stored form of an answer, always in the affirmation's native
/// cardinality. An unanswered statement is represented as `None` at the
/// call sites, not as a variant here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoredAnswer {
    Binary(bool),
    Graded(Level),
}

/// The `reponse_vf` / `reponse_choisie_qcm` pair as exchanged with clients
/// and stored in the `reponses` table. At most one field is ever set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseFields {
    pub reponse_vf: Option<bool>,
    pub reponse_choisie_qcm: Option<i16>,
}

impl ResponseFields {
    /// Both fields null: the "Je ne sais pas" / unanswered payload.
    pub fn empty() -> Self {
        ResponseFields {
            reponse_vf: None,
            reponse_choisie_qcm: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.reponse_vf.is_none() && self.reponse_choisie_qcm.is_none()
    }

    /// Build the wire pair from an encoded answer.
    pub fn from_answer(answer: Option<StoredAnswer>) -> Self {
        match answer {
            None => ResponseFields::empty(),
            Some(StoredAnswer::Binary(vf)) => ResponseFields {
                reponse_vf: Some(vf),
                reponse_choisie_qcm: None,
            },
            Some(StoredAnswer::Graded(level)) => ResponseFields {
                reponse_vf: None,
                reponse_choisie_qcm: Some(level.index()),
            },
        }
    }

    /// Strict conversion back to the tagged form, rejecting payloads whose
    /// populated field does not match the affirmation's native cardinality.
    /// Used on the write path; the read path goes through [`decode`], which
    /// never fails.
    pub fn to_answer(&self, native: Cardinality) -> Result<Option<StoredAnswer>, ReconcileError> {
        match (self.reponse_vf, self.reponse_choisie_qcm) {
            (None, None) => Ok(None),
            (Some(_), Some(_)) => Err(ReconcileError::ConflictingFields),
            (Some(vf), None) => match native {
                Cardinality::Binary => Ok(Some(StoredAnswer::Binary(vf))),
                Cardinality::Graded => Err(ReconcileError::FieldFormatMismatch(native.count())),
            },
            (None, Some(index)) => match native {
                Cardinality::Graded => Ok(Some(StoredAnswer::Graded(Level::from_index(index)?))),
                Cardinality::Binary => Err(ReconcileError::FieldFormatMismatch(native.count())),
            },
        }
    }
}

/* --------------------------------------------------------------------------
Encoder / decoder
-------------------------------------------------------------------------- */

/// Translate a selection made in the activity's `required` vocabulary into
/// the affirmation's `native` storage format.
///
/// "Je ne sais pas" always encodes to `None`. A selection that does not
/// belong to the required vocabulary (e.g. "Vrai" under a graded prompt)
/// is an [`ReconcileError::InvalidSelection`].
pub fn encode(
    selection: Selection,
    required: Cardinality,
    native: Cardinality,
) -> Result<Option<StoredAnswer>, ReconcileError> {
    let invalid = || ReconcileError::InvalidSelection {
        selection: selection.label().to_string(),
        presented: required.count(),
    };

    let answer = match selection {
        Selection::JeNeSaisPas => return Ok(None),

        Selection::Vrai | Selection::Faux => {
            if required != Cardinality::Binary {
                return Err(invalid());
            }
            let vrai = selection == Selection::Vrai;
            match native {
                Cardinality::Binary => StoredAnswer::Binary(vrai),
                // A binary answer against a graded affirmation pins the
                // extreme level.
                Cardinality::Graded => StoredAnswer::Graded(if vrai {
                    Level::ToujoursVrai
                } else {
                    Level::ToujoursFaux
                }),
            }
        }

        Selection::Niveau(level) => {
            if required != Cardinality::Graded {
                return Err(invalid());
            }
            match native {
                Cardinality::Graded => StoredAnswer::Graded(level),
                // Lossy: the Toujours/Généralement distinction is dropped.
                Cardinality::Binary => StoredAnswer::Binary(level.leans_true()),
            }
        }
    };

    Ok(Some(answer))
}

/// Reconstruct the display label for a stored response, rendered in the
/// activity's `required` vocabulary.
///
/// Never fails: an empty payload is [`LABEL_NON_REPONDU`] and any stored
/// data that matches no known combination is [`LABEL_FORMAT_INCONNU`].
pub fn decode(fields: &ResponseFields, native: Cardinality, required: Cardinality) -> &'static str {
    if fields.is_empty() {
        return LABEL_NON_REPONDU;
    }

    match native {
        Cardinality::Binary => match fields.reponse_vf {
            Some(vrai) => match required {
                Cardinality::Binary => {
                    if vrai {
                        LABEL_VRAI
                    } else {
                        LABEL_FAUX
                    }
                }
                Cardinality::Graded => {
                    if vrai {
                        LABEL_TOUJOURS_VRAI
                    } else {
                        LABEL_TOUJOURS_FAUX
                    }
                }
            },
            // Stored as QCM against a binary affirmation.
            None => LABEL_FORMAT_INCONNU,
        },
        Cardinality::Graded => match fields.reponse_choisie_qcm {
            Some(index) => match Level::from_index(index) {
                Ok(level) => match required {
                    Cardinality::Graded => level.label(),
                    Cardinality::Binary => {
                        if level.leans_true() {
                            LABEL_VRAI
                        } else {
                            LABEL_FAUX
                        }
                    }
                },
                Err(_) => LABEL_FORMAT_INCONNU,
            },
            // Stored as Vrai/Faux against a graded affirmation.
            None => LABEL_FORMAT_INCONNU,
        },
    }
}

/* --------------------------------------------------------------------------
Tests
-------------------------------------------------------------------------- */
