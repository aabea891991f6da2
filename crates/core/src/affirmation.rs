//! Affirmation authoring consistency rules.
//!
//! Every affirmation carries an intrinsic truth value (`is_correct_vf`),
//! regardless of its response format; graded affirmations additionally name
//! the correct certainty level. These rules are enforced both at creation
//! and on update, since the native format never changes after authoring.

use crate::error::CoreError;
use crate::reconciliation::{Cardinality, Level};

/// Validate an affirmation's ground-truth fields against its native format.
///
/// - `is_correct_vf` is required for both formats.
/// - `reponse_correcte_qcm` is required for graded affirmations and must be
///   a valid level index; it must be absent for binary ones.
pub fn validate_ground_truth(
    native: Cardinality,
    is_correct_vf: Option<bool>,
    reponse_correcte_qcm: Option<i16>,
) -> Result<(), CoreError> {
    if is_correct_vf.is_none() {
        return Err(CoreError::Validation(
            "is_correct_vf is required: every affirmation has a truth value".to_string(),
        ));
    }

    match native {
        Cardinality::Binary => {
            if reponse_correcte_qcm.is_some() {
                return Err(CoreError::Validation(
                    "reponse_correcte_qcm must not be set for a Vrai/Faux affirmation".to_string(),
                ));
            }
        }
        Cardinality::Graded => match reponse_correcte_qcm {
            None => {
                return Err(CoreError::Validation(
                    "reponse_correcte_qcm is required for a graded affirmation".to_string(),
                ));
            }
            Some(index) => {
                Level::from_index(index)?;
            }
        },
    }

    Ok(())
}
