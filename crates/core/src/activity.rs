//! Activity code and configuration validation.

use crate::error::CoreError;

/* --------------------------------------------------------------------------
Constants
-------------------------------------------------------------------------- */

/// Minimum length of an activity code.
pub const CODE_MIN_LENGTH: usize = 3;

/// Maximum length of an activity code.
pub const CODE_MAX_LENGTH: usize = 8;

/// Activity targets students enrolled at the institution.
pub const TYPE_APPRENANT_INTERNE: &str = "interne";

/// Activity targets external learners.
pub const TYPE_APPRENANT_EXTERNE: &str = "externe";

/// All valid learner type values.
pub const VALID_TYPES_APPRENANT: &[&str] = &[TYPE_APPRENANT_INTERNE, TYPE_APPRENANT_EXTERNE];

/* --------------------------------------------------------------------------
Validation functions
-------------------------------------------------------------------------- */

/// Upper-case and validate an activity code.
///
/// Codes are 3-8 characters, A-Z and 0-9 only. Input is upper-cased before
/// validation so clients may submit codes in any case.
pub fn normalize_code(raw: &str) -> Result<String, CoreError> {
    let code = raw.trim().to_ascii_uppercase();

    if code.len() < CODE_MIN_LENGTH || code.len() > CODE_MAX_LENGTH {
        return Err(CoreError::Validation(format!(
            "Invalid activity code '{code}'. Must be {CODE_MIN_LENGTH}-{CODE_MAX_LENGTH} characters"
        )));
    }

    if !code.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()) {
        return Err(CoreError::Validation(format!(
            "Invalid activity code '{code}'. Only A-Z and 0-9 are allowed"
        )));
    }

    Ok(code)
}

/// Validate that a learner type string is one of the accepted values.
pub fn validate_type_apprenant(value: &str) -> Result<(), CoreError> {
    if VALID_TYPES_APPRENANT.contains(&value) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid learner type '{value}'. Must be one of: {}",
            VALID_TYPES_APPRENANT.join(", ")
        )))
    }
}

/* --------------------------------------------------------------------------
Tests
-------------------------------------------------------------------------- */
