//! Well-known role name constants.
//!
//! These must match the CHECK constraint on `users.role` in
//! `0001_create_users.sql`.

pub const ROLE_ETUDIANT: &str = "etudiant";
pub const ROLE_ENCADRANT: &str = "encadrant";
