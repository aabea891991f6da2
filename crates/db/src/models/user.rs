//! User entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use troublemaker_core::types::{DbId, Timestamp};

/// Full user row from the `users` table.
///
/// Contains the password hash -- NEVER serialize this to API responses
/// directly. Use [`UserInfo`] or [`EtudiantInfo`] for external-facing output.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub username: String,
    pub email: String,
    /// `None` for students, who authenticate via activity code.
    pub password_hash: Option<String>,
    pub first_name: String,
    pub last_name: String,
    /// `"etudiant"` or `"encadrant"`.
    pub role: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl User {
    /// Display name: "First Last", falling back to username, then email.
    pub fn nom_complet(&self) -> String {
        match (self.first_name.is_empty(), self.last_name.is_empty()) {
            (false, false) => format!("{} {}", self.first_name, self.last_name),
            (false, true) => self.first_name.clone(),
            (true, false) => self.last_name.clone(),
            (true, true) if !self.username.is_empty() => self.username.clone(),
            _ => self.email.clone(),
        }
    }
}

/// Safe user representation for API responses (no password hash).
#[derive(Debug, Clone, Serialize)]
pub struct UserInfo {
    pub id: DbId,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: String,
}

impl From<&User> for UserInfo {
    fn from(user: &User) -> Self {
        UserInfo {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            role: user.role.clone(),
        }
    }
}

/// Compact student listing used inside activity detail responses.
#[derive(Debug, Clone, Serialize)]
pub struct EtudiantInfo {
    pub id: DbId,
    pub email: String,
    pub nom_complet: String,
}

impl From<&User> for EtudiantInfo {
    fn from(user: &User) -> Self {
        EtudiantInfo {
            id: user.id,
            email: user.email.clone(),
            nom_complet: user.nom_complet(),
        }
    }
}

/// DTO for creating a new user.
#[derive(Debug, Deserialize)]
pub struct CreateUser {
    pub username: String,
    pub email: String,
    pub password_hash: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: String,
}
