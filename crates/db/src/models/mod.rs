//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) for patches

pub mod activite;
pub mod affirmation;
pub mod categorie;
pub mod debrief;
pub mod reponse;
pub mod session;
pub mod user;
