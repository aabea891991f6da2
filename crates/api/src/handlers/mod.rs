//! HTTP handlers, one module per resource.

pub mod activite;
pub mod affirmation;
pub mod auth;
pub mod categorie;
pub mod debrief;
pub mod etudiant;
pub mod generation;
pub mod reponse;
