//! Domain logic for the TroubleMaker quiz platform.
//!
//! The central piece is [`reconciliation`]: the rules that let an
//! affirmation authored in one response format (binary true/false or
//! four-level graded certainty) be presented and interpreted consistently
//! inside an activity configured for the other format. Everything else is
//! supporting vocabulary: validation rules for affirmations and activity
//! codes, role constants, and the helpers used by the affirmation
//! generation flow.

pub mod activity;
pub mod affirmation;
pub mod error;
pub mod generation;
pub mod reconciliation;
pub mod roles;
pub mod types;
