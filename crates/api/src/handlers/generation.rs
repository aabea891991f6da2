//! Handler for the affirmation generation endpoint (encadrant-only).
//!
//! Generates plausible-but-false affirmations for a question via the
//! Gemini API. Prompt construction and response parsing live in
//! [`troublemaker_core::generation`]; the HTTP call is in
//! [`crate::generation`].

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use troublemaker_core::generation::{build_prompt, parse_generated, GeneratedAffirmation};

use crate::error::{AppError, AppResult};
use crate::generation::GeminiClient;
use crate::middleware::rbac::RequireEncadrant;
use crate::state::AppState;

/// Default number of affirmations to generate when unspecified.
const DEFAULT_COUNT: usize = 3;

/// Upper bound on a single generation request.
const MAX_COUNT: usize = 10;

/// Request body for `POST /api/generation/affirmations`.
#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    pub question: String,
    pub number: Option<usize>,
}

/// Response: the generated affirmations, all false by construction.
#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub affirmations: Vec<GeneratedAffirmation>,
}

/// POST /api/generation/affirmations
///
/// 503 when no `GEMINI_API_KEY` is configured.
pub async fn generate_affirmations(
    State(state): State<AppState>,
    RequireEncadrant(_user): RequireEncadrant,
    Json(input): Json<GenerateRequest>,
) -> AppResult<Json<GenerateResponse>> {
    let question = input.question.trim();
    if question.is_empty() {
        return Err(AppError::BadRequest("A question is required".into()));
    }

    let count = input.number.unwrap_or(DEFAULT_COUNT);
    if count == 0 || count > MAX_COUNT {
        return Err(AppError::BadRequest(format!(
            "'number' must be between 1 and {MAX_COUNT}"
        )));
    }

    let api_key = state.config.gemini_api_key.as_deref().ok_or_else(|| {
        AppError::ServiceUnavailable("Affirmation generation is not configured".into())
    })?;

    let prompt = build_prompt(question, count);
    let raw = GeminiClient::new(&state.http, api_key)
        .generate(&prompt)
        .await?;

    let affirmations = parse_generated(&raw)?;
    tracing::info!(
        count = affirmations.len(),
        "Generated affirmations for question"
    );

    Ok(Json(GenerateResponse { affirmations }))
}
