//! HTTP client for the Gemini generateContent API.
//!
//! Only the text of the first candidate is extracted here; turning that
//! text into affirmations is pure logic in
//! [`troublemaker_core::generation`].

use serde_json::json;

use crate::error::AppError;

/// Gemini model used for affirmation generation.
const GEMINI_MODEL: &str = "gemini-1.5-flash";

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Thin client over the Gemini REST API.
pub struct GeminiClient<'a> {
    http: &'a reqwest::Client,
    api_key: &'a str,
}

impl<'a> GeminiClient<'a> {
    pub fn new(http: &'a reqwest::Client, api_key: &'a str) -> Self {
        GeminiClient { http, api_key }
    }

    /// Send a prompt and return the raw text of the first candidate.
    pub async fn generate(&self, prompt: &str) -> Result<String, AppError> {
        let url = format!(
            "{GEMINI_BASE_URL}/models/{GEMINI_MODEL}:generateContent?key={}",
            self.api_key
        );

        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
            "generationConfig": {
                "temperature": 0.9,
                "topP": 0.95,
                "topK": 40,
                "maxOutputTokens": 8192,
            },
        });

        let response = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::ServiceUnavailable(format!("Gemini request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            tracing::error!(%status, %detail, "Gemini API returned an error");
            return Err(AppError::ServiceUnavailable(format!(
                "Gemini API returned {status}"
            )));
        }

        let payload: serde_json::Value = response
            .json()
            .await
            .map_err(|e| AppError::InternalError(format!("Invalid Gemini response: {e}")))?;

        payload["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .map(String::from)
            .ok_or_else(|| {
                AppError::InternalError("Gemini response contained no candidate text".into())
            })
    }
}
