//! Affirmation generation helpers.
//!
//! The generation flow asks an LLM for plausible-but-false affirmations and
//! gets back free text that *should* contain a JSON object. Models wrap the
//! JSON in markdown fences or surround it with prose often enough that the
//! extraction needs a fallback. Everything here is pure; the HTTP call to
//! the model lives in the API crate.

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// One generated affirmation as returned to the client.
///
/// `is_correct_vf` is always `false`: the generation flow only produces
/// false statements, whatever the model claims.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedAffirmation {
    pub affirmation: String,
    #[serde(default)]
    pub is_correct_vf: bool,
    #[serde(default)]
    pub explication: String,
}

/// Build the French generation prompt for `count` false affirmations
/// answering `question`.
pub fn build_prompt(question: &str, count: usize) -> String {
    format!(
        "Vous êtes un expert en connaissances médicales. Produisez exactement {count} \
         affirmations médicales fausses mais plausibles qui répondent directement à la \
         question : \"{question}\".\n\
         \n\
         Chaque affirmation doit être difficile à juger comme fausse au premier abord, \
         paraître scientifiquement plausible, et rester en lien direct avec la question.\n\
         \n\
         Réponds uniquement avec un objet JSON de la forme suivante, sans texte avant ou après :\n\
         {{\n\
           \"affirmations\": [\n\
             {{\n\
               \"affirmation\": \"texte de l'affirmation fausse\",\n\
               \"is_correct_vf\": false,\n\
               \"explication\": \"explication détaillée de pourquoi cette affirmation est fausse\"\n\
             }}\n\
           ]\n\
         }}"
    )
}

/// Extract the JSON value embedded in a model response.
///
/// Strips markdown code fences first; if the remainder still fails to
/// parse, falls back to the first `{...}` or `[...]` block in the text.
pub fn extract_json(raw: &str) -> Option<serde_json::Value> {
    let mut cleaned = raw.trim();
    cleaned = cleaned.strip_prefix("```json").unwrap_or(cleaned);
    cleaned = cleaned.strip_prefix("```").unwrap_or(cleaned);
    cleaned = cleaned.strip_suffix("```").unwrap_or(cleaned);
    let cleaned = cleaned.trim();

    if let Ok(value) = serde_json::from_str(cleaned) {
        return Some(value);
    }

    // Fallback: greedy match so nested braces inside the block are kept.
    let block = Regex::new(r"(?s)(\{.*\}|\[.*\])").expect("valid regex");
    let candidate = block.find(cleaned)?;
    serde_json::from_str(candidate.as_str()).ok()
}

/// Parse a model response into generated affirmations.
///
/// Expects a JSON object with an `affirmations` array of at least one item;
/// `is_correct_vf` is forced to `false` on every item regardless of what
/// the model produced.
pub fn parse_generated(raw: &str) -> Result<Vec<GeneratedAffirmation>, CoreError> {
    let value = extract_json(raw).ok_or_else(|| {
        CoreError::Internal("Model response did not contain parseable JSON".to_string())
    })?;

    let items = value
        .get("affirmations")
        .and_then(|v| v.as_array())
        .ok_or_else(|| {
            CoreError::Internal("Model response is missing the 'affirmations' array".to_string())
        })?;

    if items.is_empty() {
        return Err(CoreError::Internal(
            "Model response contained no affirmations".to_string(),
        ));
    }

    let mut affirmations = Vec::with_capacity(items.len());
    for item in items {
        let mut parsed: GeneratedAffirmation =
            serde_json::from_value(item.clone()).map_err(|e| {
                CoreError::Internal(format!("Malformed generated affirmation: {e}"))
            })?;
        parsed.is_correct_vf = false;
        affirmations.push(parsed);
    }

    Ok(affirmations)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLAIN: &str = r#"{"affirmations": [
        {"affirmation": "Le foie produit l'insuline.", "is_correct_vf": false,
         "explication": "L'insuline est produite par le pancréas."}
    ]}"#;

    #[test]
    fn test_extract_plain_json() {
        let value = extract_json(PLAIN).unwrap();
        assert!(value.get("affirmations").is_some());
    }

    #[test]
    fn test_extract_fenced_json() {
        let fenced = format!("```json\n{PLAIN}\n```");
        let value = extract_json(&fenced).unwrap();
        assert_eq!(value["affirmations"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_extract_json_embedded_in_prose() {
        let noisy = format!("Voici les affirmations demandées :\n{PLAIN}\nBonne journée !");
        assert!(extract_json(&noisy).is_some());
    }

    #[test]
    fn test_extract_rejects_garbage() {
        assert!(extract_json("Désolé, je ne peux pas répondre.").is_none());
        assert!(extract_json("").is_none());
    }

    #[test]
    fn test_parse_forces_is_correct_vf_false() {
        // The model claims one affirmation is true; the parser overrides it.
        let raw = r#"{"affirmations": [
            {"affirmation": "A", "is_correct_vf": true, "explication": "x"},
            {"affirmation": "B", "is_correct_vf": false, "explication": "y"}
        ]}"#;
        let parsed = parse_generated(raw).unwrap();
        assert_eq!(parsed.len(), 2);
        assert!(parsed.iter().all(|a| !a.is_correct_vf));
    }

    #[test]
    fn test_parse_missing_array_fails() {
        assert!(parse_generated(r#"{"statements": []}"#).is_err());
        assert!(parse_generated(r#"{"affirmations": []}"#).is_err());
        assert!(parse_generated("not json at all").is_err());
    }

    #[test]
    fn test_build_prompt_mentions_question_and_count() {
        let prompt = build_prompt("Quels sont les effets de la caféine ?", 3);
        assert!(prompt.contains("exactement 3"));
        assert!(prompt.contains("Quels sont les effets de la caféine ?"));
        assert!(prompt.contains("affirmations"));
    }
}
