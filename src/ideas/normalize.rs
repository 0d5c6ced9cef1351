//! Input normalization for the questionnaire payload.
//!
//! Lenient coercion over validation errors: malformed client input must
//! never fail the request before it reaches the synthesis stage.

use crate::ideas::coerce::sanitize_string;
use crate::models::QuestionnaireAnswers;
use serde_json::Value;

/// Maximum number of industries carried into trend fetching.
pub const MAX_INDUSTRIES: usize = 3;

/// Normalize a raw `answers` object into a canonical `QuestionnaireAnswers`.
///
/// Total function: absent or wrong-typed fields silently become empty
/// values. Normalizing an already-normalized payload is a no-op.
pub fn normalize_answers(raw: &Value) -> QuestionnaireAnswers {
    QuestionnaireAnswers {
        industry: string_list(&raw["industry"], Some(MAX_INDUSTRIES)),
        experience: sanitize_string(&raw["experience"]),
        budget: sanitize_string(&raw["budget"]),
        timeline: sanitize_string(&raw["timeline"]),
        market_preference: sanitize_string(&raw["market_preference"]),
        risk_tolerance: stringify_risk_tolerance(&raw["risk_tolerance"]),
        strengths: string_list(&raw["strengths"], None),
        goals: sanitize_string(&raw["goals"]),
    }
}

/// `risk_tolerance` may arrive as a number or a string; both normalize to a
/// trimmed string representation.
fn stringify_risk_tolerance(value: &Value) -> String {
    match value {
        Value::Number(n) => n.to_string(),
        other => sanitize_string(other),
    }
}

/// Collect trimmed non-empty strings from a JSON array, optionally capped.
fn string_list(value: &Value, cap: Option<usize>) -> Vec<String> {
    let Some(array) = value.as_array() else {
        return Vec::new();
    };

    let mut out: Vec<String> = array
        .iter()
        .map(sanitize_string)
        .filter(|s| !s.is_empty())
        .collect();
    if let Some(cap) = cap {
        out.truncate(cap);
    }
    out
}
