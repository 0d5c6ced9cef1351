//! The generate-ideas endpoint: normalize answers, gather trends, synthesize.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Response;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::ideas::{gather_trends, normalize_answers, IdeaSynthesizer, SynthesisError};
use crate::server::state::ServerAppState;

use super::json_response;

const INVALID_BODY_ERROR: &str = "Invalid JSON body. Expecting { answers: QuestionnaireAnswers }.";
const MISSING_ANSWERS_ERROR: &str = "Bad Request: Missing 'answers' object in request body.";

/// POST /api/generate-ideas
///
/// The body is read as raw bytes so malformed JSON maps to the 400 payload
/// instead of an extractor rejection. Trend failures degrade silently;
/// synthesis failures surface as 500s with diagnostic detail.
pub async fn generate_ideas_handler(
    State(state): State<ServerAppState>,
    body: Bytes,
) -> Response {
    let request_id = Uuid::new_v4();

    let body: Value = match serde_json::from_slice(&body) {
        Ok(body) => body,
        Err(e) => {
            log::debug!("[{}] Rejected unparsable body: {}", request_id, e);
            return json_response(
                StatusCode::BAD_REQUEST,
                &json!({ "error": INVALID_BODY_ERROR }),
            );
        }
    };

    let answers_raw = match body.get("answers").filter(|a| a.is_object()) {
        Some(answers) => answers,
        None => {
            return json_response(
                StatusCode::BAD_REQUEST,
                &json!({ "error": MISSING_ANSWERS_ERROR }),
            );
        }
    };

    let answers = normalize_answers(answers_raw);
    log::info!(
        "[{}] Generating idea for industries {:?} ({} mode)",
        request_id,
        answers.industry,
        if state.config.has_credential() {
            "llm"
        } else {
            "fallback"
        }
    );

    let trends = gather_trends(&state.http, &state.config.search_url, &answers.industry).await;
    log::debug!("[{}] Gathered {} trend items", request_id, trends.len());

    let synthesizer = IdeaSynthesizer::new(state.config.clone(), state.http.clone());
    match synthesizer.synthesize(&answers, &trends).await {
        Ok(shape) => match serde_json::to_value(&shape) {
            Ok(body) => json_response(StatusCode::OK, &body),
            Err(e) => {
                log::error!("[{}] Failed to serialize response: {}", request_id, e);
                json_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    &json!({ "error": "Unexpected server error.", "details": e.to_string() }),
                )
            }
        },
        Err(err) => {
            log::warn!("[{}] Synthesis failed: {}", request_id, err);
            json_response(StatusCode::INTERNAL_SERVER_ERROR, &synthesis_error_body(&err))
        }
    }
}

/// Map each synthesis failure to its wire payload.
fn synthesis_error_body(err: &SynthesisError) -> Value {
    match err {
        SynthesisError::Upstream { status, details } => json!({
            "error": "OpenAI API request failed.",
            "status": status,
            "details": details,
        }),
        SynthesisError::EmptyResponse => json!({
            "error": "OpenAI returned an empty response.",
        }),
        SynthesisError::Unparseable { raw } => json!({
            "error": "Failed to parse model response as JSON.",
            "raw": raw,
        }),
        SynthesisError::Transport(e) => json!({
            "error": "Unexpected server error.",
            "details": e.to_string(),
        }),
    }
}
