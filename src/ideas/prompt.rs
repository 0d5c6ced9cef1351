//! Prompt construction for the chat-completion call.

use crate::models::{QuestionnaireAnswers, TrendItem};

/// System and user halves of the completion request.
#[derive(Debug, Clone)]
pub struct Prompt {
    pub system: String,
    pub user: String,
}

/// Build the two-part prompt: a system instruction pinning the output
/// contract, and a user payload carrying the normalized answers plus the
/// fetched trend snippets.
///
/// The schema block quotes the frontend TypeScript types so the model emits
/// exactly the wire shape the UI consumes.
pub fn build_prompt(answers: &QuestionnaireAnswers, trends: &[TrendItem]) -> Prompt {
    let system = [
        "You are a sharp venture analyst. You evaluate founder questionnaires alongside recent tech and market signals to craft one best-fit startup idea.",
        "Constraints:",
        "- Output JSON ONLY with the exact schema below. Do not include backticks or explanations.",
        "- Be concise and pragmatic. Use clear, specific language.",
        "- Ensure confidenceScore is an integer between 0 and 100.",
        "- Choose an appropriate riskLevel from: low | medium | high.",
        "",
        "TypeScript shape to output strictly:",
        "interface BusinessIdea { title: string; summary: string; confidenceScore: number; marketSize: string; estimatedRevenue: string; implementationTime: string; riskLevel: \"low\" | \"medium\" | \"high\"; category: string }",
        "interface TrendsItem { industry: string; title: string; url: string; points: number; created_at: string }",
        "type ResponseShape = { businessIdea: BusinessIdea; trends: TrendsItem[] }",
    ]
    .join("\n");

    let user = serde_json::json!({
        "questionnaire": answers,
        "trend_snippets": trends,
        "instruction": "Propose exactly one businessIdea aligned to the questionnaire and supported by the trend_snippets. Output JSON with keys: businessIdea, trends (reuse or refine given snippets).",
    })
    .to_string();

    Prompt { system, user }
}
