//! Idea synthesis: chat-completion call with robust recovery, or a
//! deterministic offline fallback when no credential is configured.

use crate::config::AppConfig;
use crate::ideas::coerce::{coerce_business_idea, coerce_trends, sanitize_string};
use crate::ideas::error::SynthesisError;
use crate::ideas::extract::recover_json_object;
use crate::ideas::prompt::build_prompt;
use crate::models::{BusinessIdea, QuestionnaireAnswers, ResponseShape, RiskLevel, TrendItem};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

/// Budget for the completion call; the request is cancelled when it elapses.
const COMPLETION_TIMEOUT: Duration = Duration::from_secs(30);

const FALLBACK_MARKET_SIZE: &str = "$500M+ TAM (estimated)";
const FALLBACK_REVENUE: &str = "$50k-$200k in Year 1 (range)";
const FALLBACK_TIMELINE: &str = "3-6 months";
const FALLBACK_GOAL: &str = "grow a sustainable business";
const FALLBACK_HIGHLIGHT: &str = "emerging demand signals";

/// Per-request synthesizer. The mode switch is decided once, by credential
/// presence in the injected configuration; the pipeline never reads ambient
/// process environment.
pub struct IdeaSynthesizer {
    config: Arc<AppConfig>,
    client: reqwest::Client,
}

impl IdeaSynthesizer {
    pub fn new(config: Arc<AppConfig>, client: reqwest::Client) -> Self {
        Self { config, client }
    }

    /// Produce the response payload for one request.
    ///
    /// Without a credential this is pure and offline. With one, upstream
    /// failures are surfaced as `SynthesisError` rather than degraded: the
    /// idea is the deliverable, unlike trend enrichment.
    pub async fn synthesize(
        &self,
        answers: &QuestionnaireAnswers,
        trends: &[TrendItem],
    ) -> Result<ResponseShape, SynthesisError> {
        match self.config.api_key.as_deref() {
            None => Ok(ResponseShape {
                business_idea: fallback_idea(answers, trends),
                trends: trends.to_vec(),
            }),
            Some(api_key) => self.synthesize_with_model(api_key, answers, trends).await,
        }
    }

    async fn synthesize_with_model(
        &self,
        api_key: &str,
        answers: &QuestionnaireAnswers,
        trends: &[TrendItem],
    ) -> Result<ResponseShape, SynthesisError> {
        let prompt = build_prompt(answers, trends);

        let payload = serde_json::json!({
            "model": self.config.model,
            "temperature": self.config.temperature,
            "messages": [
                { "role": "system", "content": prompt.system },
                { "role": "user", "content": prompt.user },
            ],
        });

        let response = self
            .client
            .post(&self.config.completions_url)
            .bearer_auth(api_key)
            .json(&payload)
            .timeout(COMPLETION_TIMEOUT)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let details = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(SynthesisError::Upstream { status, details });
        }

        let data: Value = response.json().await.unwrap_or(Value::Null);
        let raw_text = sanitize_string(&data["choices"][0]["message"]["content"]);
        if raw_text.is_empty() {
            return Err(SynthesisError::EmptyResponse);
        }

        recover_response_shape(&raw_text, trends)
            .ok_or(SynthesisError::Unparseable { raw: raw_text })
    }
}

/// Recover the wire payload from model text.
///
/// Strict parse first, balanced-object extraction second; the parsed value
/// then passes through the same coercion boundary the fallback path uses, so
/// model omissions never leak malformed fields. A model that returned zero
/// valid trend records gets the originally fetched list substituted.
pub fn recover_response_shape(
    raw_text: &str,
    fallback_trends: &[TrendItem],
) -> Option<ResponseShape> {
    let parsed = recover_json_object(raw_text)?;

    let business_idea = coerce_business_idea(&parsed["businessIdea"]);
    let model_trends = coerce_trends(&parsed["trends"]);

    Some(ResponseShape {
        business_idea,
        trends: if model_trends.is_empty() {
            fallback_trends.to_vec()
        } else {
            model_trends
        },
    })
}

/// Deterministic offline idea derivation.
///
/// Pure function of the normalized answers and fetched trends: the product
/// stays usable with no completion credential configured.
pub fn fallback_idea(answers: &QuestionnaireAnswers, trends: &[TrendItem]) -> BusinessIdea {
    let industry = answers
        .industry
        .first()
        .map(String::as_str)
        .unwrap_or("General");
    let timeline = if answers.timeline.is_empty() {
        FALLBACK_TIMELINE
    } else {
        &answers.timeline
    };
    let goal = if answers.goals.is_empty() {
        FALLBACK_GOAL
    } else {
        &answers.goals
    };
    let highlight = trends
        .first()
        .map(|t| t.title.as_str())
        .unwrap_or(FALLBACK_HIGHLIGHT);

    let risk = answers
        .risk_tolerance
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite());

    let risk_level = match risk {
        Some(n) if n <= 3.0 => RiskLevel::Low,
        Some(n) if n >= 8.0 => RiskLevel::High,
        _ => RiskLevel::Medium,
    };

    let confidence_score = match risk {
        Some(n) => (70.0 + (8.0 - n) * 2.0).clamp(60.0, 95.0).round() as u8,
        None => 70,
    };

    let strengths_part = if answers.strengths.is_empty() {
        String::new()
    } else {
        format!(" ({})", answers.strengths.join(", "))
    };

    BusinessIdea {
        title: format!("{} Opportunity: Trend-Aligned Concept", industry),
        summary: format!(
            "Based on your profile and live trend signals (e.g., {}), this concept targets your goal to {}. It leverages your strengths{} and is scoped for a {} implementation.",
            highlight, goal, strengths_part, timeline
        ),
        confidence_score,
        market_size: FALLBACK_MARKET_SIZE.to_string(),
        estimated_revenue: FALLBACK_REVENUE.to_string(),
        implementation_time: timeline.to_string(),
        risk_level,
        category: industry.to_string(),
    }
}
