// Integration tests for the idea-generation pipeline
// These exercise the lib crate end-to-end without any live network calls:
// the offline fallback path, the recovery path fed with canned model text,
// and the HTTP handler's request validation.

use serde_json::json;
use std::sync::Arc;

use ideaforge_lib::config::AppConfig;
use ideaforge_lib::ideas::{
    extract_first_json_object, normalize_answers, recover_response_shape, IdeaSynthesizer,
};
use ideaforge_lib::ideas::trends::aggregate_trends;
use ideaforge_lib::models::{RiskLevel, TrendItem};

fn trend(industry: &str, title: &str) -> TrendItem {
    TrendItem {
        industry: industry.to_string(),
        title: title.to_string(),
        url: format!("https://example.com/{}", title),
        points: 10,
        created_at: "2024-01-01T00:00:00Z".to_string(),
    }
}

#[tokio::test]
async fn fallback_mode_end_to_end() {
    // No credential configured: the whole request is computable offline.
    let config = Arc::new(AppConfig::default());
    let synthesizer = IdeaSynthesizer::new(config, reqwest::Client::new());

    let answers = normalize_answers(&json!({
        "industry": ["Technology"],
        "risk_tolerance": 2,
    }));
    let trends = vec![trend("Technology", "LLM tooling wave")];

    let shape = synthesizer.synthesize(&answers, &trends).await.unwrap();

    assert_eq!(shape.business_idea.risk_level, RiskLevel::Low);
    assert_eq!(shape.business_idea.category, "Technology");
    assert_eq!(shape.business_idea.confidence_score, 82);
    assert!(shape.business_idea.summary.contains("LLM tooling wave"));
    assert_eq!(shape.trends, trends);
}

#[tokio::test]
async fn fallback_mode_is_deterministic_across_calls() {
    let config = Arc::new(AppConfig::default());
    let synthesizer = IdeaSynthesizer::new(config, reqwest::Client::new());

    let answers = normalize_answers(&json!({ "industry": ["Health"], "risk_tolerance": "9" }));

    let first = synthesizer.synthesize(&answers, &[]).await.unwrap();
    let second = synthesizer.synthesize(&answers, &[]).await.unwrap();
    assert_eq!(first, second);
    assert_eq!(first.business_idea.risk_level, RiskLevel::High);
}

#[test]
fn model_output_recovery_with_prose_and_missing_fields() {
    // The model wrapped its JSON in prose and omitted most idea fields and
    // all trends; coercion fills defaults and the fetched list survives.
    let fetched = vec![trend("Technology", "Fetched signal")];
    let raw = r#"Here is the result: {"businessIdea":{"title":"X"},"trends":[]}"#;

    let shape = recover_response_shape(raw, &fetched).unwrap();
    assert_eq!(shape.business_idea.title, "X");
    assert_eq!(shape.business_idea.summary, "A concise summary will appear here.");
    assert_eq!(shape.business_idea.confidence_score, 65);
    assert_eq!(shape.business_idea.risk_level, RiskLevel::Medium);
    assert_eq!(shape.business_idea.category, "General");
    assert_eq!(shape.trends, fetched);
}

#[test]
fn balanced_extraction_ignores_braces_inside_strings() {
    let text = concat!(
        "The model says: ",
        r#"{"businessIdea":{"title":"Uses {braces} inside","summary":"also \"quotes\""},"trends":[]}"#,
        " -- end of output"
    );

    let extracted = extract_first_json_object(text).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&extracted).unwrap();
    assert_eq!(parsed["businessIdea"]["title"], "Uses {braces} inside");
}

#[test]
fn aggregation_preserves_industry_order_when_one_fetch_fails() {
    // Industry "B" degraded to empty; A-then-C order holds and the cap is 15.
    let a: Vec<TrendItem> = (0..10).map(|i| trend("A", &format!("a{}", i))).collect();
    let c: Vec<TrendItem> = (0..10).map(|i| trend("C", &format!("c{}", i))).collect();

    let aggregated = aggregate_trends(vec![a, vec![], c]);

    assert_eq!(aggregated.len(), 15);
    assert!(aggregated[..10].iter().all(|t| t.industry == "A"));
    assert!(aggregated[10..].iter().all(|t| t.industry == "C"));
}

#[test]
fn normalizer_is_a_fixed_point() {
    let raw = json!({
        "industry": ["  Fintech ", "", "Retail", "Energy", "Extra"],
        "experience": "  a decade ",
        "budget": 12000,
        "risk_tolerance": 6.5,
        "strengths": [" grit ", 7, ""],
        "goals": "  exit in 5 years ",
    });

    let once = normalize_answers(&raw);
    let twice = normalize_answers(&serde_json::to_value(&once).unwrap());

    assert_eq!(once, twice);
    assert_eq!(once.industry, vec!["Fintech", "Retail", "Energy"]);
    assert_eq!(once.budget, "");
    assert_eq!(once.risk_tolerance, "6.5");
    assert_eq!(once.strengths, vec!["grit"]);
}

mod http_handler {
    use super::*;
    use axum::body::Bytes;
    use axum::extract::State;
    use axum::http::{header, StatusCode};

    use ideaforge_lib::server::routes::idea_routes::generate_ideas_handler;
    use ideaforge_lib::server::ServerAppState;
    use ideaforge_lib::shutdown::ShutdownState;

    async fn call(body: &str) -> (StatusCode, serde_json::Value) {
        let state = ServerAppState::new(AppConfig::default(), ShutdownState::new());
        let response =
            generate_ideas_handler(State(state), Bytes::from(body.to_string())).await;

        let status = response.status();
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/json"
        );
        assert_eq!(
            response.headers().get(header::CACHE_CONTROL).unwrap(),
            "no-store"
        );

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn malformed_json_body_is_a_400() {
        let (status, body) = call("{ not json").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["error"],
            "Invalid JSON body. Expecting { answers: QuestionnaireAnswers }."
        );
    }

    #[tokio::test]
    async fn missing_answers_object_is_a_400() {
        for body_text in [r#"{}"#, r#"{"answers": "nope"}"#, r#"{"answers": null}"#] {
            let (status, body) = call(body_text).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(
                body["error"],
                "Bad Request: Missing 'answers' object in request body."
            );
        }
    }

    #[tokio::test]
    async fn empty_answers_without_credential_succeeds_offline() {
        // No industries means no trend fetches, so the request completes
        // without touching the network.
        let (status, body) = call(r#"{"answers": {}}"#).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["businessIdea"]["category"], "General");
        assert_eq!(body["businessIdea"]["riskLevel"], "medium");
        assert_eq!(body["businessIdea"]["confidenceScore"], 70);
        assert_eq!(body["trends"], json!([]));
    }
}
