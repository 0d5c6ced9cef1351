//! Total coercion from loosely-typed JSON into domain records.
//!
//! Upstream sources (the model output and the search index) are untrusted.
//! Every function here is total: missing, null, or wrong-typed fields become
//! defaults instead of errors, so malformed upstream data can never produce
//! a malformed record downstream.

use crate::models::{BusinessIdea, RiskLevel, TrendItem};
use serde_json::Value;

pub const DEFAULT_TITLE: &str = "Untitled Concept";
pub const DEFAULT_SUMMARY: &str = "A concise summary will appear here.";
pub const DEFAULT_FIELD: &str = "N/A";
pub const DEFAULT_CATEGORY: &str = "General";
pub const DEFAULT_CONFIDENCE: u8 = 65;

/// Trim a JSON value that should be a string; anything else becomes "".
pub fn sanitize_string(value: &Value) -> String {
    value
        .as_str()
        .map(|s| s.trim().to_string())
        .unwrap_or_default()
}

/// Lenient numeric read: accepts JSON numbers and numeric strings, rejects
/// everything else (including non-finite results).
pub(crate) fn lenient_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|v| v.is_finite()),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        _ => None,
    }
}

fn or_default(value: String, default: &str) -> String {
    if value.is_empty() {
        default.to_string()
    } else {
        value
    }
}

/// Coerce an arbitrary JSON value into a fully-populated `BusinessIdea`.
///
/// `riskLevel` is lowercased and must land in the closed set, otherwise
/// medium; `confidenceScore` is rounded and clamped into [0, 100], defaulting
/// to 65 when unreadable; blank string fields get fixed placeholder text.
pub fn coerce_business_idea(input: &Value) -> BusinessIdea {
    let risk = sanitize_string(&input["riskLevel"]).to_lowercase();
    let risk_level = match risk.as_str() {
        "low" => RiskLevel::Low,
        "medium" => RiskLevel::Medium,
        "high" => RiskLevel::High,
        _ => RiskLevel::Medium,
    };

    let confidence_score = match lenient_number(&input["confidenceScore"]) {
        Some(n) => n.round().clamp(0.0, 100.0) as u8,
        None => DEFAULT_CONFIDENCE,
    };

    BusinessIdea {
        title: or_default(sanitize_string(&input["title"]), DEFAULT_TITLE),
        summary: or_default(sanitize_string(&input["summary"]), DEFAULT_SUMMARY),
        confidence_score,
        market_size: or_default(sanitize_string(&input["marketSize"]), DEFAULT_FIELD),
        estimated_revenue: or_default(sanitize_string(&input["estimatedRevenue"]), DEFAULT_FIELD),
        implementation_time: or_default(
            sanitize_string(&input["implementationTime"]),
            DEFAULT_FIELD,
        ),
        risk_level,
        category: or_default(sanitize_string(&input["category"]), DEFAULT_CATEGORY),
    }
}

/// Coerce an arbitrary JSON value into trend records.
///
/// Non-arrays yield an empty list. Entries without a usable `title` and
/// `industry` are dropped entirely, never emitted as placeholders.
pub fn coerce_trends(items: &Value) -> Vec<TrendItem> {
    let Some(array) = items.as_array() else {
        return Vec::new();
    };
    array.iter().filter_map(coerce_trend_item).collect()
}

fn coerce_trend_item(item: &Value) -> Option<TrendItem> {
    let title = sanitize_string(&item["title"]);
    let industry = sanitize_string(&item["industry"]);
    if title.is_empty() || industry.is_empty() {
        return None;
    }

    Some(TrendItem {
        industry,
        title,
        url: sanitize_string(&item["url"]),
        points: lenient_points(&item["points"]),
        created_at: sanitize_string(&item["created_at"]),
    })
}

/// Points are non-negative integers; anything unreadable or negative is 0.
pub(crate) fn lenient_points(value: &Value) -> u64 {
    match lenient_number(value) {
        Some(n) if n > 0.0 => n.round() as u64,
        _ => 0,
    }
}
