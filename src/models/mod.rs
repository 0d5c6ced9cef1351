// Data models matching the frontend TypeScript types

use serde::{Deserialize, Serialize};

/// Risk bucket attached to every generated idea.
///
/// Serialized lowercase on the wire (`"low" | "medium" | "high"`).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

/// Questionnaire payload after normalization.
///
/// Every field is always present: absent or wrong-typed input becomes an
/// empty string or empty list rather than an error. `industry` holds at most
/// three entries and neither list contains empty strings. See
/// `ideas::normalize`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct QuestionnaireAnswers {
    pub industry: Vec<String>,
    pub experience: String,
    pub budget: String,
    pub timeline: String,
    pub market_preference: String,
    pub risk_tolerance: String,
    pub strengths: Vec<String>,
    pub goals: String,
}

/// One synthesized business idea.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BusinessIdea {
    pub title: String,
    pub summary: String,
    pub confidence_score: u8,
    pub market_size: String,
    pub estimated_revenue: String,
    pub implementation_time: String,
    pub risk_level: RiskLevel,
    pub category: String,
}

/// One normalized market/news signal associated with an industry.
///
/// `title` and `industry` are guaranteed non-empty; `url` and `created_at`
/// may be empty strings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TrendItem {
    pub industry: String,
    pub title: String,
    pub url: String,
    pub points: u64,
    pub created_at: String,
}

/// Wire response of the generate-ideas endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResponseShape {
    #[serde(rename = "businessIdea")]
    pub business_idea: BusinessIdea,
    pub trends: Vec<TrendItem>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_risk_level_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&RiskLevel::Low).unwrap(), "\"low\"");
        assert_eq!(
            serde_json::to_string(&RiskLevel::Medium).unwrap(),
            "\"medium\""
        );
        assert_eq!(serde_json::to_string(&RiskLevel::High).unwrap(), "\"high\"");
    }

    #[test]
    fn test_business_idea_uses_camel_case_keys() {
        let idea = BusinessIdea {
            title: "T".to_string(),
            summary: "S".to_string(),
            confidence_score: 65,
            market_size: "N/A".to_string(),
            estimated_revenue: "N/A".to_string(),
            implementation_time: "N/A".to_string(),
            risk_level: RiskLevel::Medium,
            category: "General".to_string(),
        };

        let value = serde_json::to_value(&idea).unwrap();
        assert_eq!(value["confidenceScore"], 65);
        assert_eq!(value["marketSize"], "N/A");
        assert_eq!(value["estimatedRevenue"], "N/A");
        assert_eq!(value["implementationTime"], "N/A");
        assert_eq!(value["riskLevel"], "medium");
    }

    #[test]
    fn test_response_shape_renames_business_idea() {
        let shape = ResponseShape {
            business_idea: BusinessIdea {
                title: "T".to_string(),
                summary: "S".to_string(),
                confidence_score: 50,
                market_size: "N/A".to_string(),
                estimated_revenue: "N/A".to_string(),
                implementation_time: "N/A".to_string(),
                risk_level: RiskLevel::Low,
                category: "General".to_string(),
            },
            trends: vec![],
        };

        let value = serde_json::to_value(&shape).unwrap();
        assert!(value.get("businessIdea").is_some());
        assert!(value.get("trends").is_some());
    }

    #[test]
    fn test_questionnaire_answers_default_is_empty() {
        let answers = QuestionnaireAnswers::default();
        assert!(answers.industry.is_empty());
        assert!(answers.risk_tolerance.is_empty());
        assert!(answers.strengths.is_empty());
    }
}
