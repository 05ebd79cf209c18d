//! Prompt and schema for one country/topic request

use crate::model::GenerateRequest;
use serde_json::{json, Value};

pub const SYSTEM_INSTRUCTION: &str = "You are WorldPulse, a geopolitical and social sentiment analyzer. \
Analyze evidence about a country and topic. \
Return JSON ONLY with fields: country, topic, sentiment_score (number in [-1.0, 1.0]), \
summary (<= ~40 words), and exactly 3 short keywords.";

/// Schema the model reply is constrained to
pub fn response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "country": {"type": "STRING"},
            "topic": {"type": "STRING"},
            "sentiment_score": {"type": "NUMBER"},
            "summary": {"type": "STRING"},
            "keywords": {"type": "ARRAY", "items": {"type": "STRING"}}
        },
        "required": ["country", "topic", "sentiment_score", "summary", "keywords"],
        "propertyOrdering": ["country", "topic", "sentiment_score", "summary", "keywords"]
    })
}

/// Per-call input to the model, built from the catalog's long name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentimentRequest {
    pub country_display_name: String,
    pub topic: String,
}

impl SentimentRequest {
    pub fn new(country_display_name: &str, topic: &str) -> Self {
        Self {
            country_display_name: country_display_name.to_string(),
            topic: topic.to_string(),
        }
    }

    pub fn user_query(&self) -> String {
        format!(
            "COUNTRY: {country}\n\
             TOPIC: {topic}\n\
             EVIDENCE: Summarize current situation from recent news/reports/social posts about \
             '{topic}' in '{country}'. Be concise and factual.",
            country = self.country_display_name,
            topic = self.topic,
        )
    }

    pub fn to_generate_request(&self) -> GenerateRequest {
        GenerateRequest::json_reply(SYSTEM_INSTRUCTION, self.user_query(), response_schema())
    }
}
