//! Sentiment result normalization
//!
//! Model replies are free-form JSON and cannot be trusted. `normalize` turns
//! whatever came back into a well-formed [`SentimentResult`] and never fails.

#[cfg(test)]
mod tests;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Keywords marking a result synthesized after the pipeline failed
pub const FAILURE_KEYWORDS: [&str; 3] = ["API_FAILURE", "NO_DATA", "SYSTEM_ERROR"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultStatus {
    /// Built from a model reply
    Ok,
    /// Synthesized locally after a failure
    Degraded,
}

/// One country's sentiment on a topic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentResult {
    /// Short catalog key
    #[serde(rename = "country")]
    pub country_key: String,
    pub topic: String,
    /// -1.0 (crisis) to 1.0 (optimistic)
    pub sentiment_score: f64,
    pub summary: String,
    pub keywords: Vec<String>,
    pub status: ResultStatus,
}

impl SentimentResult {
    /// Stand-in for a country whose pipeline failed
    pub fn degraded(country_key: &str, topic: &str, error: &str) -> Self {
        Self {
            country_key: country_key.to_string(),
            topic: topic.to_string(),
            sentiment_score: 0.0,
            summary: format!(
                "System error: Could not process AI request. (Details: {})",
                error
            ),
            keywords: FAILURE_KEYWORDS.iter().map(|k| k.to_string()).collect(),
            status: ResultStatus::Degraded,
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.status == ResultStatus::Degraded
    }
}

/// Coerce a raw model reply into a result for `country_key` and `topic`.
///
/// - `country` and `topic` always come from the caller, never the model.
/// - `sentiment_score` is coerced to a finite float clamped to [-1, 1];
///   anything uncoercible becomes 0.0.
/// - `keywords` that is not an array becomes empty. Scalar entries are kept
///   as text, nested values dropped.
/// - `summary` that is not a string becomes empty.
pub fn normalize(raw: &Value, country_key: &str, topic: &str) -> SentimentResult {
    SentimentResult {
        country_key: country_key.to_string(),
        topic: topic.to_string(),
        sentiment_score: coerce_score(raw.get("sentiment_score")),
        summary: raw
            .get("summary")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        keywords: coerce_keywords(raw.get("keywords")),
        status: ResultStatus::Ok,
    }
}

fn coerce_score(value: Option<&Value>) -> f64 {
    let score = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        Some(Value::Bool(b)) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    };

    match score {
        Some(s) if s.is_finite() => s.clamp(-1.0, 1.0),
        _ => 0.0,
    }
}

fn coerce_keywords(value: Option<&Value>) -> Vec<String> {
    let Some(Value::Array(items)) = value else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| match item {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        })
        .collect()
}
