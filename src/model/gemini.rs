//! Wire types for `generateContent`

use crate::error::{PulseError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

// ============ Request types ============

#[derive(Debug, Clone, Serialize)]
pub struct GenerateRequest {
    pub contents: Vec<Content>,
    pub system_instruction: Content,
    pub generation_config: GenerationConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GenerationConfig {
    pub response_mime_type: String,
    pub response_schema: Value,
}

// ============ Response types ============

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerateResponse {
    #[serde(default)]
    pub candidates: Vec<ResponseCandidate>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResponseCandidate {
    #[serde(default)]
    pub content: Option<Content>,
}

impl Content {
    pub fn text(role: &str, text: impl Into<String>) -> Self {
        Self {
            role: Some(role.to_string()),
            parts: vec![Part {
                text: Some(text.into()),
            }],
        }
    }
}

impl GenerateRequest {
    /// A single-turn request constrained to a JSON reply matching `schema`
    pub fn json_reply(system_instruction: &str, user_text: impl Into<String>, schema: Value) -> Self {
        Self {
            contents: vec![Content::text("user", user_text)],
            system_instruction: Content::text("system", system_instruction),
            generation_config: GenerationConfig {
                response_mime_type: "application/json".to_string(),
                response_schema: schema,
            },
        }
    }
}

impl GenerateResponse {
    /// Text of the first part of the first candidate
    pub fn first_text(&self) -> Result<&str> {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .and_then(|content| content.parts.first())
            .and_then(|part| part.text.as_deref())
            .ok_or_else(|| {
                PulseError::MalformedResponse("missing candidates/content/parts text".into())
            })
    }

    /// Parse the reply text as JSON
    pub fn parse_json(&self) -> Result<Value> {
        let text = self.first_text()?;
        Ok(serde_json::from_str(strip_code_fence(text))?)
    }
}

/// Unwrap a reply wrapped in a Markdown code fence, e.g. ```` ```json {..} ``` ````
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };

    let rest = rest.strip_prefix("json").unwrap_or(rest).trim_start();
    match rest.find("```") {
        Some(end) => rest[..end].trim(),
        None => rest.trim(),
    }
}
