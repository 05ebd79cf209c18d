//! Error types for the sentiment service

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PulseError {
    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("API error: {status}. Body: {body}")]
    Api { status: u16, body: String },

    #[error("Malformed model response: {0}")]
    MalformedResponse(String),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("All model candidates exhausted ({candidates}). Last error: {last_error}")]
    AllCandidatesExhausted {
        candidates: String,
        last_error: String,
    },

    #[error("Unsupported country keys: {0:?}")]
    UnknownCountries(Vec<String>),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("External process error: {0}")]
    ExternalProcess(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl PulseError {
    /// Whether a failed model attempt is worth retrying against the same candidate.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            PulseError::Network(_)
                | PulseError::Api { .. }
                | PulseError::MalformedResponse(_)
                | PulseError::Json(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, PulseError>;

/// First `max` characters of a response body, for error messages and logs
pub(crate) fn truncate_body(body: &str, max: usize) -> String {
    match body.char_indices().nth(max) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
