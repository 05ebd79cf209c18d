//! Model invocation with candidate fallback

use super::retry::{AttemptPosition, NextAction, RetryPolicy, Sleeper, TokioSleeper};
use super::{GenerateRequest, ModelTransport};
use crate::auth::CredentialProvider;
use crate::error::{PulseError, Result};
use serde_json::Value;
use std::sync::Arc;

/// Tries each model candidate in order, retrying with backoff, and returns
/// the first reply that parses as JSON.
///
/// Callers must not assume which candidate answered.
pub struct ModelInvoker {
    credentials: Arc<dyn CredentialProvider>,
    transport: Arc<dyn ModelTransport>,
    sleeper: Arc<dyn Sleeper>,
    candidates: Vec<String>,
    policy: RetryPolicy,
}

impl ModelInvoker {
    pub fn new(
        credentials: Arc<dyn CredentialProvider>,
        transport: Arc<dyn ModelTransport>,
        candidates: Vec<String>,
        max_retries: u32,
    ) -> Self {
        Self {
            credentials,
            transport,
            sleeper: Arc::new(TokioSleeper),
            candidates,
            policy: RetryPolicy::new(max_retries),
        }
    }

    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    /// Run `request` against the candidates.
    ///
    /// The token is fetched once up front; a credential failure is returned
    /// as is without touching any candidate.
    pub async fn invoke(&self, request: &GenerateRequest) -> Result<Value> {
        if self.candidates.is_empty() {
            return Err(self.exhausted("no model candidates configured".to_string()));
        }

        let token = self.credentials.get_token().await?;
        let mut position = AttemptPosition::default();
        let mut last_error: Option<PulseError> = None;

        loop {
            let model = &self.candidates[position.candidate];
            if position.attempt == 0 {
                tracing::debug!(model = %model, "Trying model candidate");
            }

            let transient = match self.attempt(model, &token, request).await {
                Ok(value) => {
                    tracing::debug!(model = %model, attempt = position.attempt + 1, "Model call succeeded");
                    return Ok(value);
                }
                Err(e) => {
                    tracing::warn!(
                        model = %model,
                        attempt = position.attempt + 1,
                        error = %e,
                        "Request/parse failed"
                    );
                    let transient = e.is_transient();
                    last_error = Some(e);
                    transient
                }
            };

            let action = if transient {
                self.policy.after_failure(position, self.candidates.len())
            } else {
                self.policy.skip_candidate(position, self.candidates.len())
            };

            match action {
                NextAction::Retry { delay } => {
                    tracing::debug!(model = %model, delay_secs = delay.as_secs_f64(), "Backing off");
                    self.sleeper.sleep(delay).await;
                    position = position.next_attempt();
                }
                NextAction::NextCandidate => {
                    tracing::warn!(
                        model = %model,
                        attempts = position.attempt + 1,
                        "Giving up on model"
                    );
                    position = position.next_candidate();
                }
                NextAction::Exhausted => break,
            }
        }

        let last = last_error
            .map(|e| e.to_string())
            .unwrap_or_else(|| "unknown error".to_string());
        Err(self.exhausted(last))
    }

    async fn attempt(&self, model: &str, token: &str, request: &GenerateRequest) -> Result<Value> {
        let response = self.transport.generate(model, token, request).await?;
        response.parse_json()
    }

    fn exhausted(&self, last_error: String) -> PulseError {
        PulseError::AllCandidatesExhausted {
            candidates: self.candidates.join(", "),
            last_error,
        }
    }
}
