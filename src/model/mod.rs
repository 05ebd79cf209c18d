//! Remote generative model access
//!
//! - `gemini`: request/response wire types and reply parsing
//! - `transport`: HTTP transport to the regional `generateContent` endpoint
//! - `retry`: per-candidate retry policy with exponential backoff
//! - `invoker`: tries model candidates in order until one yields JSON

pub mod gemini;
pub mod invoker;
pub mod retry;
pub mod transport;


pub use gemini::{Content, GenerateRequest, GenerateResponse, GenerationConfig, Part};
pub use invoker::ModelInvoker;
pub use retry::{AttemptPosition, NextAction, RetryPolicy, Sleeper, TokioSleeper};
pub use transport::VertexTransport;

use crate::error::Result;
use async_trait::async_trait;

/// One call to one model candidate
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ModelTransport: Send + Sync {
    /// POST `request` to `model_id`. Non-success statuses are errors.
    async fn generate(
        &self,
        model_id: &str,
        token: &str,
        request: &GenerateRequest,
    ) -> Result<GenerateResponse>;
}
