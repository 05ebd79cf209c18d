//! HTTP transport to the regional model endpoint

use super::{GenerateRequest, GenerateResponse, ModelTransport};
use crate::config::VertexConfig;
use crate::error::{truncate_body, PulseError, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

pub struct VertexTransport {
    http: Client,
    config: VertexConfig,
}

impl VertexTransport {
    pub fn new(config: &VertexConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            http,
            config: config.clone(),
        })
    }
}

#[async_trait]
impl ModelTransport for VertexTransport {
    async fn generate(
        &self,
        model_id: &str,
        token: &str,
        request: &GenerateRequest,
    ) -> Result<GenerateResponse> {
        let url = self.config.model_url(model_id);
        tracing::debug!(model = model_id, %url, "Calling model endpoint");

        let resp = self
            .http
            .post(&url)
            .bearer_auth(token)
            .json(request)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(PulseError::Api {
                status: status.as_u16(),
                body: truncate_body(&body, 500),
            });
        }

        let text = resp.text().await?;
        tracing::debug!("Model raw response: {}", truncate_body(&text, 500));

        serde_json::from_str(&text).map_err(|e| {
            PulseError::MalformedResponse(format!(
                "{} - response: {}",
                e,
                truncate_body(&text, 200)
            ))
        })
    }
}
