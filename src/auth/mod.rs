//! Bearer credentials for the model service
//!
//! On the hosting platform a short-lived token comes from the instance
//! metadata server. A fixed token can be supplied instead for local runs.


use crate::config::VertexConfig;
use crate::error::{truncate_body, PulseError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

/// Source of bearer tokens for the model endpoint
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    /// Fetch a token. No retry happens at this layer.
    async fn get_token(&self) -> Result<String>;
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Fetches tokens from the instance metadata server
pub struct MetadataTokenProvider {
    http: Client,
    token_url: String,
}

impl MetadataTokenProvider {
    pub fn new(token_url: &str, timeout: Duration) -> Result<Self> {
        let http = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http,
            token_url: token_url.to_string(),
        })
    }
}

#[async_trait]
impl CredentialProvider for MetadataTokenProvider {
    async fn get_token(&self) -> Result<String> {
        let resp = self
            .http
            .get(&self.token_url)
            .header("Metadata-Flavor", "Google")
            .send()
            .await
            .map_err(|e| PulseError::Auth(format!("token request failed: {}", e)))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(PulseError::Auth(format!(
                "token endpoint returned {}: {}",
                status,
                truncate_body(&body, 200)
            )));
        }

        let token: TokenResponse = resp
            .json()
            .await
            .map_err(|e| PulseError::Auth(format!("invalid token response: {}", e)))?;

        tracing::debug!("Fetched access token from metadata server");
        Ok(token.access_token)
    }
}

/// Hands out a fixed token
pub struct StaticTokenProvider {
    token: String,
}

impl StaticTokenProvider {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

#[async_trait]
impl CredentialProvider for StaticTokenProvider {
    async fn get_token(&self) -> Result<String> {
        Ok(self.token.clone())
    }
}

/// Pick the provider matching the configuration
pub fn from_config(config: &VertexConfig) -> Result<Arc<dyn CredentialProvider>> {
    match config.access_token.as_deref().filter(|t| !t.is_empty()) {
        Some(token) => {
            tracing::info!("Using static access token from configuration");
            Ok(Arc::new(StaticTokenProvider::new(token)))
        }
        None => Ok(Arc::new(MetadataTokenProvider::new(
            &config.token_url,
            Duration::from_secs(config.token_timeout_secs),
        )?)),
    }
}
