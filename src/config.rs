//! Configuration management
//!
//! Layers, lowest priority first: built-in defaults, an optional TOML file,
//! then `WORLDPULSE_*` environment variables (`__` separates nested keys, e.g.
//! `WORLDPULSE_IMAGE__ENABLED=false`).

use crate::error::{PulseError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const ENV_PREFIX: &str = "WORLDPULSE";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub vertex: VertexConfig,
    pub fanout: FanOutConfig,
    pub image: ImageConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Listen address
    pub bind: String,
    /// Directory served under `/static`
    pub static_dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct VertexConfig {
    pub project_id: String,
    pub location: String,
    /// Overrides `https://{location}-aiplatform.googleapis.com`
    pub base_url: Option<String>,
    /// Model ids, tried in order
    pub model_candidates: Vec<String>,
    /// Attempts per candidate
    pub max_retries: u32,
    pub request_timeout_secs: u64,
    /// Metadata server token endpoint
    pub token_url: String,
    pub token_timeout_secs: u64,
    /// Fixed bearer token; skips the metadata server when set
    pub access_token: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FanOutConfig {
    /// Simultaneous per-country pipelines
    pub concurrency: usize,
    /// Upper bound for a batch `limit`
    pub max_countries: usize,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ImageConfig {
    pub enabled: bool,
    /// Working directory of the generator
    pub repo_dir: PathBuf,
    pub interpreter: String,
    pub script: String,
    /// Subdirectory of the static dir receiving images
    pub output_subdir: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:8080".to_string(),
            static_dir: PathBuf::from("static"),
        }
    }
}

impl Default for VertexConfig {
    fn default() -> Self {
        Self {
            project_id: "worldpulseofficial".to_string(),
            location: "us-central1".to_string(),
            base_url: None,
            model_candidates: vec![
                "gemini-2.5-flash".to_string(),
                "gemini-1.5-flash-001".to_string(),
                "gemini-1.5-flash".to_string(),
            ],
            max_retries: 2,
            request_timeout_secs: 45,
            token_url: "http://metadata.google.internal/computeMetadata/v1/instance/service-accounts/default/token".to_string(),
            token_timeout_secs: 5,
            access_token: None,
        }
    }
}

impl Default for FanOutConfig {
    fn default() -> Self {
        Self {
            concurrency: 8,
            max_countries: 100,
        }
    }
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            repo_dir: PathBuf::from("../FIBO"),
            interpreter: "python3".to_string(),
            script: "generate.py".to_string(),
            output_subdir: "images".to_string(),
        }
    }
}

impl VertexConfig {
    /// Base URL of the regional endpoint, without trailing slash
    pub fn endpoint_base(&self) -> String {
        match &self.base_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!("https://{}-aiplatform.googleapis.com", self.location),
        }
    }

    /// `generateContent` URL for one model candidate
    pub fn model_url(&self, model_id: &str) -> String {
        format!(
            "{}/v1/projects/{}/locations/{}/publishers/google/models/{}:generateContent",
            self.endpoint_base(),
            self.project_id,
            self.location,
            model_id
        )
    }
}

impl ImageConfig {
    /// Where generated images land on disk
    pub fn output_dir(&self, static_dir: &Path) -> PathBuf {
        static_dir.join(&self.output_subdir)
    }
}

impl Config {
    /// Load configuration from an optional file plus the environment.
    ///
    /// A path that is given must exist.
    pub fn load<P: AsRef<Path>>(path: Option<P>) -> Result<Self> {
        let mut builder = config::Config::builder();

        if let Some(path) = path {
            let path = path.as_ref();
            builder = builder.add_source(config::File::from(path).required(true));
        }

        let settings = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("vertex.model_candidates"),
            )
            .build()
            .map_err(|e| PulseError::Config(e.to_string()))?;

        let config: Config = settings
            .try_deserialize()
            .map_err(|e| PulseError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from the first config file found in the default locations
    pub fn load_default() -> Result<Self> {
        let paths = ["worldpulse.toml", "~/.config/worldpulse/config.toml"];

        for path in paths {
            let expanded = shellexpand::tilde(path);
            if Path::new(expanded.as_ref()).exists() {
                return Self::load(Some(expanded.as_ref()));
            }
        }

        Self::load(None::<&str>)
    }

    pub fn validate(&self) -> Result<()> {
        if self.vertex.model_candidates.is_empty() {
            return Err(PulseError::Config("vertex.model_candidates must not be empty".into()));
        }
        if self.vertex.max_retries == 0 {
            return Err(PulseError::Config("vertex.max_retries must be at least 1".into()));
        }
        if self.fanout.concurrency == 0 {
            return Err(PulseError::Config("fanout.concurrency must be at least 1".into()));
        }
        if self.fanout.max_countries == 0 {
            return Err(PulseError::Config("fanout.max_countries must be at least 1".into()));
        }
        Ok(())
    }
}
