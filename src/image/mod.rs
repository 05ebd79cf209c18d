//! External image generation
//!
//! Shells out to a generator script with a fixed argument contract:
//!
//! ```text
//! <interpreter> <script> --prompt <text> --seed 1 --output <path> --model-mode local
//! ```
//!
//! Success means exit status zero and the output file existing afterwards.
//! Failures are logged and reported as `None`, never as errors.


use crate::config::ImageConfig;
use crate::error::{PulseError, Result};
use std::path::{Path, PathBuf};
use tokio::process::Command;

pub struct ImageTrigger {
    config: ImageConfig,
    output_dir: PathBuf,
}

impl ImageTrigger {
    /// Images land in `<static_dir>/<output_subdir>`, which must be served at
    /// `/static/<output_subdir>`.
    pub fn new(config: ImageConfig, static_dir: &Path) -> Self {
        // The generator runs in its own working directory
        let output_dir = config.output_dir(static_dir);
        let output_dir = match std::env::current_dir() {
            Ok(cwd) if output_dir.is_relative() => cwd.join(output_dir),
            _ => output_dir,
        };
        Self { config, output_dir }
    }

    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Render an image and return its URL path, e.g. `/static/images/usa_1a2b3c4d.png`
    pub async fn generate_image(
        &self,
        country_short: &str,
        country_long: &str,
        topic: Option<&str>,
    ) -> Option<String> {
        if !self.config.enabled {
            tracing::info!("[Image] Generation is disabled by configuration");
            return None;
        }

        let filename = output_filename(country_short);
        let output_path = self.output_dir.join(&filename);
        let prompt = build_prompt(country_long, topic);

        match self.run_generator(&prompt, &output_path).await {
            Ok(()) => Some(format!(
                "/static/{}/{}",
                self.config.output_subdir.trim_matches('/'),
                filename
            )),
            Err(e) => {
                tracing::warn!("[Image] Generation failed for {}: {}", country_short, e);
                None
            }
        }
    }

    async fn run_generator(&self, prompt: &str, output_path: &Path) -> Result<()> {
        tokio::fs::create_dir_all(&self.output_dir).await?;

        let mut cmd = Command::new(&self.config.interpreter);
        cmd.arg(&self.config.script)
            .arg("--prompt")
            .arg(prompt)
            .args(["--seed", "1"])
            .arg("--output")
            .arg(output_path)
            // Local inference, no external model credential needed
            .args(["--model-mode", "local"])
            .current_dir(&self.config.repo_dir)
            .kill_on_drop(true);

        tracing::info!(
            "[Image] cwd={} cmd={} {} --output {}",
            self.config.repo_dir.display(),
            self.config.interpreter,
            self.config.script,
            output_path.display()
        );

        let output = cmd.output().await.map_err(|e| {
            PulseError::ExternalProcess(format!("failed to start {}: {}", self.config.interpreter, e))
        })?;

        tracing::info!("[Image] returncode: {:?}", output.status.code());
        if !output.stdout.is_empty() {
            tracing::debug!("[Image] stdout: {}", String::from_utf8_lossy(&output.stdout));
        }
        if !output.stderr.is_empty() {
            tracing::debug!("[Image] stderr: {}", String::from_utf8_lossy(&output.stderr));
        }

        if !output.status.success() {
            return Err(PulseError::ExternalProcess(format!(
                "generator exited with {}",
                output.status
            )));
        }

        if !tokio::fs::try_exists(output_path).await.unwrap_or(false) {
            return Err(PulseError::ExternalProcess(format!(
                "expected output not found at {}",
                output_path.display()
            )));
        }

        Ok(())
    }
}

/// Prompt for a topic illustration, or the national flag when there is no topic
pub fn build_prompt(country_long: &str, topic: Option<&str>) -> String {
    match topic.map(str::trim).filter(|t| !t.is_empty()) {
        Some(topic) => format!(
            "A clean, cinematic illustration representing '{}' in {}. \
             Professional, infographic-style, no text, global data-visualization aesthetic.",
            topic, country_long
        ),
        None => format!(
            "A high-quality illustration of the national flag of {}, \
             centered on a dark background, no text, crisp and modern.",
            country_long
        ),
    }
}

/// `<key lowercased, spaces as underscores>_<8 hex chars>.png`
pub fn output_filename(country_short: &str) -> String {
    let stem = country_short.to_lowercase().replace(' ', "_");
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    format!("{}_{}.png", stem, &suffix[..8])
}
