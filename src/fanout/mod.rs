//! Per-country sentiment pipeline and bounded fan-out
//!
//! Each country runs request building, model invocation and normalization.
//! Any failure along the way is absorbed into a degraded result, so a batch
//! always returns one entry per requested country. Only input validation
//! fails a whole call.

pub mod prompt;


pub use prompt::{response_schema, SentimentRequest, SYSTEM_INSTRUCTION};

use crate::catalog::CountryCatalog;
use crate::error::{PulseError, Result};
use crate::model::ModelInvoker;
use crate::normalize::{normalize, SentimentResult};
use futures_util::future::join_all;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::Semaphore;

/// Default number of countries analyzed at once
pub const DEFAULT_CONCURRENCY: usize = 8;

/// Batch reply
#[derive(Debug, Clone, Serialize)]
pub struct BatchResponse {
    pub topic: String,
    pub results: Vec<SentimentResult>,
}

/// Outcome of one country's pipeline before it is collapsed into the batch
#[derive(Debug, Clone)]
enum CountryOutcome {
    Ok(SentimentResult),
    Degraded(SentimentResult),
}

impl CountryOutcome {
    fn into_result(self) -> SentimentResult {
        match self {
            CountryOutcome::Ok(result) | CountryOutcome::Degraded(result) => result,
        }
    }
}

pub struct SentimentService {
    catalog: &'static CountryCatalog,
    invoker: Arc<ModelInvoker>,
}

impl SentimentService {
    pub fn new(invoker: Arc<ModelInvoker>) -> Self {
        Self {
            catalog: CountryCatalog::global(),
            invoker,
        }
    }

    pub fn catalog(&self) -> &'static CountryCatalog {
        self.catalog
    }

    /// Sentiment for a single country.
    ///
    /// Fails only on an empty topic or unknown key; pipeline failures come
    /// back as a degraded result.
    pub async fn analyze_country(&self, topic: &str, country_key: &str) -> Result<SentimentResult> {
        validate_topic(topic)?;
        let long_name = self
            .catalog
            .long_name(country_key)
            .ok_or_else(|| PulseError::UnknownCountries(vec![country_key.to_string()]))?;

        Ok(self.run_country(topic, country_key, long_name).await.into_result())
    }

    /// Sentiment for every key, at most `concurrency_limit` at a time.
    ///
    /// All keys are validated before anything is scheduled. Results come back
    /// in input order, one per key.
    pub async fn fan_out(
        &self,
        topic: &str,
        country_keys: &[String],
        concurrency_limit: usize,
    ) -> Result<Vec<SentimentResult>> {
        validate_topic(topic)?;
        self.catalog.validate(country_keys)?;

        let gate = Semaphore::new(concurrency_limit.max(1));
        tracing::info!(
            topic,
            countries = country_keys.len(),
            concurrency = concurrency_limit.max(1),
            "Starting sentiment fan-out"
        );

        let tasks = country_keys.iter().map(|key| {
            let gate = &gate;
            async move {
                let _permit = match gate.acquire().await {
                    Ok(permit) => permit,
                    Err(e) => {
                        return CountryOutcome::Degraded(SentimentResult::degraded(
                            key,
                            topic,
                            &e.to_string(),
                        ))
                    }
                };
                // Validated above
                let long_name = self.catalog.long_name(key).unwrap_or(key.as_str());
                self.run_country(topic, key, long_name).await
            }
        });

        let outcomes = join_all(tasks).await;
        let degraded = outcomes
            .iter()
            .filter(|o| matches!(o, CountryOutcome::Degraded(_)))
            .count();

        tracing::info!(
            topic,
            countries = outcomes.len(),
            degraded,
            "Sentiment fan-out complete"
        );

        Ok(outcomes.into_iter().map(CountryOutcome::into_result).collect())
    }

    async fn run_country(&self, topic: &str, country_key: &str, long_name: &str) -> CountryOutcome {
        let request = SentimentRequest::new(long_name, topic).to_generate_request();

        match self.invoker.invoke(&request).await {
            Ok(raw) => CountryOutcome::Ok(normalize(&raw, country_key, topic)),
            Err(e) => {
                tracing::error!(country = long_name, error = %e, "AI failure");
                CountryOutcome::Degraded(SentimentResult::degraded(country_key, topic, &e.to_string()))
            }
        }
    }
}

fn validate_topic(topic: &str) -> Result<()> {
    if topic.trim().is_empty() {
        return Err(PulseError::InvalidRequest("topic must not be empty".into()));
    }
    Ok(())
}

/// Resolve the countries a batch call covers.
///
/// With a CSV, its keys (trimmed, blanks dropped) are validated as a whole and
/// then cut to `limit`. Without one, the first `limit` catalog keys are used.
/// `limit` must lie in `1..=max_countries`.
pub fn select_targets(
    catalog: &CountryCatalog,
    countries_csv: Option<&str>,
    limit: usize,
    max_countries: usize,
) -> Result<Vec<String>> {
    if limit == 0 || limit > max_countries {
        return Err(PulseError::InvalidRequest(format!(
            "limit must be between 1 and {}",
            max_countries
        )));
    }

    match countries_csv.filter(|csv| !csv.trim().is_empty()) {
        Some(csv) => {
            let requested: Vec<String> = csv
                .split(',')
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(str::to_string)
                .collect();
            catalog.validate(&requested)?;
            Ok(requested.into_iter().take(limit).collect())
        }
        None => Ok(catalog.keys().take(limit).map(str::to_string).collect()),
    }
}
