use super::{ApiError, AppState};
use crate::fanout::{select_targets, BatchResponse};
use crate::normalize::SentimentResult;
use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

const NOTE_DISABLED: &str = "Image generation is disabled on this deployment.";
const NOTE_FAILED: &str = "Image generation failed.";

#[derive(Debug, Deserialize)]
pub struct CountryQuery {
    pub topic: Option<String>,
    pub country: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct BatchQuery {
    pub topic: Option<String>,
    pub limit: Option<String>,
    /// CSV of catalog keys
    pub countries: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ImageQuery {
    pub country: Option<String>,
    pub topic: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CountriesResponse {
    pub countries: Vec<&'static str>,
}

#[derive(Debug, Serialize)]
pub struct ImageResponse {
    pub country: String,
    pub topic: String,
    pub image_url: Option<String>,
    pub note: String,
}

fn required_topic(topic: Option<String>) -> Result<String, ApiError> {
    topic
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ApiError::unprocessable("topic is required"))
}

/// Country key must be present and known; returns it with its long name
fn required_country(
    state: &AppState,
    country: Option<String>,
) -> Result<(String, &'static str), ApiError> {
    let country = country
        .filter(|c| c.chars().count() >= 2)
        .ok_or_else(|| ApiError::unprocessable("country must be at least 2 characters"))?;

    match state.service.catalog().long_name(&country) {
        Some(long_name) => Ok((country, long_name)),
        None => Err(ApiError::bad_request(format!("Unsupported country: {}", country))),
    }
}

pub async fn healthz() -> Json<Value> {
    Json(json!({ "ok": true }))
}

pub async fn countries(State(state): State<AppState>) -> Json<CountriesResponse> {
    Json(CountriesResponse {
        countries: state.service.catalog().keys().collect(),
    })
}

pub async fn sentiment_country(
    State(state): State<AppState>,
    Query(params): Query<CountryQuery>,
) -> Result<Json<SentimentResult>, ApiError> {
    let topic = required_topic(params.topic)?;
    let (country, _) = required_country(&state, params.country)?;

    let result = state.service.analyze_country(&topic, &country).await?;
    Ok(Json(result))
}

pub async fn sentiment(
    State(state): State<AppState>,
    Query(params): Query<BatchQuery>,
) -> Result<Json<BatchResponse>, ApiError> {
    let topic = required_topic(params.topic)?;
    let max = state.fanout.max_countries;
    let limit = match params.limit.as_deref() {
        None => max,
        Some(raw) => raw
            .trim()
            .parse::<usize>()
            .map_err(|_| ApiError::unprocessable(format!("limit must be between 1 and {}", max)))?,
    };

    let targets = select_targets(
        state.service.catalog(),
        params.countries.as_deref(),
        limit,
        max,
    )?;

    let results = state
        .service
        .fan_out(&topic, &targets, state.fanout.concurrency)
        .await?;

    Ok(Json(BatchResponse { topic, results }))
}

pub async fn image(
    State(state): State<AppState>,
    Query(params): Query<ImageQuery>,
) -> Result<Json<ImageResponse>, ApiError> {
    let (country, long_name) = required_country(&state, params.country)?;
    let topic = params.topic.unwrap_or_default();

    if !state.images.is_enabled() {
        return Ok(Json(ImageResponse {
            country,
            topic,
            image_url: None,
            note: NOTE_DISABLED.to_string(),
        }));
    }

    let image_url = state
        .images
        .generate_image(&country, long_name, Some(&topic))
        .await;

    let note = if image_url.is_some() { "ok" } else { NOTE_FAILED };
    Ok(Json(ImageResponse {
        country,
        topic,
        image_url,
        note: note.to_string(),
    }))
}
