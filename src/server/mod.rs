//! HTTP boundary
//!
//! Thin axum layer over [`SentimentService`] and [`ImageTrigger`]. Static
//! files (generated images included) are served under `/static`.

mod handlers;


use crate::auth;
use crate::config::{Config, FanOutConfig};
use crate::error::{PulseError, Result};
use crate::fanout::SentimentService;
use crate::image::ImageTrigger;
use crate::model::{ModelInvoker, VertexTransport};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use std::path::Path;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<SentimentService>,
    pub images: Arc<ImageTrigger>,
    pub fanout: FanOutConfig,
}

impl AppState {
    pub fn new(service: Arc<SentimentService>, images: Arc<ImageTrigger>, fanout: FanOutConfig) -> Self {
        Self {
            service,
            images,
            fanout,
        }
    }

    /// Wire the production components from configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        let credentials = auth::from_config(&config.vertex)?;
        let transport = Arc::new(VertexTransport::new(&config.vertex)?);
        let invoker = ModelInvoker::new(
            credentials,
            transport,
            config.vertex.model_candidates.clone(),
            config.vertex.max_retries,
        );

        Ok(Self::new(
            Arc::new(SentimentService::new(Arc::new(invoker))),
            Arc::new(ImageTrigger::new(config.image.clone(), &config.server.static_dir)),
            config.fanout.clone(),
        ))
    }
}

pub fn router(state: AppState, static_dir: &Path) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/healthz", get(handlers::healthz))
        .route("/countries", get(handlers::countries))
        .route("/sentiment_country", get(handlers::sentiment_country))
        .route("/sentiment", get(handlers::sentiment))
        .route("/image", get(handlers::image))
        .nest_service("/static", ServeDir::new(static_dir))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Run the HTTP server until the process is stopped
pub async fn serve(config: &Config) -> anyhow::Result<()> {
    let state = AppState::from_config(config)?;
    tokio::fs::create_dir_all(state.images.output_dir()).await?;

    let app = router(state, &config.server.static_dir);
    let listener = tokio::net::TcpListener::bind(&config.server.bind).await?;
    tracing::info!(bind = %config.server.bind, "Listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Error body: `{"detail": "..."}`
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    detail: String,
}

impl ApiError {
    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            detail: detail.into(),
        }
    }

    pub fn unprocessable(detail: impl Into<String>) -> Self {
        Self {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            detail: detail.into(),
        }
    }
}

impl From<PulseError> for ApiError {
    fn from(err: PulseError) -> Self {
        match err {
            PulseError::UnknownCountries(_) => Self::bad_request(err.to_string()),
            PulseError::InvalidRequest(detail) => Self::unprocessable(detail),
            other => {
                tracing::error!(error = %other, "Request failed");
                Self {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    detail: other.to_string(),
                }
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(serde_json::json!({ "detail": self.detail }))).into_response()
    }
}
