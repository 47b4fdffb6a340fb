//! HTTP surface for the caption service.
//!
//! Two routes: `POST /analyze-image` runs the resolve-then-caption pipeline
//! and `GET /` answers health pings.

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower_http::cors::CorsLayer;
use tracing::{error, info};

use crate::{
    client::{CaptionModel, CAPTION_PROMPT},
    error::CaptionError,
    models::ModelParams,
    source::ImageSource,
};

/// Request header carrying a per-request captioning credential.
const API_KEY_HEADER: &str = "x-api-key";

/// Shared state for the request handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    model: CaptionModel,
    has_server_key: bool,
}

impl AppState {
    /// Creates state around a model configured with a server-side API key.
    pub fn new(model: CaptionModel) -> Self {
        Self {
            model,
            has_server_key: true,
        }
    }

    /// Creates state without a server-side API key; every request must then
    /// supply an `x-api-key` header.
    pub fn without_server_key(params: ModelParams) -> Self {
        Self {
            model: CaptionModel::new(String::new(), params),
            has_server_key: false,
        }
    }

    /// Overrides the captioning API endpoint for the wrapped model.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.model = self.model.with_base_url(base_url);
        self
    }
}

/// Builds the service router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health_check))
        .route("/analyze-image", post(analyze_image))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[derive(Debug, Deserialize)]
struct AnalyzeRequest {
    #[serde(rename = "imageUrl")]
    image_url: Option<String>,
}

#[derive(Debug, Serialize)]
struct AnalyzeResponse {
    description: String,
}

/// An error rendered as an HTTP response.
#[derive(Debug)]
enum ApiError {
    /// The request body carried no `imageUrl` field.
    MissingImageUrl,
    /// No credential was available for the downstream API.
    MissingApiKey,
    /// Resolution or captioning failed.
    Caption(CaptionError),
}

impl From<CaptionError> for ApiError {
    fn from(err: CaptionError) -> Self {
        Self::Caption(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::MissingImageUrl => (
                StatusCode::BAD_REQUEST,
                "Missing 'imageUrl' in request body".to_string(),
            ),
            Self::MissingApiKey => (StatusCode::UNAUTHORIZED, "API key is missing".to_string()),
            Self::Caption(err) => {
                error!(error = %err, "failed to analyze image");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Failed to analyze image: {err}"),
                )
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// A simple endpoint for pings.
async fn health_check() -> Json<serde_json::Value> {
    Json(json!({ "status": "healthy" }))
}

async fn analyze_image(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    let image_url = body
        .image_url
        .filter(|url| !url.is_empty())
        .ok_or(ApiError::MissingImageUrl)?;

    // A per-request header key takes precedence over the server-side key.
    let header_key = headers
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok());
    let model = match header_key {
        Some(key) => state.model.with_api_key(key),
        None if state.has_server_key => state.model,
        None => return Err(ApiError::MissingApiKey),
    };

    info!(image_url = %image_url, "received image analysis request");

    let source = ImageSource::resolve(model.http_client(), &image_url).await?;
    let description = model.describe_image(source, CAPTION_PROMPT).await?;

    Ok(Json(AnalyzeResponse { description }))
}
