//! HTTP proxy endpoint for server-side logo generation.
//!
//! Exposes `POST /api/generate-logo` so browser clients can generate images
//! without holding an API key: the provider is built once at startup from the
//! server's own credential and shared through [`AppState`].

use crate::image::{LogoImageProvider, LogoImageRequest};
use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Shared state for the proxy: the server-held image provider.
#[derive(Clone)]
pub struct AppState {
    provider: Arc<dyn LogoImageProvider>,
}

impl AppState {
    /// Creates state around the given provider.
    pub fn new(provider: Arc<dyn LogoImageProvider>) -> Self {
        Self { provider }
    }
}

#[derive(Debug, Deserialize)]
struct GenerateLogoRequest {
    prompt: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateLogoResponse {
    /// The generated image as a data URL.
    image: String,
    mime_type: String,
    model: Option<String>,
}

/// Builds the proxy router. Non-POST requests to the endpoint get 405 from
/// the method router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/generate-logo", post(generate_logo))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Runs the proxy on the given address until the task is cancelled.
pub async fn serve(addr: std::net::SocketAddr, state: AppState) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "logo proxy listening");
    axum::serve(listener, router(state)).await
}

async fn generate_logo(State(state): State<AppState>, body: Bytes) -> Response {
    // Parse by hand so every malformed body maps to a plain 400.
    let request: GenerateLogoRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(_) => return error_response(StatusCode::BAD_REQUEST, "request body must be JSON with a \"prompt\" field"),
    };

    if request.prompt.trim().is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "prompt must not be empty");
    }

    match state
        .provider
        .generate(&LogoImageRequest::new(request.prompt))
        .await
    {
        Ok(logo) => {
            let response = GenerateLogoResponse {
                image: logo.to_data_url(),
                mime_type: logo.format.mime_type().to_string(),
                model: logo.metadata.model.clone(),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            if !e.is_user_facing() {
                tracing::error!("logo generation failed: {e}");
            }
            error_response(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string())
        }
    }
}

fn error_response(status: StatusCode, message: &str) -> Response {
    let body = Json(json!({
        "error": message,
        "status": status.as_u16(),
    }));
    (status, body).into_response()
}
