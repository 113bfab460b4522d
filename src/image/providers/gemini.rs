//! Gemini (Google) logo image provider.

use crate::error::{classify, LogoForgeError, Result};
use crate::image::provider::LogoImageProvider;
use crate::image::types::{GeneratedLogo, ImageFormat, ImageMetadata, LogoImageRequest};
use async_trait::async_trait;
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Gemini image model variants.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GeminiImageModel {
    /// Gemini 2.5 Flash Image (fast, economical).
    #[default]
    FlashImage,
    /// Gemini 3 Pro Image (highest quality).
    ProImage,
}

impl GeminiImageModel {
    /// Returns the API model identifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FlashImage => "gemini-2.5-flash-image",
            Self::ProImage => "gemini-3-pro-image-preview",
        }
    }
}

/// Builder for GeminiImageProvider.
#[derive(Debug, Clone, Default)]
pub struct GeminiImageProviderBuilder {
    api_key: Option<String>,
    model: GeminiImageModel,
}

impl GeminiImageProviderBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the API key. Falls back to `GOOGLE_API_KEY` env var.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Sets the Gemini image model variant.
    pub fn model(mut self, model: GeminiImageModel) -> Self {
        self.model = model;
        self
    }

    /// Builds the provider, resolving the API key.
    pub fn build(self) -> Result<GeminiImageProvider> {
        let api_key = resolve_api_key(self.api_key, std::env::var("GOOGLE_API_KEY").ok())?;

        Ok(GeminiImageProvider {
            client: reqwest::Client::new(),
            api_key,
            model: self.model,
        })
    }
}

/// Gemini logo image provider.
pub struct GeminiImageProvider {
    client: reqwest::Client,
    api_key: String,
    model: GeminiImageModel,
}

impl GeminiImageProvider {
    /// Creates a new `GeminiImageProviderBuilder`.
    pub fn builder() -> GeminiImageProviderBuilder {
        GeminiImageProviderBuilder::new()
    }

    async fn generate_impl(&self, request: &LogoImageRequest) -> Result<GeneratedLogo> {
        let start = Instant::now();

        let url = format!(
            "https://generativelanguage.googleapis.com/v1beta/models/{}:generateContent",
            self.model.as_str(),
        );

        let body = GeminiRequest::from_image_request(request);

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = extract_error_message(&text).unwrap_or(text);
            tracing::debug!(status = status.as_u16(), "image generation failed");
            return Err(classify(&message));
        }

        let gemini_response: GeminiResponse = response.json().await?;
        let inline_data = extract_inline_data(gemini_response)?;

        let data = base64::engine::general_purpose::STANDARD
            .decode(&inline_data.data)
            .map_err(|e| LogoForgeError::Decode(e.to_string()))?;

        if data.is_empty() {
            return Err(LogoForgeError::EmptyResult);
        }

        let duration_ms = start.elapsed().as_millis() as u64;
        tracing::debug!(duration_ms, bytes = data.len(), "image generation complete");

        let format = ImageFormat::from_mime_type(&inline_data.mime_type)
            .or_else(|| ImageFormat::from_magic_bytes(&data))
            .unwrap_or_default();

        Ok(GeneratedLogo::new(
            data,
            format,
            ImageMetadata {
                model: Some(self.model.as_str().to_string()),
                duration_ms: Some(duration_ms),
            },
        ))
    }
}

#[async_trait]
impl LogoImageProvider for GeminiImageProvider {
    async fn generate(&self, request: &LogoImageRequest) -> Result<GeneratedLogo> {
        self.generate_impl(request).await
    }

    fn name(&self) -> &str {
        "Gemini (Google)"
    }
}

/// Resolves the credential: an explicit non-blank key wins, then the
/// environment fallback; neither means generation cannot be attempted.
fn resolve_api_key(explicit: Option<String>, fallback: Option<String>) -> Result<String> {
    explicit
        .filter(|k| !k.trim().is_empty())
        .or(fallback)
        .ok_or(LogoForgeError::MissingCredential)
}

/// Finds the first inline image payload in the response. A response with no
/// candidates or no image part maps to `EmptyResult`.
fn extract_inline_data(response: GeminiResponse) -> Result<InlineData> {
    response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .and_then(|content| content.parts.into_iter().find_map(|p| p.inline_data))
        .ok_or(LogoForgeError::EmptyResult)
}

/// Pulls `error.message` out of a Gemini error body, falling back to the raw
/// text when the body is not the expected JSON shape.
fn extract_error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("error")?
        .get("message")?
        .as_str()
        .map(str::to_owned)
}

/// Builds the rendering instruction sent to the image model.
fn image_prompt(request: &LogoImageRequest) -> String {
    format!(
        "Render a single professional logo on a plain background, suitable \
         for a brand mark. Follow this concept exactly:\n\n{}",
        request.prompt
    )
}

// Request/Response types
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    generation_config: GeminiConfig,
}

#[derive(Debug, Serialize)]
struct GeminiContent {
    parts: Vec<GeminiRequestPart>,
}

#[derive(Debug, Serialize)]
struct GeminiRequestPart {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiConfig {
    response_modalities: Vec<String>,
}

impl GeminiRequest {
    fn from_image_request(req: &LogoImageRequest) -> Self {
        Self {
            contents: vec![GeminiContent {
                parts: vec![GeminiRequestPart {
                    text: image_prompt(req),
                }],
            }],
            generation_config: GeminiConfig {
                response_modalities: vec!["IMAGE".to_string()],
            },
        }
    }
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    #[serde(default)]
    content: Option<GeminiContentResponse>,
}

#[derive(Debug, Deserialize)]
struct GeminiContentResponse {
    #[serde(default)]
    parts: Vec<GeminiPartResponse>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiPartResponse {
    #[serde(default)]
    inline_data: Option<InlineData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}
