//! Gemini (Google) logo concept provider.

use crate::concept::provider::ConceptProvider;
use crate::concept::types::{ConceptMetadata, ConceptRequest, LogoConcept};
use crate::error::{classify, LogoForgeError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Gemini text model variants.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GeminiTextModel {
    /// Gemini 2.5 Flash (fast, economical).
    #[default]
    Flash,
    /// Gemini 2.5 Pro (highest quality).
    Pro,
}

impl GeminiTextModel {
    /// Returns the API model identifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Flash => "gemini-2.5-flash",
            Self::Pro => "gemini-2.5-pro",
        }
    }
}

/// Builder for GeminiConceptProvider.
#[derive(Debug, Clone, Default)]
pub struct GeminiConceptProviderBuilder {
    api_key: Option<String>,
    model: GeminiTextModel,
}

impl GeminiConceptProviderBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the API key. Falls back to `GOOGLE_API_KEY` env var.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Sets the Gemini text model variant.
    pub fn model(mut self, model: GeminiTextModel) -> Self {
        self.model = model;
        self
    }

    /// Builds the provider, resolving the API key.
    pub fn build(self) -> Result<GeminiConceptProvider> {
        let api_key = resolve_api_key(self.api_key, std::env::var("GOOGLE_API_KEY").ok())?;

        Ok(GeminiConceptProvider {
            client: reqwest::Client::new(),
            api_key,
            model: self.model,
        })
    }
}

/// Gemini logo concept provider.
pub struct GeminiConceptProvider {
    client: reqwest::Client,
    api_key: String,
    model: GeminiTextModel,
}

impl GeminiConceptProvider {
    /// Creates a new `GeminiConceptProviderBuilder`.
    pub fn builder() -> GeminiConceptProviderBuilder {
        GeminiConceptProviderBuilder::new()
    }

    async fn generate_impl(&self, request: &ConceptRequest) -> Result<LogoConcept> {
        let start = Instant::now();

        let url = format!(
            "https://generativelanguage.googleapis.com/v1beta/models/{}:generateContent",
            self.model.as_str(),
        );

        let body = GeminiRequest::from_concept_request(request);

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
            tracing::debug!(status = status.as_u16(), "concept generation failed");
            return Err(classify(&message));
        }

        let gemini_response: GeminiResponse = response.json().await?;
        let text = extract_text(gemini_response)?;

        let duration_ms = start.elapsed().as_millis() as u64;
        tracing::debug!(duration_ms, "concept generation complete");

        Ok(LogoConcept::new(
            text,
            ConceptMetadata {
                model: Some(self.model.as_str().to_string()),
                duration_ms: Some(duration_ms),
            },
        ))
    }
}

#[async_trait]
impl ConceptProvider for GeminiConceptProvider {
    async fn generate(&self, request: &ConceptRequest) -> Result<LogoConcept> {
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

/// Joins the text parts of the first candidate. A response with no
/// candidates, no content or only blank text maps to `EmptyResult`.
fn extract_text(response: GeminiResponse) -> Result<String> {
    let text = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|p| p.text)
                .collect::<Vec<_>>()
                .join("")
        })
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(LogoForgeError::EmptyResult);
    }
    Ok(text)
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

/// Builds the instruction sent to the text model.
fn concept_prompt(request: &ConceptRequest) -> String {
    let mut prompt = format!(
        "You are a senior brand identity designer. Write a rich, concrete logo \
         concept for the following brand. Describe the mark, typography, and \
         color palette in a few short paragraphs. Do not include preamble.\n\n\
         Brand description: {}",
        request.description
    );
    if let Some(ref style) = request.style {
        prompt.push_str(&format!("\nStyle direction: {style}"));
    }
    prompt
}

// Request/Response types
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
}

#[derive(Debug, Serialize)]
struct GeminiContent {
    parts: Vec<GeminiRequestPart>,
}

#[derive(Debug, Serialize)]
struct GeminiRequestPart {
    text: String,
}

impl GeminiRequest {
    fn from_concept_request(req: &ConceptRequest) -> Self {
        Self {
            contents: vec![GeminiContent {
                parts: vec![GeminiRequestPart {
                    text: concept_prompt(req),
                }],
            }],
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
struct GeminiPartResponse {
    #[serde(default)]
    text: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_model_as_str() {
        assert_eq!(GeminiTextModel::Flash.as_str(), "gemini-2.5-flash");
        assert_eq!(GeminiTextModel::Pro.as_str(), "gemini-2.5-pro");
    }

    #[test]
    fn test_builder_with_explicit_key() {
        let provider = GeminiConceptProviderBuilder::new()
            .api_key("test-key")
            .model(GeminiTextModel::Pro)
            .build();
        assert!(provider.is_ok());
    }

    #[test]
    fn test_resolve_api_key_missing_credential() {
        // A whitespace-only key must not count as a supplied credential.
        assert!(matches!(
            resolve_api_key(Some("   ".into()), None),
            Err(LogoForgeError::MissingCredential)
        ));
        assert!(matches!(
            resolve_api_key(None, None),
            Err(LogoForgeError::MissingCredential)
        ));
    }

    #[test]
    fn test_resolve_api_key_explicit_wins_over_fallback() {
        assert_eq!(
            resolve_api_key(Some("explicit".into()), Some("env".into())).unwrap(),
            "explicit"
        );
        assert_eq!(
            resolve_api_key(Some("  ".into()), Some("env".into())).unwrap(),
            "env"
        );
    }

    #[test]
    fn test_prompt_includes_description_and_style() {
        let req = ConceptRequest::new("a tea house").with_style("minimalist");
        let prompt = concept_prompt(&req);
        assert!(prompt.contains("a tea house"));
        assert!(prompt.contains("Style direction: minimalist"));
    }

    #[test]
    fn test_request_construction() {
        let req = ConceptRequest::new("a tea house");
        let gemini_req = GeminiRequest::from_concept_request(&req);
        assert_eq!(gemini_req.contents.len(), 1);
        assert_eq!(gemini_req.contents[0].parts.len(), 1);

        // Wire format is camelCase, matching the image-side DTOs.
        let json = serde_json::to_value(&gemini_req).unwrap();
        assert!(json.get("contents").is_some());
    }

    #[test]
    fn test_extract_text_joins_parts() {
        let json = r#"{
            "candidates": [{
                "content": {
                    "parts": [
                        {"text": "A circular "},
                        {"text": "monogram mark."}
                    ]
                }
            }]
        }"#;
        let resp: GeminiResponse = serde_json::from_str(json).unwrap();
        assert_eq!(extract_text(resp).unwrap(), "A circular monogram mark.");
    }

    #[test]
    fn test_extract_text_empty_candidates_is_empty_result() {
        let resp: GeminiResponse = serde_json::from_str("{}").unwrap();
        assert!(matches!(
            extract_text(resp),
            Err(LogoForgeError::EmptyResult)
        ));
    }

    #[test]
    fn test_extract_text_blank_text_is_empty_result() {
        let json = r#"{
            "candidates": [{
                "content": {
                    "parts": [{"text": "  \n  "}]
                }
            }]
        }"#;
        let resp: GeminiResponse = serde_json::from_str(json).unwrap();
        assert!(matches!(
            extract_text(resp),
            Err(LogoForgeError::EmptyResult)
        ));
    }

    #[test]
    fn test_extract_text_candidate_without_content_is_empty_result() {
        let json = r#"{"candidates": [{}]}"#;
        let resp: GeminiResponse = serde_json::from_str(json).unwrap();
        assert!(matches!(
            extract_text(resp),
            Err(LogoForgeError::EmptyResult)
        ));
    }

    #[test]
    fn test_extract_error_message() {
        let body = r#"{"error":{"code":400,"message":"API key not valid","status":"INVALID_ARGUMENT"}}"#;
        assert_eq!(
            extract_error_message(body).as_deref(),
            Some("API key not valid")
        );
        assert_eq!(extract_error_message("plain text failure"), None);
    }
}
