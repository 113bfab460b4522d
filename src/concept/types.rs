//! Core types for logo concept generation.

use serde::{Deserialize, Serialize};

/// A request to write a logo concept from a short brand description.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConceptRequest {
    /// Short user-supplied description of the brand or product.
    pub description: String,
    /// Optional style direction (e.g. "minimalist", "vintage").
    pub style: Option<String>,
}

impl ConceptRequest {
    /// Creates a new request with the given brand description.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            style: None,
        }
    }

    /// Sets a style direction for the concept.
    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.style = Some(style.into());
        self
    }
}

/// Metadata about the concept generation call.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConceptMetadata {
    /// Model used for generation.
    pub model: Option<String>,
    /// Generation duration in milliseconds.
    pub duration_ms: Option<u64>,
}

/// A generated logo concept: the written description plus call metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogoConcept {
    /// The concept text produced by the model.
    pub text: String,
    /// Generation metadata.
    pub metadata: ConceptMetadata,
}

impl LogoConcept {
    /// Creates a new concept.
    pub fn new(text: String, metadata: ConceptMetadata) -> Self {
        Self { text, metadata }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_builder() {
        let req = ConceptRequest::new("artisan coffee roastery").with_style("vintage");
        assert_eq!(req.description, "artisan coffee roastery");
        assert_eq!(req.style.as_deref(), Some("vintage"));
    }

    #[test]
    fn test_request_without_style() {
        let req = ConceptRequest::new("a drone repair shop");
        assert!(req.style.is_none());
    }
}
