//! Concept provider trait.

use crate::concept::types::{ConceptRequest, LogoConcept};
use crate::error::Result;
use async_trait::async_trait;

/// Trait for logo concept (text) generation providers.
#[async_trait]
pub trait ConceptProvider: Send + Sync {
    /// Writes a logo concept for the given request.
    async fn generate(&self, request: &ConceptRequest) -> Result<LogoConcept>;

    /// Returns the name of this provider for display.
    fn name(&self) -> &str;
}
