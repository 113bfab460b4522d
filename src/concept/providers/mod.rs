//! Concept provider implementations.

mod gemini;

pub use gemini::{GeminiConceptProvider, GeminiConceptProviderBuilder, GeminiTextModel};
