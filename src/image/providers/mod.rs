//! Logo image provider implementations.

mod gemini;

pub use gemini::{GeminiImageModel, GeminiImageProvider, GeminiImageProviderBuilder};
