//! Logo image provider trait.

use crate::error::Result;
use crate::image::types::{GeneratedLogo, LogoImageRequest};
use async_trait::async_trait;

/// Trait for logo image generation providers.
#[async_trait]
pub trait LogoImageProvider: Send + Sync {
    /// Renders a logo image from the given request.
    async fn generate(&self, request: &LogoImageRequest) -> Result<GeneratedLogo>;

    /// Returns the name of this provider for display.
    fn name(&self) -> &str;
}
