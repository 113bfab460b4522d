//! Logo image generation module.

mod provider;
pub mod providers;
mod types;

pub use provider::LogoImageProvider;
pub use types::{GeneratedLogo, ImageFormat, ImageMetadata, LogoImageRequest};
