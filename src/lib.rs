#![warn(missing_docs)]
//! LogoForge - logo concept and image generation via the Gemini API.
//!
//! Turns a short brand description into a written logo concept and,
//! optionally, a rendered logo image. Generation attempts are capped by a
//! persistent per-day quota, and provider failures are mapped to stable
//! user-facing categories.
//!
//! # Quick Start
//!
//! ```no_run
//! use logoforge::concept::{ConceptProvider, ConceptRequest};
//! use logoforge::concept::providers::GeminiConceptProvider;
//!
//! #[tokio::main]
//! async fn main() -> logoforge::Result<()> {
//!     let provider = GeminiConceptProvider::builder().build()?;
//!     let request = ConceptRequest::new("an artisan coffee roastery");
//!     let concept = provider.generate(&request).await?;
//!     println!("{}", concept.text);
//!     Ok(())
//! }
//! ```
//!
//! # Quota
//!
//! ```
//! use logoforge::quota::{MemoryStore, QuotaTracker, SystemClock, DEFAULT_DAILY_LIMIT};
//!
//! let tracker = QuotaTracker::new(MemoryStore::new(), SystemClock, DEFAULT_DAILY_LIMIT);
//! assert!(tracker.try_reserve());
//! tracker.rollback();
//! assert_eq!(tracker.current_count(), 0);
//! ```

mod error;

pub mod concept;
pub mod image;
pub mod quota;

#[cfg(feature = "server")]
pub mod server;

// Re-export error types at crate root
pub use error::{classify, LogoForgeError, Result};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::concept::providers::GeminiConceptProvider;
    pub use crate::concept::{ConceptProvider, ConceptRequest, LogoConcept};
    pub use crate::error::{classify, LogoForgeError, Result};
    pub use crate::image::providers::GeminiImageProvider;
    pub use crate::image::{GeneratedLogo, LogoImageProvider, LogoImageRequest};
    pub use crate::quota::{QuotaTracker, SystemClock};
}
