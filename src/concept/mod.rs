//! Logo concept (text) generation module.

mod provider;
pub mod providers;
mod types;

pub use provider::ConceptProvider;
pub use types::{ConceptMetadata, ConceptRequest, LogoConcept};
