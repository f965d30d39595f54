//! Portfolio content resolution.
//!
//! This module provides:
//! - The typed content model (`PortfolioConfig` and its items)
//! - Raw document normalization and validation
//! - The content store seam and its Sanity implementation
//! - The static JSON/JSONC fallback document
//! - The memoizing, single-flight `ConfigResolver`

pub mod document;
pub mod error;
pub mod fallback;
pub mod jsonc;
pub mod model;
pub mod resolver;
pub mod store;

pub use document::{decode, inspect, Rejection};
pub use error::{ConfigError, Origin, QueryError, Violation};
pub use fallback::StaticDocument;
pub use model::{
    Article, CaseStudy, MakerProject, Placeholder, PortfolioConfig, Release, Resource,
    Testimonial,
};
pub use resolver::{ConfigResolver, Resolution, ResolutionState};
pub use store::{ContentStore, SanitySettings, SanityStore};
