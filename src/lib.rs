//! Keeps generated Alpha Vantage bindings in sync with the provider's
//! documentation page.
//!
//! The page is sanitized of per-request values, fingerprinted, and only when
//! the fingerprint differs from the one recorded in the existing artifact is
//! it parsed into an [`models::EndpointCatalog`] and rendered to Rust source.

pub mod checksum;
pub mod codegen;
pub mod config;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod scraper;

pub use config::GeneratorConfig;
pub use error::{ApiGenError, Result};
pub use pipeline::{DocPipeline, Outcome};
