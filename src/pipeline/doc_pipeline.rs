use std::path::PathBuf;

use tracing::info;

use crate::checksum::{self, Digest, ZERO_DIGEST};
use crate::codegen::{CodeGenerator, write_atomic};
use crate::config::GeneratorConfig;
use crate::error::Result;
use crate::models::{AccessRecord, EndpointCatalog};
use crate::scraper::{AlphaVantageScraper, extract_from_bytes, sanitize};

/// How a run ended. Neither variant is a failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The canonical page matches the digest in the existing artifact.
    Unchanged { digest: Digest },
    Generated {
        path: PathBuf,
        record: AccessRecord,
        categories: usize,
        endpoints: usize,
    },
}

/// Sanitize, change gate, extract, generate. One run per invocation; the
/// caller serializes concurrent runs against the same output path.
pub struct DocPipeline {
    config: GeneratorConfig,
}

impl DocPipeline {
    pub fn new(config: GeneratorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Fetches the live page and runs the pipeline on it.
    pub async fn run(&self) -> Result<Outcome> {
        let scraper = AlphaVantageScraper::new(&self.config)?;
        let raw = scraper.fetch_documentation().await?;
        self.run_with_page(&raw)
    }

    /// Runs the pipeline on raw page bytes that were already fetched.
    pub fn run_with_page(&self, raw: &[u8]) -> Result<Outcome> {
        let canonical = sanitize(raw)?;

        let previous = if self.config.force {
            info!("Forced regeneration, ignoring previous checksum");
            ZERO_DIGEST
        } else {
            checksum::previous_digest(&self.config.output_path)?
        };

        let decision = checksum::should_regenerate(&canonical, &previous);
        if !decision.proceed {
            return Ok(Outcome::Unchanged {
                digest: decision.digest,
            });
        }

        info!("Parsing documentation page");
        let catalog = extract_from_bytes(&canonical)?;
        let record = AccessRecord::new(decision.digest);

        let text = CodeGenerator::new(&self.config)?.generate(&catalog, &record)?;
        write_atomic(&self.config.output_path, &text)?;

        Ok(Outcome::Generated {
            path: self.config.output_path.clone(),
            record,
            categories: catalog.len(),
            endpoints: catalog.endpoint_count(),
        })
    }

    /// Sanitizes and extracts without consulting or writing any artifact.
    pub fn catalog_from_page(&self, raw: &[u8]) -> Result<(EndpointCatalog, Digest)> {
        let canonical = sanitize(raw)?;
        let digest = checksum::digest(&canonical);
        let catalog = extract_from_bytes(&canonical)?;
        Ok((catalog, digest))
    }

    /// Digest of the canonical form of a raw page.
    pub fn page_digest(&self, raw: &[u8]) -> Result<Digest> {
        Ok(checksum::digest(&sanitize(raw)?))
    }
}
