use std::path::Path;

use tracing::info;

use crate::config::GeneratorConfig;
use crate::error::{ApiGenError, Result};

/// Fetches the raw documentation page.
pub struct AlphaVantageScraper {
    documentation_url: String,
    client: reqwest::Client,
}

impl AlphaVantageScraper {
    pub fn new(config: &GeneratorConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout)
            .build()
            .map_err(|source| ApiGenError::Fetch {
                url: config.documentation_url.clone(),
                source,
            })?;

        Ok(Self {
            documentation_url: config.documentation_url.clone(),
            client,
        })
    }

    /// One GET, no retries. A non-success status is a fetch failure.
    pub async fn fetch_documentation(&self) -> Result<Vec<u8>> {
        info!(url = %self.documentation_url, "Fetching documentation page");

        let fetch_err = |source| ApiGenError::Fetch {
            url: self.documentation_url.clone(),
            source,
        };

        let response = self
            .client
            .get(&self.documentation_url)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(fetch_err)?;
        let body = response.bytes().await.map_err(fetch_err)?;

        info!(bytes = body.len(), "Successfully fetched documentation page");
        Ok(body.to_vec())
    }
}

/// Reads a previously saved copy of the page instead of fetching it.
pub fn read_saved_page(path: &Path) -> Result<Vec<u8>> {
    let page = std::fs::read(path).map_err(|source| ApiGenError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), bytes = page.len(), "Read saved documentation page");
    Ok(page)
}
