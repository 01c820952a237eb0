use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_DOCUMENTATION_URL: &str = "https://www.alphavantage.co/documentation/";
pub const DEFAULT_OUTPUT_PATH: &str = "src/api_generated.rs";
pub const DEFAULT_WRAP_WIDTH: usize = 100;

/// Resolved settings for one pipeline run.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub documentation_url: String,
    pub output_path: PathBuf,
    pub user_agent: String,
    pub timeout: Duration,
    /// Regenerate even when the page digest matches the artifact footer.
    pub force: bool,
    /// Column at which doc comment prose is wrapped.
    pub wrap_width: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            documentation_url: DEFAULT_DOCUMENTATION_URL.to_string(),
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            user_agent: concat!("alphavantage-apigen/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout: Duration::from_secs(30),
            force: false,
            wrap_width: DEFAULT_WRAP_WIDTH,
        }
    }
}

impl GeneratorConfig {
    pub fn with_output(mut self, output_path: impl Into<PathBuf>) -> Self {
        self.output_path = output_path.into();
        self
    }

    pub fn with_documentation_url(mut self, url: impl Into<String>) -> Self {
        self.documentation_url = url.into();
        self
    }

    pub fn with_force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    /// Link to one section of the documentation page.
    pub fn anchor_url(&self, link_name: &str) -> String {
        format!("{}#{link_name}", self.documentation_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anchor_url_appends_fragment() {
        let config = GeneratorConfig::default();
        assert_eq!(
            config.anchor_url("intraday"),
            "https://www.alphavantage.co/documentation/#intraday"
        );
    }
}
