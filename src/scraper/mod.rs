pub mod alphavantage_scraper;
pub mod dom;
pub mod extract;
pub mod sanitize;

pub use alphavantage_scraper::AlphaVantageScraper;
pub use extract::{extract, extract_from_bytes};
pub use sanitize::sanitize;
