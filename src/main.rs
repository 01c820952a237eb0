use alphavantage_apigen::checksum::{self, encode_digest};
use alphavantage_apigen::config::{DEFAULT_DOCUMENTATION_URL, DEFAULT_OUTPUT_PATH};
use alphavantage_apigen::scraper::AlphaVantageScraper;
use alphavantage_apigen::scraper::alphavantage_scraper::read_saved_page;
use alphavantage_apigen::{DocPipeline, GeneratorConfig, Outcome};
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "alphavantage-apigen")]
#[command(about = "Regenerate Alpha Vantage bindings from the published API documentation")]
struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct Source {
    /// Documentation page to fetch
    #[arg(long, env = "ALPHAVANTAGE_DOC_URL", default_value = DEFAULT_DOCUMENTATION_URL)]
    url: String,

    /// Read a saved copy of the page instead of fetching it
    #[arg(short, long)]
    input: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Regenerate the bindings if the documentation changed
    Generate {
        #[command(flatten)]
        source: Source,

        #[arg(short, long, env = "ALPHAVANTAGE_APIGEN_OUTPUT", default_value = DEFAULT_OUTPUT_PATH)]
        output: PathBuf,

        /// Regenerate even when the checksum matches
        #[arg(long)]
        force: bool,
    },
    /// Extract the endpoint catalog and save it as JSON
    Extract {
        #[command(flatten)]
        source: Source,

        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Show the checksum recorded in a generated file, and with --input or
    /// --url the checksum of that page
    Checksum {
        #[arg(default_value = DEFAULT_OUTPUT_PATH)]
        artifact: PathBuf,

        /// Documentation page to fetch and compare
        #[arg(long)]
        url: Option<String>,

        /// Saved copy of the page to compare
        #[arg(short, long)]
        input: Option<PathBuf>,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Generate {
            source,
            output,
            force,
        } => {
            let config = GeneratorConfig::default()
                .with_documentation_url(&source.url)
                .with_output(output)
                .with_force(force);
            let pipeline = DocPipeline::new(config);

            let outcome = match &source.input {
                Some(path) => pipeline.run_with_page(&read_saved_page(path)?)?,
                None => pipeline.run().await?,
            };

            match outcome {
                Outcome::Unchanged { .. } => {
                    println!("No change to API documentation since previous generation");
                }
                Outcome::Generated {
                    path,
                    categories,
                    endpoints,
                    ..
                } => {
                    println!(
                        "Generated {} endpoints in {} categories: {}",
                        endpoints,
                        categories,
                        path.display()
                    );
                }
            }
        }
        Commands::Extract { source, output } => {
            let config = GeneratorConfig::default().with_documentation_url(&source.url);
            let raw = load_page(&config, &source).await?;
            let (catalog, digest) = DocPipeline::new(config).catalog_from_page(&raw)?;

            let output_path = output.unwrap_or_else(|| PathBuf::from("data/scraped/catalog.json"));
            if let Some(parent) = output_path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&output_path, serde_json::to_string_pretty(&catalog)?)
                .with_context(|| format!("writing {}", output_path.display()))?;
            println!(
                "Catalog ({} endpoints, checksum {}) saved to: {}",
                catalog.endpoint_count(),
                encode_digest(&digest),
                output_path.display()
            );
        }
        Commands::Checksum {
            artifact,
            url,
            input,
        } => {
            let recorded = checksum::previous_digest(&artifact)?;
            println!("{}: {}", artifact.display(), encode_digest(&recorded));

            if input.is_some() || url.is_some() {
                let source = Source {
                    url: url.unwrap_or_else(|| DEFAULT_DOCUMENTATION_URL.to_string()),
                    input,
                };
                let config = GeneratorConfig::default().with_documentation_url(&source.url);
                let raw = load_page(&config, &source).await?;
                let digest = DocPipeline::new(config).page_digest(&raw)?;
                let status = if digest == recorded { "unchanged" } else { "changed" };
                println!("current page: {} ({status})", encode_digest(&digest));
            }
        }
    }

    Ok(())
}

async fn load_page(config: &GeneratorConfig, source: &Source) -> Result<Vec<u8>> {
    let page = match &source.input {
        Some(path) => read_saved_page(path)?,
        None => AlphaVantageScraper::new(config)?.fetch_documentation().await?,
    };
    Ok(page)
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose {
        "alphavantage_apigen=debug"
    } else {
        "alphavantage_apigen=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}
