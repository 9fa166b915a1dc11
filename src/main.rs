use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use sitebrief::{report, ExtractionOutcome, Extractor, ScraperConfig};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// The company homepage, e.g. https://www.example.com
    url: String,
    /// A TOML, YAML or JSON configuration file
    #[arg(long, env = "SITEBRIEF_CONFIG")]
    config: Option<PathBuf>,
    /// Also write the JSON document to this file
    #[arg(long)]
    output: Option<PathBuf>,
    /// How to print the result
    #[arg(long, value_enum, default_value_t = Format::Json)]
    format: Format,
    /// Skip the headless browser and use plain HTTP only
    #[arg(long)]
    no_browser: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Json,
    Text,
}

/// The main entry point of the application.
///
/// Loads `.env` and the configuration, extracts the company profile for the
/// given URL and prints it.
#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = ScraperConfig::load(cli.config.as_deref())?;
    if cli.no_browser {
        config.browser.enabled = false;
    }

    let progress = ProgressBar::new_spinner();
    progress.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .context("invalid progress template")?,
    );
    progress.enable_steady_tick(Duration::from_millis(120));

    let extractor = Extractor::from_config(&config)?.with_progress(progress);

    let start_time = Instant::now();
    let outcome = extractor.extract_company_info(&cli.url).await;
    info!("Processing time: {:.2?}", start_time.elapsed());

    let document = match outcome {
        ExtractionOutcome::Document(document) => document,
        ExtractionOutcome::Error { error } => {
            println!("{}", serde_json::json!({ "error": &error }));
            bail!(error);
        }
    };

    if let Some(path) = &cli.output {
        report::save_json(&document, path)?;
    }

    match cli.format {
        Format::Json => println!("{}", serde_json::to_string_pretty(&document)?),
        Format::Text => println!("{}", report::render_text(&document)),
    }

    Ok(())
}
