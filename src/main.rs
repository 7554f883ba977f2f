//! Content Testing Warnings - command line runner
//!
//! Runs the content editor warnings processor once against a TOML fixture
//! and prints the warnings the editor would see.
//!
//! # Usage
//!
//! ```bash
//! content-testing-warnings --fixture demos/fixture.toml \
//!     --item "sitecore://master/home?lang=en&ver=1"
//!
//! # JSON output for tooling
//! content-testing-warnings --fixture demos/fixture.toml --item ... --json
//! ```
//!
//! # Environment Variables
//!
//! - `CONTENT_TESTING_CONFIG`: Path to the config TOML when `--config` is not given;
//!   a missing or broken file logs a warning and falls back (default: ./content_testing.toml)
//! - `RUST_LOG`: Logging level (default: info)

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};

use content_testing_warnings::config::{self, TestingConfig};
use content_testing_warnings::fixture::Fixture;
use content_testing_warnings::{ContentEditorWarningsArgs, ItemUri, WarningsProcessor};

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "content-testing-warnings")]
#[command(about = "Show content testing warnings for an item under edit")]
#[command(version)]
struct CliArgs {
    /// Fixture describing items, tests, data sources and candidates
    #[arg(long, value_name = "PATH")]
    fixture: PathBuf,

    /// Item under edit, e.g. "sitecore://master/home?lang=en&ver=1"
    #[arg(long, value_name = "URI")]
    item: ItemUri,

    /// Config TOML, loaded strictly. When omitted, `$CONTENT_TESTING_CONFIG`,
    /// then ./content_testing.toml, then built-in defaults
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Print warnings as JSON
    #[arg(long)]
    json: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    log_json: bool,
}

fn main() -> Result<()> {
    let args = CliArgs::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    if args.log_json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }

    let testing_config = match &args.config {
        Some(path) => TestingConfig::load_from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => TestingConfig::load(),
    };
    config::init(testing_config);

    let fixture = Fixture::load_from_file(&args.fixture)
        .with_context(|| format!("loading fixture {}", args.fixture.display()))?;
    let collaborators = fixture
        .build(config::get().testing.candidate_initiator)
        .context("building collaborators from fixture")?;

    let item = fixture.item(&args.item)?;
    if item.is_none() {
        warn!(item = %args.item, "Item not declared in fixture, processing as unresolved");
    }

    let processor = WarningsProcessor::with_global_config(collaborators);
    let mut request = ContentEditorWarningsArgs::new(item);
    processor
        .process(&mut request)
        .with_context(|| format!("collecting warnings for {}", args.item))?;

    info!(item = %args.item, warnings = request.warnings.len(), "Warnings collected");

    if args.json {
        println!("{}", serde_json::to_string_pretty(&request.warnings)?);
    } else if request.warnings.is_empty() {
        println!("No warnings.");
    } else {
        for warning in &request.warnings {
            println!("{}", warning.title);
            println!("  {}", warning.text);
            for option in &warning.options {
                println!("  [{}] -> {}", option.label, option.command);
            }
        }
    }

    Ok(())
}
