//! Finn-Harvest main entry point
//!
//! This is the command-line interface for the listing harvester.

use anyhow::Context;
use clap::{CommandFactory, Parser};
use finn_harvest::config::{load_config, validate};
use finn_harvest::{Config, Harvester, ListingId};
use std::path::PathBuf;
use std::str::FromStr;
use tracing_subscriber::EnvFilter;

/// Finn-Harvest: a polite listing snapshot harvester
///
/// Downloads listing pages (and optionally their images) into a local cache,
/// discovers sold listings from the map search, and extracts structured
/// fields from cached pages.
#[derive(Parser, Debug)]
#[command(name = "finn-harvest")]
#[command(version)]
#[command(about = "A polite listing snapshot harvester", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Data directory where all crawled information is stored
    #[arg(long, value_name = "DIR")]
    data: Option<PathBuf>,

    /// Listing to download into the cache; nothing is done if it is already cached
    #[arg(long, value_name = "ID")]
    get: Option<ListingId>,

    /// Force a refresh even if the listing is already cached
    #[arg(short, long)]
    refresh: bool,

    /// Download the images of each listing
    #[arg(long)]
    image: bool,

    /// List all sold listings
    #[arg(long)]
    list: bool,

    /// Download every listed listing
    #[arg(long, requires = "list")]
    download: bool,

    /// Extract and print one cached listing, or `all` of them
    #[arg(long, value_name = "ID|all")]
    parse: Option<ParseTarget>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

/// Listings selected by `--parse`
#[derive(Debug, Clone, Copy)]
enum ParseTarget {
    All,
    One(ListingId),
}

impl FromStr for ParseTarget {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        s.parse().map(Self::One).map_err(|e| e.to_string())
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    if cli.get.is_none() && !cli.list && cli.parse.is_none() {
        Cli::command().print_help()?;
        return Ok(());
    }

    let config = build_config(&cli)?;
    let harvester = Harvester::new(config)?;
    let force = harvester.config().fetch.force_refresh;

    // Explicit downloads first
    if let Some(id) = cli.get {
        harvester.fetch(id, force).await?;
    }

    if cli.list {
        let ids = harvester.enumerate_sold().await?;
        for (i, id) in ids.iter().enumerate() {
            if cli.download {
                harvester.fetch(*id, force).await?;
            }
            println!("{} {}", i, id);
        }
    }

    if let Some(target) = cli.parse {
        let ids = match target {
            ParseTarget::All => harvester.cached_identifiers().await?,
            ParseTarget::One(id) => vec![id],
        };
        for id in ids {
            let record = harvester.extract(id).await?;
            println!("{}", serde_json::to_string(&record)?);
        }
    }

    Ok(())
}

/// Loads the configuration file, if any, and applies command-line overrides
fn build_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?
        }
        None => Config::default(),
    };

    if let Some(data) = &cli.data {
        config.storage.data_dir = data.clone();
    }
    config.fetch.force_refresh |= cli.refresh;
    config.fetch.download_images |= cli.image;

    validate(&config)?;
    Ok(config)
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("finn_harvest=info,warn"),
            1 => EnvFilter::new("finn_harvest=debug,info"),
            2 => EnvFilter::new("finn_harvest=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_writer(std::io::stderr)
        .init();
}
