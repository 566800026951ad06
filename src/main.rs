//! Rating-Harvest main entry point
//!
//! Backs up the previous snapshot, harvests the configured scope, and reports
//! where the result was written.

use clap::Parser;
use rating_harvest::checkpoint::JsonFileStore;
use rating_harvest::config::{apply_env_overrides, load_config_with_hash, Config};
use rating_harvest::{GraphqlClient, Harvester};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Rating-Harvest: an incremental GraphQL harvester
///
/// Lists every professor at a school, fetches all of their ratings, and
/// rewrites a JSON snapshot after each professor.
#[derive(Parser, Debug)]
#[command(name = "rating-harvest")]
#[command(version = "1.0.0")]
#[command(about = "Incrementally harvest professors and their ratings", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (built-in defaults when omitted)
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            match load_config_with_hash(path) {
                Ok((cfg, hash)) => {
                    tracing::info!("Configuration loaded successfully (hash: {})", hash);
                    cfg
                }
                Err(e) => {
                    tracing::error!("Failed to load configuration: {}", e);
                    return Err(e.into());
                }
            }
        }
        None => {
            tracing::info!("No configuration file given, using defaults");
            Config::default()
        }
    };
    apply_env_overrides(&mut config);

    // Header encoding problems surface here, before anything is touched on disk
    let client = GraphqlClient::from_config(&config)?;

    let mut store = JsonFileStore::new(&config.output.snapshot_path);
    backup_previous_snapshot(&store, Path::new(&config.output.backup_dir));

    tracing::info!(
        "Harvesting scope {} (page sizes {}/{}, {}ms between requests)",
        config.crawl.scope_id,
        config.crawl.entity_page_size,
        config.crawl.subrecord_page_size,
        config.crawl.rate_limit_ms
    );

    let mut harvester = Harvester::new(client, config.crawl.clone());
    match harvester.run(config.crawl.scope_id, &mut store).await {
        Ok(result) => {
            if !harvester.failed_entities().is_empty() {
                tracing::warn!(
                    "{} entities were saved without comments: {}",
                    harvester.failed_entities().len(),
                    harvester.failed_entities().join(", ")
                );
            }
            tracing::info!("Saved {} entities", result.len());
            println!("all done to {}", store.path().display());
            Ok(())
        }
        Err(e) => {
            tracing::error!("Harvest failed: {}", e);
            Err(e.into())
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("rating_harvest=info,warn"),
            1 => EnvFilter::new("rating_harvest=debug,info"),
            2 => EnvFilter::new("rating_harvest=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Copies the previous snapshot aside; failures are logged, never fatal
fn backup_previous_snapshot(store: &JsonFileStore, backup_dir: &Path) {
    match store.backup(backup_dir) {
        Ok(Some(destination)) => {
            tracing::info!("Backed up previous snapshot to {}", destination.display())
        }
        Ok(None) => tracing::info!(
            "No previous snapshot at {}, skipping backup",
            store.path().display()
        ),
        Err(e) => tracing::warn!("Backup failed, continuing without one: {}", e),
    }
}
