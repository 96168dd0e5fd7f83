//! Adharvest main entry point
//!
//! Command-line interface for the classified-ad listing harvester.

use adharvest::config::load_config_with_hash;
use adharvest::crawler::harvest;
use adharvest::output::{print_summary, write_csv};
use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Adharvest: a concurrent classified-ad listing harvester
///
/// Adharvest collects listing ids from a paginated list endpoint, resolves
/// each id to a detail record under a fixed concurrency cap with per-item
/// retries, and writes the deduplicated record set as CSV.
#[derive(Parser, Debug)]
#[command(name = "adharvest")]
#[command(version = "1.0.0")]
#[command(about = "A concurrent classified-ad listing harvester", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be harvested without fetching
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    handle_harvest(config).await
}

/// Installs the tracing subscriber with a verbosity-mapped filter
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("adharvest=info,warn"),
            1 => EnvFilter::new("adharvest=debug,info"),
            2 => EnvFilter::new("adharvest=trace,debug"),
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

/// Handles the --dry-run mode: validates config and shows the run plan
fn handle_dry_run(config: &adharvest::config::Config) {
    println!("=== Adharvest Dry Run ===\n");

    println!("Endpoint:");
    println!("  Base URL: {}", config.api.base_url);
    println!("  Category: {}", config.api.category_id);
    println!("  Region: {}", config.api.region_id);
    println!("  Timeout: {}s", config.api.timeout_secs);

    println!("\nHarvester:");
    println!("  Target count: {}", config.harvester.target_count);
    println!("  Page size: {}", config.harvester.page_size);
    println!("  Batch size: {}", config.harvester.batch_size);
    println!("  Batch pause: {}ms", config.harvester.batch_pause_ms);
    println!("  Concurrency: {}", config.harvester.concurrency);
    println!(
        "  Retries: {} attempts, {}ms apart",
        config.harvester.retry_attempts, config.harvester.retry_delay_ms
    );

    println!("\nUser Agent:");
    println!("  Name: {}", config.user_agent.crawler_name);
    println!("  Version: {}", config.user_agent.crawler_version);
    println!("  Contact URL: {}", config.user_agent.contact_url);
    println!("  Contact Email: {}", config.user_agent.contact_email);

    println!("\nOutput:");
    println!("  CSV: {}", config.output.csv_path);

    println!("\n✓ Configuration is valid");
    println!(
        "✓ Would collect up to {} listings in batches of {}",
        config.harvester.target_count, config.harvester.batch_size
    );
}

/// Handles the main harvest operation
async fn handle_harvest(config: adharvest::config::Config) -> anyhow::Result<()> {
    let csv_path = PathBuf::from(&config.output.csv_path);

    let (records, summary) = harvest(config).await.context("harvest failed")?;

    write_csv(&records, &csv_path)
        .with_context(|| format!("failed to write {}", csv_path.display()))?;
    tracing::info!("Wrote {} records to {}", records.len(), csv_path.display());

    print_summary(&summary);

    Ok(())
}
