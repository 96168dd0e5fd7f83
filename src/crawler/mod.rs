//! Harvest pipeline modules
//!
//! This module contains the core fetch-and-resolve logic:
//! - HTTP client construction
//! - Listing-id pagination
//! - Attribute resolution from detail payloads
//! - Detail fetching with per-item retry
//! - Semaphore-gated batch orchestration

mod client;
mod detail;
mod orchestrator;
mod paginator;
mod resolver;

pub use client::{build_http_client, format_user_agent};
pub use detail::fetch_detail;
pub use orchestrator::run_batches;
pub use paginator::collect_identifiers;
pub use resolver::resolve_field;

use crate::config::Config;
use crate::output::HarvestSummary;
use crate::record::{dedupe_records, AdRecord};
use crate::Result;
use std::sync::Arc;
use std::time::Instant;

/// Runs a complete harvest
///
/// This is the main entry point for the pipeline. It will:
/// 1. Build the shared HTTP client
/// 2. Collect listing ids from the paginated list endpoint
/// 3. Resolve each id to a record through the batched detail fetcher
/// 4. Deduplicate the accumulated records
///
/// # Arguments
///
/// * `config` - The harvest configuration
///
/// # Returns
///
/// * `Ok((records, summary))` - The deduplicated records and run summary
/// * `Err(HarvestError)` - Client construction failed or a worker panicked
pub async fn harvest(config: Config) -> Result<(Vec<AdRecord>, HarvestSummary)> {
    let start = Instant::now();

    let client = build_http_client(&config.api, &config.user_agent)?;
    let config = Arc::new(config);

    tracing::info!(
        "Collecting up to {} listing ids from {}",
        config.harvester.target_count,
        config.api.base_url
    );
    let identifiers = collect_identifiers(&client, &config).await;
    tracing::info!("Collected {} listing ids", identifiers.len());

    let identifiers_collected = identifiers.len();
    let batch_count = identifiers.len().div_ceil(config.harvester.batch_size);

    let records = run_batches(&client, &config, identifiers).await?;
    let records_fetched = records.len();

    let records = dedupe_records(records);
    tracing::info!(
        "Harvest complete: {} records retained ({} fetched) in {:.2}s",
        records.len(),
        records_fetched,
        start.elapsed().as_secs_f64()
    );

    let summary = HarvestSummary {
        identifiers_collected,
        records_fetched,
        records_retained: records.len(),
        batch_count,
        elapsed_secs: start.elapsed().as_secs_f64(),
    };

    Ok((records, summary))
}
