//! Batch orchestration and concurrency control
//!
//! Identifiers are partitioned into fixed-size batches processed strictly
//! in order. Within a batch every identifier gets its own task, but all
//! tasks in the run share one semaphore, so a 200-listing batch still
//! drains through the configured number of concurrent slots. A batch's
//! results are merged only once every one of its tasks has resolved;
//! between batches the whole pipeline pauses.

use crate::config::Config;
use crate::crawler::detail::fetch_detail;
use crate::record::AdRecord;
use crate::Result;
use futures::future::try_join_all;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;

/// Runs the detail-fetch pipeline over the collected identifiers
///
/// One task is spawned per identifier; each must take a permit from the
/// run-wide semaphore before its fetch body runs, and the permit is
/// released by drop on every exit path, so slots cannot leak. An
/// identifier whose retry budget is exhausted resolves to `None` and never
/// cancels its siblings; a task panic is the only fatal path and surfaces
/// as [`crate::HarvestError::Task`].
///
/// # Arguments
///
/// * `client` - The shared HTTP client
/// * `config` - The harvest configuration
/// * `identifiers` - The ids to resolve, in collection order
///
/// # Returns
///
/// All successfully resolved records, in batch order (order within a batch
/// follows task completion and is unspecified).
pub async fn run_batches(
    client: &Client,
    config: &Arc<Config>,
    identifiers: Vec<u64>,
) -> Result<Vec<AdRecord>> {
    let batch_size = config.harvester.batch_size;
    let total_batches = identifiers.len().div_ceil(batch_size);

    // One admission gate for the whole run, never reset per batch
    let semaphore = Arc::new(Semaphore::new(config.harvester.concurrency));

    let mut records: Vec<AdRecord> = Vec::new();

    for (batch_index, batch) in identifiers.chunks(batch_size).enumerate() {
        tracing::info!(
            "Processing batch {}/{} ({} listings)",
            batch_index + 1,
            total_batches,
            batch.len()
        );

        let tasks: Vec<_> = batch
            .iter()
            .map(|&id| {
                let semaphore = Arc::clone(&semaphore);
                let client = client.clone();
                let config = Arc::clone(config);

                tokio::spawn(async move {
                    // The permit covers the whole fetch, retries included
                    let _permit = semaphore.acquire_owned().await.ok()?;
                    fetch_detail(&client, &config, id).await
                })
            })
            .collect();

        // Wait for the entire batch; a panicked worker aborts the run
        let results = try_join_all(tasks).await?;
        records.extend(results.into_iter().flatten());

        tracing::info!(
            "Batch {}/{} complete, {} records so far",
            batch_index + 1,
            total_batches,
            records.len()
        );

        if batch_index + 1 < total_batches {
            tokio::time::sleep(Duration::from_millis(config.harvester.batch_pause_ms)).await;
        }
    }

    Ok(records)
}
