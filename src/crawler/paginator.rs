//! Listing-id pagination
//!
//! Walks the list endpoint at increasing offsets until the target count is
//! reached or the endpoint stops producing ids. Failures at this layer end
//! pagination early instead of aborting the run; the detail stage works
//! with whatever was collected.

use crate::config::Config;
use reqwest::Client;
use serde::Deserialize;

/// One page of the list endpoint's response
#[derive(Debug, Deserialize)]
struct ListPage {
    #[serde(default)]
    ads: Vec<AdSummary>,
}

/// The slice of an ad summary the harvester cares about
#[derive(Debug, Deserialize)]
struct AdSummary {
    list_id: u64,
}

/// Collects listing identifiers from the paginated list endpoint
///
/// Issues successive page requests at offsets 0, page-size, 2×page-size, …
/// and concatenates the returned ids in order. Pagination stops when:
/// - the running total reaches the configured target count,
/// - a page returns fewer ids than requested (end of results, kept),
/// - a page returns a non-success status or an undecodable body (logged,
///   treated as end of results).
///
/// The final page may push the total slightly past the target; downstream
/// batches consume exactly what was collected.
///
/// # Arguments
///
/// * `client` - The shared HTTP client
/// * `config` - The harvest configuration
///
/// # Returns
///
/// The ordered list of collected identifiers
pub async fn collect_identifiers(client: &Client, config: &Config) -> Vec<u64> {
    let endpoint = format!("{}/v1/public/ad-listing", config.api.base_url);
    let mut identifiers: Vec<u64> = Vec::new();
    let mut offset = 0usize;

    while identifiers.len() < config.harvester.target_count {
        let response = client
            .get(&endpoint)
            .query(&[
                ("limit", config.harvester.page_size as u64),
                ("o", offset as u64),
                ("cg", config.api.category_id as u64),
                ("region_v2", config.api.region_id as u64),
            ])
            .send()
            .await;

        let response = match response {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!("List request at offset {} failed: {}", offset, e);
                break;
            }
        };

        if !response.status().is_success() {
            tracing::warn!(
                "List request at offset {} returned HTTP {}, stopping pagination",
                offset,
                response.status().as_u16()
            );
            break;
        }

        let page: ListPage = match response.json().await {
            Ok(p) => p,
            Err(e) => {
                tracing::warn!("Undecodable list page at offset {}: {}", offset, e);
                break;
            }
        };

        if page.ads.is_empty() {
            tracing::info!("Empty page at offset {}, end of results", offset);
            break;
        }

        identifiers.extend(page.ads.iter().map(|ad| ad.list_id));
        tracing::info!(
            "Collected {} ids (+{} at offset {})",
            identifiers.len(),
            page.ads.len(),
            offset
        );

        // A short page means the listing is exhausted; asking again at the
        // next offset would only return an empty page.
        if page.ads.len() < config.harvester.page_size {
            tracing::info!("Short page at offset {}, end of results", offset);
            break;
        }

        offset += config.harvester.page_size;
    }

    identifiers
}
