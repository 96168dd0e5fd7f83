//! Detail fetching with per-item retry
//!
//! Resolves one listing id into an [`AdRecord`]. Every failure class
//! (transport error, non-success status, undecodable body, missing ad
//! object, record without signal fields) consumes one attempt from the
//! same retry budget; a successful HTTP response with useless content is
//! not distinguished from a network error. Exhaustion is a soft failure:
//! the caller gets `None` and the batch carries on.

use crate::config::Config;
use crate::crawler::resolver::resolve_field;
use crate::record::AdRecord;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

/// Why one fetch attempt failed
#[derive(Debug, Error)]
enum AttemptError {
    #[error("HTTP {0}")]
    Status(u16),

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("response has no ad object")]
    EmptyAd,

    #[error("record is missing both signal fields")]
    Incomplete,
}

/// The decoded detail payload
#[derive(Debug, Deserialize)]
struct DetailPayload {
    #[serde(default)]
    ad: Value,

    #[serde(default)]
    params: Vec<Value>,

    #[serde(default)]
    parameters: Vec<Value>,
}

/// Fetches the detail record for one listing id
///
/// Performs up to `retry-attempts` attempts, sleeping `retry-delay-ms`
/// between them. Each failed attempt is logged with the id and attempt
/// number; after the budget is exhausted the id is given up on and `None`
/// is returned.
///
/// # Arguments
///
/// * `client` - The shared HTTP client
/// * `config` - The harvest configuration
/// * `id` - The listing identifier to resolve
///
/// # Returns
///
/// * `Some(AdRecord)` - The resolved record
/// * `None` - The retry budget is exhausted (soft failure)
pub async fn fetch_detail(client: &Client, config: &Config, id: u64) -> Option<AdRecord> {
    let retries = config.harvester.retry_attempts;

    for attempt in 1..=retries {
        match attempt_fetch(client, config, id).await {
            Ok(record) => return Some(record),
            Err(e) => {
                tracing::warn!("Listing {} attempt {}/{} failed: {}", id, attempt, retries, e);

                if attempt < retries {
                    tokio::time::sleep(Duration::from_millis(config.harvester.retry_delay_ms))
                        .await;
                }
            }
        }
    }

    tracing::warn!("Giving up on listing {} after {} attempts", id, retries);
    None
}

/// One fetch attempt: request, decode, resolve, validate
async fn attempt_fetch(client: &Client, config: &Config, id: u64) -> Result<AdRecord, AttemptError> {
    let endpoint = format!("{}/v1/public/ad-listing/{}", config.api.base_url, id);

    let response = client.get(&endpoint).send().await?;

    if !response.status().is_success() {
        return Err(AttemptError::Status(response.status().as_u16()));
    }

    let payload: DetailPayload = response.json().await?;

    let has_ad = payload
        .ad
        .as_object()
        .map(|o| !o.is_empty())
        .unwrap_or(false);
    if !has_ad {
        return Err(AttemptError::EmptyAd);
    }

    let record = build_record(&payload);
    if !record.has_signal() {
        return Err(AttemptError::Incomplete);
    }

    Ok(record)
}

/// Builds the normalized record from a decoded payload
fn build_record(payload: &DetailPayload) -> AdRecord {
    let ad = &payload.ad;
    let params = payload.params.as_slice();
    let parameters = payload.parameters.as_slice();

    AdRecord {
        post_date: post_date_from_millis(ad.get("list_time")),
        production_year: resolve_field(ad, params, parameters, "mfdate"),
        origin: resolve_field(ad, params, parameters, "carorigin"),
        location: resolve_field(ad, params, parameters, "address"),
        body_type: resolve_field(ad, params, parameters, "cartype"),
        odometer: resolve_field(ad, params, parameters, "mileage_v2"),
        transmission: resolve_field(ad, params, parameters, "gearbox"),
        condition: resolve_field(ad, params, parameters, "condition_ad"),
        fuel: resolve_field(ad, params, parameters, "fuel"),
        price: ad.get("price").and_then(Value::as_i64).unwrap_or(0),
    }
}

/// Renders a millisecond epoch timestamp as `YYYY-MM-DD` (UTC)
///
/// Absence or an unparseable value yields an empty string, not an error.
fn post_date_from_millis(list_time: Option<&Value>) -> String {
    let millis = match list_time {
        Some(Value::Number(n)) => n.as_i64(),
        Some(Value::String(s)) => s.parse::<i64>().ok(),
        _ => None,
    };

    millis
        .and_then(|ms| chrono::DateTime::from_timestamp(ms / 1000, 0))
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}
