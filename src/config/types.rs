use serde::Deserialize;

/// Main configuration structure for Adharvest
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub harvester: HarvesterConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub output: OutputConfig,
}

/// Endpoint configuration for the listing gateway
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the gateway (list and detail endpoints live under it)
    #[serde(rename = "base-url", default = "default_base_url")]
    pub base_url: String,

    /// Listing category filter (`cg` query parameter)
    #[serde(rename = "category-id", default = "default_category_id")]
    pub category_id: u32,

    /// Region filter (`region_v2` query parameter)
    #[serde(rename = "region-id", default = "default_region_id")]
    pub region_id: u32,

    /// Per-request timeout in seconds
    #[serde(rename = "timeout-secs", default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Harvester pacing and retry configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HarvesterConfig {
    /// How many listing ids to collect before detail fetching starts
    #[serde(rename = "target-count", default = "default_target_count")]
    pub target_count: usize,

    /// Listing ids requested per list-endpoint page
    #[serde(rename = "page-size", default = "default_page_size")]
    pub page_size: usize,

    /// Identifiers processed per concurrent fan-out
    #[serde(rename = "batch-size", default = "default_batch_size")]
    pub batch_size: usize,

    /// Pause between batches (milliseconds)
    #[serde(rename = "batch-pause-ms", default = "default_batch_pause_ms")]
    pub batch_pause_ms: u64,

    /// Maximum detail requests in flight at once
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Attempts per identifier before it is dropped
    #[serde(rename = "retry-attempts", default = "default_retry_attempts")]
    pub retry_attempts: u32,

    /// Delay between attempts for one identifier (milliseconds)
    #[serde(rename = "retry-delay-ms", default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the harvester
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the harvester
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the harvester
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for harvester-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path the deduplicated record set is written to
    #[serde(rename = "csv-path")]
    pub csv_path: String,
}

fn default_base_url() -> String {
    "https://gateway.chotot.com".to_string()
}

fn default_category_id() -> u32 {
    2010
}

fn default_region_id() -> u32 {
    12000
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_target_count() -> usize {
    3000
}

fn default_page_size() -> usize {
    20
}

fn default_batch_size() -> usize {
    200
}

fn default_batch_pause_ms() -> u64 {
    5000
}

fn default_concurrency() -> usize {
    10
}

fn default_retry_attempts() -> u32 {
    5
}

fn default_retry_delay_ms() -> u64 {
    1000
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            category_id: default_category_id(),
            region_id: default_region_id(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for HarvesterConfig {
    fn default() -> Self {
        Self {
            target_count: default_target_count(),
            page_size: default_page_size(),
            batch_size: default_batch_size(),
            batch_pause_ms: default_batch_pause_ms(),
            concurrency: default_concurrency(),
            retry_attempts: default_retry_attempts(),
            retry_delay_ms: default_retry_delay_ms(),
        }
    }
}
