//! HTTP client construction
//!
//! One `reqwest::Client` is built at startup and shared across every task
//! in the run; it is internally reference-counted and safe for concurrent
//! use.

use crate::config::{ApiConfig, UserAgentConfig};
use reqwest::Client;
use std::time::Duration;

/// Formats the descriptive client identity header
///
/// Format: HarvesterName/Version (+ContactURL; ContactEmail)
pub fn format_user_agent(config: &UserAgentConfig) -> String {
    format!(
        "{}/{} (+{}; {})",
        config.crawler_name, config.crawler_version, config.contact_url, config.contact_email
    )
}

/// Builds the shared HTTP client
///
/// # Arguments
///
/// * `api` - Endpoint configuration (supplies the per-request timeout)
/// * `user_agent` - The client identity configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(
    api: &ApiConfig,
    user_agent: &UserAgentConfig,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(format_user_agent(user_agent))
        .timeout(Duration::from_secs(api.timeout_secs))
        .connect_timeout(Duration::from_secs(api.timeout_secs))
        .gzip(true)
        .brotli(true)
        .build()
}
