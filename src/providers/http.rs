//! Shared HTTP client construction for the remote providers

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};

const USER_AGENT: &str = concat!("weather-route/", env!("CARGO_PKG_VERSION"));

/// A client that retries transient failures (connect errors, 5xx, 429)
/// with exponential backoff
pub fn retrying_client(timeout: Duration, max_retries: u32) -> Result<ClientWithMiddleware> {
    let client = reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()
        .context("Failed to create HTTP client")?;

    let retry_policy = ExponentialBackoff::builder().build_with_max_retries(max_retries);
    Ok(ClientBuilder::new(client)
        .with(RetryTransientMiddleware::new_with_policy(retry_policy))
        .build())
}

/// Replace the secret part of a request URL before it ends up in a log line
pub(crate) fn redact_key(url: &str, key: &str) -> String {
    if key.is_empty() {
        url.to_string()
    } else {
        url.replace(key, "***")
    }
}
