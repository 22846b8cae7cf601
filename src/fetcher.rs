use reqwest::{Client, ClientBuilder};
use crate::config::Config;
use crate::error::{AppError, Result};

/// Builds the shared HTTP client. Every page fetch is bounded by the configured timeouts.
pub fn build_client(config: &Config) -> Result<Client> {
    ClientBuilder::new()
        .timeout(config.fetch_timeout)
        .connect_timeout(config.connect_timeout)
        .user_agent(config.user_agent.as_str())
        .pool_max_idle_per_host(10)
        .build()
        .map_err(|e| AppError::ConfigError(format!("Failed to build HTTP client: {}", e)))
}

/// Fetches the raw HTML of `url`. Transport failures and non-2xx statuses are fetch errors.
pub async fn fetch_html(client: &Client, url: &str) -> Result<String> {
    let response = client.get(url).send().await?.error_for_status()?;
    let html = response.text().await?;
    Ok(html)
}
