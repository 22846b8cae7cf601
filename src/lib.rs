pub mod analysis;
pub mod api;
pub mod config;
pub mod content;
pub mod error;
pub mod extract;
pub mod fetcher;
pub mod headings;
pub mod meta;
pub mod metrics;
pub mod slug;

use std::sync::Arc;
use reqwest::Client;
use config::Config;
use error::Result;

/// Application state that will be shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub client: Client,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self> {
        let client = fetcher::build_client(&config)?;
        Ok(AppState {
            config: Arc::new(config),
            client,
        })
    }
}
