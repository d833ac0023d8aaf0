//! Raw-record feeds for the two supported sources.

mod play_store;
mod twitter;

pub use play_store::PlayStoreClient;
pub use twitter::TwitterClient;

use std::time::Duration;

use reqwest::Client;

use crate::error::SentimentError;

/// Shared `reqwest::Client` construction for the source adapters.
fn build_http_client(timeout_secs: u64, user_agent: &str) -> Result<Client, SentimentError> {
    let client = Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .user_agent(user_agent)
        .build()?;
    Ok(client)
}
