use anyhow::Context as _;
use reqwest::blocking::Client;

use crate::Result;

pub mod scrape;

/// Browser identity sent with every request.
pub static USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
                               AppleWebKit/537.36 (KHTML, like Gecko) \
                               Chrome/115.0.0.0 Safari/537.36";

/// Builds the client shared by all workers.
///
/// No timeout is set, so a stalled server blocks the caller indefinitely.
pub fn build_client(user_agent: &str) -> Result<Client> {
    Client::builder()
        .user_agent(user_agent)
        .timeout(None)
        .build()
        .context("Could not build http client")
}
