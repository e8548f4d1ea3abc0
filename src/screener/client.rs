// src/screener/client.rs
use crate::screener::models::{ProfilePage, BROWSER_USER_AGENT, SCREENER_ORIGIN};
use crate::utils::error::ScreenerError;
use reqwest::header;
use std::time::Duration;

const PAGE_TIMEOUT: Duration = Duration::from_secs(10);

/// Creates the process-wide reqwest client shared by every service client.
pub fn build_http_client() -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .user_agent(BROWSER_USER_AGENT)
        .build()
}

/// Fetches company profile pages from screener.in.
#[derive(Debug, Clone)]
pub struct ScreenerClient {
    client: reqwest::Client,
    origin: String,
}

impl ScreenerClient {
    pub fn new(client: reqwest::Client) -> Self {
        Self {
            client,
            origin: SCREENER_ORIGIN.to_string(),
        }
    }

    #[cfg(test)]
    pub fn with_base_url(mut self, origin: impl Into<String>) -> Self {
        self.origin = origin.into().trim_end_matches('/').to_string();
        self
    }

    /// Downloads the raw HTML of a company's profile page.
    pub async fn fetch_profile_page(&self, ticker: &str, page: ProfilePage) -> Result<String, ScreenerError> {
        let url = format!("{}{}", self.origin, page.path(ticker));
        tracing::info!("Fetching profile page: {}", url);

        let response = self.client.get(&url)
            .header(header::USER_AGENT, BROWSER_USER_AGENT)
            .header(header::ACCEPT, "text/html,application/xhtml+xml,*/*")
            .timeout(PAGE_TIMEOUT)
            .send()
            .await?; // Propagates reqwest::Error as ScreenerError::Network

        let status = response.status();
        if !status.is_success() {
            tracing::warn!("HTTP error status: {} for URL: {}", status, url);
            return Err(ScreenerError::Http(status));
        }

        let body = response.text().await?;
        tracing::debug!("Downloaded {} bytes from {}", body.len(), url);

        Ok(body)
    }
}
