// src/apify/client.rs
use crate::apify::models::{ratios_from_items, ActorInput, ActorRun, ApiEnvelope};
use crate::screener::models::{ProfilePage, RatioSet};
use crate::utils::error::ApifyError;
use serde_json::Value;
use std::time::Duration;
use tokio::time::Instant;

const APIFY_BASE_URL: &str = "https://api.apify.com/v2";
// Apify caps server-side long-polling at 60 seconds per request
const WAIT_FOR_FINISH_SECS: u64 = 60;
const MAX_RUN_WAIT: Duration = Duration::from_secs(15 * 60);

/// Runs the screener.in scraping actor and reads its dataset.
#[derive(Debug, Clone)]
pub struct ApifyClient {
    client: reqwest::Client,
    token: String,
    actor_id: String,
    base_url: String,
}

impl ApifyClient {
    pub fn new(client: reqwest::Client, token: impl Into<String>, actor_id: &str) -> Self {
        Self {
            client,
            token: token.into(),
            // The REST API addresses `user/actor` as `user~actor`
            actor_id: actor_id.replace('/', "~"),
            base_url: APIFY_BASE_URL.to_string(),
        }
    }

    #[cfg(test)]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Fetches the richer ratio set for `ticker` through the actor.
    pub async fn fetch_ratios(&self, ticker: &str) -> Result<RatioSet, ApifyError> {
        let input = ActorInput::stock_details(ProfilePage::Consolidated.url(ticker));
        let run = self.call_actor(&input).await?;
        let items = self.first_dataset_items(&run.default_dataset_id, 1).await?;
        ratios_from_items(&items)
    }

    /// Starts an actor run and waits until it reaches a terminal state.
    pub async fn call_actor(&self, input: &ActorInput) -> Result<ActorRun, ApifyError> {
        let url = format!("{}/acts/{}/runs", self.base_url, self.actor_id);
        tracing::info!("Starting actor {} for {}", self.actor_id, input.url);

        let response = self.client.post(&url)
            .bearer_auth(&self.token)
            .query(&[("waitForFinish", WAIT_FOR_FINISH_SECS)])
            .json(input)
            .send()
            .await?;
        let mut run = Self::read_data::<ActorRun>(response).await?;

        let started = Instant::now();
        while !run.is_terminal() {
            if started.elapsed() >= MAX_RUN_WAIT {
                return Err(ApifyError::RunTimedOut(run.id));
            }
            tracing::debug!("Actor run {} still {}, waiting", run.id, run.status);

            let response = self.client.get(format!("{}/actor-runs/{}", self.base_url, run.id))
                .bearer_auth(&self.token)
                .query(&[("waitForFinish", WAIT_FOR_FINISH_SECS)])
                .send()
                .await?;
            run = Self::read_data::<ActorRun>(response).await?;
        }

        if !run.succeeded() {
            tracing::warn!("Actor run {} ended as {}", run.id, run.status);
            return Err(ApifyError::RunFailed { run_id: run.id, status: run.status });
        }

        tracing::info!("Actor run {} succeeded (dataset {})", run.id, run.default_dataset_id);
        Ok(run)
    }

    /// Reads up to `limit` items from the start of a dataset.
    pub async fn first_dataset_items(&self, dataset_id: &str, limit: usize) -> Result<Vec<Value>, ApifyError> {
        let url = format!("{}/datasets/{}/items", self.base_url, dataset_id);
        let response = self.client.get(&url)
            .bearer_auth(&self.token)
            .query(&[("format", "json"), ("clean", "true")])
            .query(&[("limit", limit)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await?;
            return Err(ApifyError::Api { status, body });
        }

        response
            .json::<Vec<Value>>()
            .await
            .map_err(|e| ApifyError::Parse(e.to_string()))
    }

    async fn read_data<T: serde::de::DeserializeOwned>(response: reqwest::Response) -> Result<T, ApifyError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await?;
            return Err(ApifyError::Api { status, body });
        }
        let envelope: ApiEnvelope<T> = response
            .json()
            .await
            .map_err(|e| ApifyError::Parse(e.to_string()))?;
        Ok(envelope.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    const RUNS_PATH: &str = "/acts/shashwattrivedi~screener-in/runs";

    fn run_body(status: &str) -> String {
        json!({"data": {"id": "run-1", "status": status, "defaultDatasetId": "ds-1"}}).to_string()
    }

    async fn client_for(server: &mockito::ServerGuard) -> ApifyClient {
        ApifyClient::new(reqwest::Client::new(), "apify_api_test", "shashwattrivedi/screener-in")
            .with_base_url(server.url())
    }

    #[test]
    fn test_actor_id_uses_rest_path_form() {
        let client = ApifyClient::new(reqwest::Client::new(), "token", "shashwattrivedi/screener-in");
        assert_eq!(client.actor_id, "shashwattrivedi~screener-in");
    }

    #[test]
    fn test_actor_input_shape() {
        let input = ActorInput::stock_details(ProfilePage::Consolidated.url("infy"));
        let json = serde_json::to_value(&input).unwrap();
        assert_eq!(json["mode"], "getstockdetails");
        assert_eq!(json["url"], "https://www.screener.in/company/INFY/consolidated/");
    }

    #[tokio::test]
    async fn test_fetch_ratios_polls_until_succeeded() {
        let mut server = mockito::Server::new_async().await;
        let start = server
            .mock("POST", RUNS_PATH)
            .match_query(Matcher::Any)
            .match_header("authorization", "Bearer apify_api_test")
            .match_body(Matcher::PartialJson(json!({
                "mode": "getstockdetails",
                "url": "https://www.screener.in/company/INFY/consolidated/"
            })))
            .with_status(201)
            .with_body(run_body("RUNNING"))
            .create_async()
            .await;
        let poll = server
            .mock("GET", "/actor-runs/run-1")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(run_body("SUCCEEDED"))
            .create_async()
            .await;
        let items = server
            .mock("GET", "/datasets/ds-1/items")
            .match_query(Matcher::UrlEncoded("limit".into(), "1".into()))
            .with_status(200)
            .with_body(json!([{"ratios": {"P/E": "23.5", "ROE": "18 %"}}]).to_string())
            .create_async()
            .await;

        let ratios = client_for(&server).await.fetch_ratios("infy").await.unwrap();

        assert_eq!(ratios.get("P/E"), Some("23.5"));
        assert_eq!(ratios.get("ROE"), Some("18 %"));
        start.assert_async().await;
        poll.assert_async().await;
        items.assert_async().await;
    }

    #[tokio::test]
    async fn test_api_error_status_is_reported_with_body() {
        let mut server = mockito::Server::new_async().await;
        let _start = server
            .mock("POST", RUNS_PATH)
            .match_query(Matcher::Any)
            .with_status(401)
            .with_body(r#"{"error":{"type":"token-not-valid"}}"#)
            .create_async()
            .await;

        let err = client_for(&server).await.fetch_ratios("INFY").await.unwrap_err();

        match err {
            ApifyError::Api { status, body } => {
                assert_eq!(status, reqwest::StatusCode::UNAUTHORIZED);
                assert!(body.contains("token-not-valid"));
            }
            other => panic!("expected API error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_failed_run_skips_dataset_read() {
        let mut server = mockito::Server::new_async().await;
        let _start = server
            .mock("POST", RUNS_PATH)
            .match_query(Matcher::Any)
            .with_status(201)
            .with_body(run_body("FAILED"))
            .create_async()
            .await;
        let items = server
            .mock("GET", "/datasets/ds-1/items")
            .match_query(Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let err = client_for(&server).await.fetch_ratios("INFY").await.unwrap_err();

        assert!(matches!(err, ApifyError::RunFailed { ref run_id, ref status } if run_id == "run-1" && status == "FAILED"));
        items.assert_async().await;
    }

    #[tokio::test]
    async fn test_empty_dataset_is_an_error() {
        let mut server = mockito::Server::new_async().await;
        let _start = server
            .mock("POST", RUNS_PATH)
            .match_query(Matcher::Any)
            .with_status(201)
            .with_body(run_body("SUCCEEDED"))
            .create_async()
            .await;
        let _items = server
            .mock("GET", "/datasets/ds-1/items")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;

        let err = client_for(&server).await.fetch_ratios("INFY").await.unwrap_err();
        assert!(matches!(err, ApifyError::EmptyDataset));
    }

    #[tokio::test]
    async fn test_unreachable_api_is_network_error() {
        // Port 9 (discard) on localhost refuses connections
        let client = ApifyClient::new(reqwest::Client::new(), "apify_api_test", "shashwattrivedi/screener-in")
            .with_base_url("http://127.0.0.1:9/v2");

        let err = client.fetch_ratios("INFY").await.unwrap_err();
        assert!(matches!(err, ApifyError::Network(_)));
    }
}
