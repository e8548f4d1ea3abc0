// src/pipeline/sources.rs
use crate::apify::ApifyClient;
use crate::documents::{TranscriptReader, TranscriptText};
use crate::extractors::{extract_top_ratios, extract_transcript_links};
use crate::pipeline::Outcome;
use crate::screener::{ProfilePage, RatioSet, ScreenerClient, TranscriptLink};
use crate::utils::html_debug;
use async_trait::async_trait;
use std::path::PathBuf;

/// The data sources the orchestrator draws on. None of them fail hard:
/// missing data comes back as [`Outcome::Empty`] with a reason.
#[async_trait]
pub trait ResearchSources: Send + Sync {
    /// Headline ratios parsed from the profile page.
    async fn local_ratios(&self, ticker: &str) -> Outcome<RatioSet>;

    /// The richer ratio set from the remote scraping actor.
    async fn remote_ratios(&self, ticker: &str) -> Outcome<RatioSet>;

    /// Transcript links in page order, most recent first.
    async fn transcript_links(&self, ticker: &str) -> Outcome<Vec<TranscriptLink>>;

    /// Text of one transcript document.
    async fn transcript_text(&self, link: &TranscriptLink) -> TranscriptText;
}

/// Production sources backed by screener.in, Apify and PDF downloads.
#[derive(Debug, Clone)]
pub struct LiveSources {
    screener: ScreenerClient,
    apify: ApifyClient,
    reader: TranscriptReader,
    debug_dir: Option<PathBuf>,
}

impl LiveSources {
    pub fn new(screener: ScreenerClient, apify: ApifyClient, reader: TranscriptReader) -> Self {
        Self {
            screener,
            apify,
            reader,
            debug_dir: None,
        }
    }

    /// Save an annotated copy of every fetched profile page into `dir`.
    pub fn with_debug_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.debug_dir = dir;
        self
    }

    async fn profile_page(&self, ticker: &str, page: ProfilePage) -> Result<String, String> {
        let html = self
            .screener
            .fetch_profile_page(ticker, page)
            .await
            .map_err(|e| format!("could not fetch {} page for {}: {}", page.label(), ticker, e))?;

        if let Some(dir) = &self.debug_dir {
            match html_debug::annotate_profile_page(&html, dir, ticker, page.label()) {
                Ok(path) => tracing::info!("Created annotated debug HTML: {}", path.display()),
                Err(e) => tracing::warn!("Failed to create debug HTML: {}", e),
            }
        }
        Ok(html)
    }
}

#[async_trait]
impl ResearchSources for LiveSources {
    async fn local_ratios(&self, ticker: &str) -> Outcome<RatioSet> {
        match self.profile_page(ticker, ProfilePage::Standalone).await {
            Ok(html) => Outcome::non_empty(extract_top_ratios(&html), "no top ratios on the profile page"),
            Err(reason) => Outcome::empty(reason),
        }
    }

    async fn remote_ratios(&self, ticker: &str) -> Outcome<RatioSet> {
        match self.apify.fetch_ratios(ticker).await {
            Ok(ratios) => Outcome::non_empty(ratios, "actor returned no ratios"),
            Err(e) => Outcome::empty(format!("remote ratio fetch failed: {}", e)),
        }
    }

    async fn transcript_links(&self, ticker: &str) -> Outcome<Vec<TranscriptLink>> {
        match self.profile_page(ticker, ProfilePage::Consolidated).await {
            Ok(html) => Outcome::non_empty(extract_transcript_links(&html), "no transcript links on the page"),
            Err(reason) => Outcome::empty(reason),
        }
    }

    async fn transcript_text(&self, link: &TranscriptLink) -> TranscriptText {
        self.reader.read(link).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::documents::reader::DEFAULT_MAX_PAGES;
    use mockito::Matcher;

    const RUNS_PATH: &str = "/acts/shashwattrivedi~screener-in/runs";

    // Port 9 (discard) on localhost refuses connections
    const REFUSED: &str = "http://127.0.0.1:9";

    fn sources(screener_origin: &str, apify_base: &str) -> LiveSources {
        let http = reqwest::Client::new();
        LiveSources::new(
            ScreenerClient::new(http.clone()).with_base_url(screener_origin),
            ApifyClient::new(http.clone(), "apify_api_test", "shashwattrivedi/screener-in").with_base_url(apify_base),
            TranscriptReader::new(http, DEFAULT_MAX_PAGES),
        )
    }

    fn assert_empty<T: std::fmt::Debug>(outcome: Outcome<T>, expected: &str) {
        match outcome {
            Outcome::Empty { reason } => assert!(reason.contains(expected), "reason was: {}", reason),
            Outcome::Data(value) => panic!("expected no data, got {:?}", value),
        }
    }

    #[tokio::test]
    async fn test_remote_ratios_api_error_is_empty() {
        let mut server = mockito::Server::new_async().await;
        let _start = server
            .mock("POST", RUNS_PATH)
            .match_query(Matcher::Any)
            .with_status(402)
            .with_body("usage limit exceeded")
            .create_async()
            .await;

        let outcome = sources(REFUSED, &server.url()).remote_ratios("INFY").await;
        assert_empty(outcome, "usage limit exceeded");
    }

    #[tokio::test]
    async fn test_remote_ratios_failed_run_is_empty() {
        let mut server = mockito::Server::new_async().await;
        let _start = server
            .mock("POST", RUNS_PATH)
            .match_query(Matcher::Any)
            .with_status(201)
            .with_body(r#"{"data":{"id":"run-7","status":"ABORTED","defaultDatasetId":"ds-7"}}"#)
            .create_async()
            .await;

        let outcome = sources(REFUSED, &server.url()).remote_ratios("INFY").await;
        assert_empty(outcome, "ABORTED");
    }

    #[tokio::test]
    async fn test_remote_ratios_network_failure_is_empty() {
        let outcome = sources(REFUSED, REFUSED).remote_ratios("INFY").await;
        assert_empty(outcome, "remote ratio fetch failed");
    }

    #[tokio::test]
    async fn test_remote_ratios_without_entries_is_empty() {
        let mut server = mockito::Server::new_async().await;
        let _start = server
            .mock("POST", RUNS_PATH)
            .match_query(Matcher::Any)
            .with_status(201)
            .with_body(r#"{"data":{"id":"run-1","status":"SUCCEEDED","defaultDatasetId":"ds-1"}}"#)
            .create_async()
            .await;
        let _items = server
            .mock("GET", "/datasets/ds-1/items")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"[{"ratios":{}}]"#)
            .create_async()
            .await;

        let outcome = sources(REFUSED, &server.url()).remote_ratios("INFY").await;
        assert_empty(outcome, "actor returned no ratios");
    }

    #[tokio::test]
    async fn test_local_ratios_missing_page_is_empty() {
        let mut server = mockito::Server::new_async().await;
        let _page = server
            .mock("GET", "/company/NOPE/")
            .with_status(404)
            .create_async()
            .await;

        let outcome = sources(&server.url(), REFUSED).local_ratios("NOPE").await;
        assert_empty(outcome, "404");
    }

    #[tokio::test]
    async fn test_local_ratios_and_links_from_profile_pages() {
        let mut server = mockito::Server::new_async().await;
        let _profile = server
            .mock("GET", "/company/INFY/")
            .with_status(200)
            .with_body(
                r#"<ul id="top-ratios">
                     <li class="flex"><span class="name">P/E</span><span class="value">23.5</span></li>
                   </ul>"#,
            )
            .create_async()
            .await;
        let _consolidated = server
            .mock("GET", "/company/INFY/consolidated/")
            .with_status(200)
            .with_body(
                r#"<ul><li class="flex-wrap-420">
                     <a class="concall-link" href="https://example.com/q3.pdf">Transcript</a>
                   </li></ul>"#,
            )
            .create_async()
            .await;

        let live = sources(&server.url(), REFUSED);

        match live.local_ratios("INFY").await {
            Outcome::Data(ratios) => assert_eq!(ratios.get("P/E"), Some("23.5")),
            other => panic!("expected ratios, got {:?}", other),
        }
        match live.transcript_links("INFY").await {
            Outcome::Data(links) => assert_eq!(links, vec![TranscriptLink("https://example.com/q3.pdf".to_string())]),
            other => panic!("expected links, got {:?}", other),
        }
    }
}
