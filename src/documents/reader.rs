// src/documents/reader.rs
use crate::screener::models::{TranscriptLink, BROWSER_USER_AGENT};
use crate::utils::error::DocumentError;
use lopdf::Document;
use reqwest::header;
use std::fmt;
use std::time::Duration;

const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(15);
/// Leading pages read per transcript
pub const DEFAULT_MAX_PAGES: usize = 10;

pub const NO_TEXT_SENTINEL: &str = "[Scanned PDF/No Text]";

/// Plain text recovered from one transcript document.
///
/// All three variants are embedded in the prompt as-is, so a failed download
/// shows up in the report instead of aborting it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranscriptText {
    /// Page-marked text of the leading pages
    Extracted(String),
    /// The document has no text layer (most likely a scan)
    NoTextLayer,
    /// Download or parsing failed; holds the reason
    Unreadable(String),
}

impl fmt::Display for TranscriptText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TranscriptText::Extracted(text) => f.write_str(text),
            TranscriptText::NoTextLayer => f.write_str(NO_TEXT_SENTINEL),
            TranscriptText::Unreadable(reason) => write!(f, "Could not read PDF: {}", reason),
        }
    }
}

/// Downloads transcript PDFs and extracts the text of their leading pages.
#[derive(Debug, Clone)]
pub struct TranscriptReader {
    client: reqwest::Client,
    max_pages: usize,
}

impl TranscriptReader {
    pub fn new(client: reqwest::Client, max_pages: usize) -> Self {
        Self { client, max_pages }
    }

    /// Never fails: errors come back as [`TranscriptText::Unreadable`].
    pub async fn read(&self, link: &TranscriptLink) -> TranscriptText {
        match self.try_read(link).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!("Could not read transcript {}: {}", link, e);
                TranscriptText::Unreadable(e.to_string())
            }
        }
    }

    async fn try_read(&self, link: &TranscriptLink) -> Result<TranscriptText, DocumentError> {
        let bytes = self.download(link).await?;
        let max_pages = self.max_pages;
        // lopdf parsing is CPU-bound; keep it off the async workers
        tokio::task::spawn_blocking(move || extract_leading_pages(&bytes, max_pages)).await?
    }

    async fn download(&self, link: &TranscriptLink) -> Result<Vec<u8>, DocumentError> {
        tracing::info!("Downloading transcript from: {}", link);

        let response = self.client.get(link.as_str())
            .header(header::USER_AGENT, BROWSER_USER_AGENT)
            .header(header::ACCEPT, "application/pdf")
            .timeout(DOWNLOAD_TIMEOUT)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!("HTTP error status: {} for URL: {}", status, link);
            return Err(DocumentError::Http(status));
        }

        let bytes = response.bytes().await?;
        tracing::debug!("Downloaded {} bytes from {}", bytes.len(), link);
        Ok(bytes.to_vec())
    }
}

/// Extracts the text of at most `max_pages` leading pages, each prefixed
/// with a `--- PAGE n ---` marker. Pages without text are skipped.
pub fn extract_leading_pages(bytes: &[u8], max_pages: usize) -> Result<TranscriptText, DocumentError> {
    let document = Document::load_mem(bytes)?;
    let pages = document.get_pages();
    tracing::debug!("PDF has {} pages, reading up to {}", pages.len(), max_pages);

    let mut text = String::new();
    for &page_number in pages.keys().take(max_pages) {
        match document.extract_text(&[page_number]) {
            Ok(page_text) if !page_text.trim().is_empty() => {
                text.push_str(&format!("\n--- PAGE {} ---\n{}", page_number, page_text));
            }
            Ok(_) => tracing::trace!("Page {} has no text layer", page_number),
            Err(e) => tracing::debug!("Skipping page {}: {}", page_number, e),
        }
    }

    if text.trim().is_empty() {
        return Ok(TranscriptText::NoTextLayer);
    }
    Ok(TranscriptText::Extracted(text))
}
