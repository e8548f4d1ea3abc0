// src/extractors/transcripts.rs
use crate::screener::models::{TranscriptLink, SCREENER_ORIGIN};
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use url::Url;

// Each concall (earnings call) event is one list item
static CONCALL_ENTRY_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("li.flex-wrap-420").expect("Failed to compile CONCALL_ENTRY_SELECTOR")
});

static CONCALL_LINK_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("a.concall-link").expect("Failed to compile CONCALL_LINK_SELECTOR")
});

static SITE_ORIGIN: Lazy<Url> = Lazy::new(|| {
    Url::parse(SCREENER_ORIGIN).expect("SCREENER_ORIGIN is a valid URL")
});

const TRANSCRIPT_LABEL: &str = "Transcript";

/// Collects transcript document links from a profile page, in page order
/// (most recent concall first).
pub fn extract_transcript_links(html_content: &str) -> Vec<TranscriptLink> {
    let document = Html::parse_document(html_content);
    let mut links = Vec::new();

    for entry in document.select(&CONCALL_ENTRY_SELECTOR) {
        let anchor = entry.select(&CONCALL_LINK_SELECTOR).find(|a| {
            a.text().collect::<String>().trim() == TRANSCRIPT_LABEL && a.value().attr("href").is_some()
        });

        let Some(href) = anchor.and_then(|a| a.value().attr("href")) else {
            continue;
        };

        match absolutize(href) {
            Some(link) => links.push(link),
            None => tracing::debug!("Skipping unresolvable transcript href: {}", href),
        }
    }

    tracing::debug!("Found {} transcript links", links.len());
    links
}

fn absolutize(href: &str) -> Option<TranscriptLink> {
    let href = href.trim();
    if href.starts_with("http") {
        return Some(TranscriptLink(href.to_string()));
    }
    SITE_ORIGIN.join(href).ok().map(|url| TranscriptLink(url.to_string()))
}
