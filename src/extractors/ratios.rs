// src/extractors/ratios.rs
use crate::screener::models::RatioSet;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

// --- CSS Selectors (Lazy Static) ---
static RATIO_CONTAINER_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("ul#top-ratios").expect("Failed to compile RATIO_CONTAINER_SELECTOR")
});

static RATIO_ENTRY_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("li.flex").expect("Failed to compile RATIO_ENTRY_SELECTOR")
});

static RATIO_NAME_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("span.name").expect("Failed to compile RATIO_NAME_SELECTOR")
});

static RATIO_VALUE_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("span.value").expect("Failed to compile RATIO_VALUE_SELECTOR")
});

/// Pulls the headline ratios out of a profile page's `top-ratios` list.
///
/// A page without the list yields an empty set; that is the normal
/// "no data available" outcome, not an error.
pub fn extract_top_ratios(html_content: &str) -> RatioSet {
    let document = Html::parse_document(html_content);

    let Some(container) = document.select(&RATIO_CONTAINER_SELECTOR).next() else {
        tracing::warn!("Could not find the 'top-ratios' section.");
        return RatioSet::new();
    };

    let mut ratios = RatioSet::new();
    for entry in container.select(&RATIO_ENTRY_SELECTOR) {
        let name = entry.select(&RATIO_NAME_SELECTOR).next();
        let value = entry.select(&RATIO_VALUE_SELECTOR).next();

        if let (Some(name), Some(value)) = (name, value) {
            let name = joined_text(name, "");
            let value = normalize_value(&joined_text(value, " "));
            tracing::trace!("Found ratio '{}' = '{}'", name, value);
            ratios.insert(name, value);
        }
    }

    tracing::debug!("Extracted {} top ratios", ratios.len());
    ratios
}

/// Joins an element's trimmed, non-empty text fragments with `separator`.
fn joined_text(element: ElementRef, separator: &str) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|fragment| !fragment.is_empty())
        .collect::<Vec<_>>()
        .join(separator)
}

/// Keeps units like 'Cr.' separated from the number by exactly one space.
fn normalize_value(value: &str) -> String {
    value.replace('\n', "").replace("  ", " ")
}
