// src/utils/html_debug.rs
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use crate::utils::error::AppError;

/// Regex patterns locating the parts of a profile page the extractors rely on.
pub const PROFILE_PAGE_PATTERNS: [(&str, &str); 4] = [
    (r#"(?i)<ul[^>]*id=["']?top-ratios["']?[^>]*>"#, "ratios"),
    (r#"(?i)<li[^>]*class=["'][^"']*\bflex\b[^"']*["'][^>]*>\s*<span[^>]*class=["']name["']"#, "ratio"),
    (r#"(?i)<li[^>]*class=["'][^"']*flex-wrap-420[^"']*["'][^>]*>"#, "concall"),
    (r#"(?i)<a[^>]*class=["'][^"']*concall-link[^"']*["'][^>]*>\s*Transcript\s*</a>"#, "transcript"),
];

/// Saves a HTML snippet to a file with debug highlights
pub fn save_debug_html(html: &str, filename: &Path, highlights: &[(usize, usize, &str)]) -> Result<(), AppError> {
    let mut file = File::create(filename)?;

    let mut debug_html = String::from("<!DOCTYPE html>\n<html>\n<head>\n<style>\n");

    // CSS for highlight colors
    debug_html.push_str(".highlight-ratios { background-color: #FFFF00; }\n");
    debug_html.push_str(".highlight-ratio { background-color: #90EE90; }\n");
    debug_html.push_str(".highlight-concall { background-color: #ADD8E6; }\n");
    debug_html.push_str(".highlight-transcript { background-color: #FFA500; }\n");
    debug_html.push_str(".highlight-custom { background-color: #FFC0CB; }\n");
    debug_html.push_str("</style>\n</head>\n<body>\n");

    let mut last_pos = 0;
    let mut sorted_highlights = highlights.to_vec();
    sorted_highlights.sort_by_key(|h| h.0);

    for (start, end, highlight_type) in sorted_highlights {
        // Overlapping matches would duplicate markup
        if start < last_pos {
            tracing::trace!("Skipping overlapping highlight at {}-{} ({})", start, end, highlight_type);
            continue;
        }
        debug_html.push_str(&html[last_pos..start]);

        let css_class = match highlight_type {
            "ratios" => "highlight-ratios",
            "ratio" => "highlight-ratio",
            "concall" => "highlight-concall",
            "transcript" => "highlight-transcript",
            _ => "highlight-custom",
        };

        debug_html.push_str(&format!("<span class=\"{}\" title=\"Position: {}-{}, Type: {}\">",
            css_class, start, end, highlight_type));
        debug_html.push_str(&html[start..end]);
        debug_html.push_str("</span>");

        last_pos = end;
    }

    if last_pos < html.len() {
        debug_html.push_str(&html[last_pos..]);
    }

    debug_html.push_str("\n</body>\n</html>");

    file.write_all(debug_html.as_bytes())?;

    tracing::info!("Saved debug HTML to {}", filename.display());
    Ok(())
}

/// Creates a debug version of an HTML document with locations of specified regex patterns highlighted
pub fn create_debug_html(html: &str, filename: &Path, patterns: &[(&str, &str)]) -> Result<(), AppError> {
    use regex::Regex;

    let mut highlights = Vec::new();

    for (pattern, highlight_type) in patterns {
        let re = Regex::new(pattern).map_err(|e| {
            AppError::Config(format!("Invalid regex pattern '{}': {}", pattern, e))
        })?;

        for mat in re.find_iter(html) {
            highlights.push((mat.start(), mat.end(), *highlight_type));
        }
    }

    tracing::debug!("Found {} debug highlights", highlights.len());
    save_debug_html(html, filename, &highlights)
}

/// Writes `{TICKER}_{page}_annotated.html` into `dir`, highlighting the ratio
/// list and concall entries of a fetched profile page.
pub fn annotate_profile_page(html: &str, dir: &Path, ticker: &str, page: &str) -> Result<PathBuf, AppError> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(format!("{}_{}_annotated.html", ticker.to_uppercase(), page));
    create_debug_html(html, &path, &PROFILE_PAGE_PATTERNS)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_annotate_profile_page_highlights_sections() {
        let html = r#"<body>
            <ul id="top-ratios"><li class="flex flex-space-between"><span class="name">P/E</span><span class="value">23.5</span></li></ul>
            <ul><li class="flex flex-wrap-420"><div>Jan 2024</div><a class="concall-link" href="/c/1/">Transcript</a></li></ul>
        </body>"#;

        let dir = std::env::temp_dir().join(format!("concall_research_debug_{}", std::process::id()));
        let path = annotate_profile_page(html, &dir, "infy", "profile").expect("annotation should succeed");

        assert!(path.ends_with("INFY_profile_annotated.html"));
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("highlight-ratios\" title"), "ratio container not highlighted");
        assert!(written.contains("highlight-ratio\" title"), "ratio entry not highlighted");
        assert!(written.contains("highlight-concall\" title"), "concall entry not highlighted");
        assert!(written.contains("highlight-transcript\" title"), "transcript anchor not highlighted");
        assert!(written.contains("<span class=\"value\">23.5</span>"), "page body should be preserved");

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_invalid_pattern_is_config_error() {
        let path = std::env::temp_dir().join("concall_research_never_written.html");
        let result = create_debug_html("<p></p>", &path, &[("(unclosed", "custom")]);
        assert!(matches!(result, Err(AppError::Config(_))));
    }
}
