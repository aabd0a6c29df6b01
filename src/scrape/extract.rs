//! Visible-text extraction from rendered HTML

use scraper::{ElementRef, Html, Selector};

use crate::scrape::error::ScrapeError;

/// Containers checked in order when picking the content root. The page body
/// is the fallback when no main-content container is present.
const CONTENT_SELECTORS: &[&str] = &[
    "main",
    "article",
    "#content",
    "#main-content",
    ".main-content",
    "body",
];

/// Elements whose text is never visible on the page
const SKIP_TAGS: &[&str] = &["script", "style", "noscript", "head", "template", "iframe"];

/// Extract the visible text of a rendered page.
///
/// Prefers a main-content container over the whole body. Text nodes become
/// newline-separated lines with their internal whitespace collapsed.
pub fn extract_text(html: &str) -> Result<String, ScrapeError> {
    let document = Html::parse_document(html);
    let root = select_content_root(&document)?;

    let mut lines = Vec::new();
    collect_text(root, &mut lines);
    Ok(lines.join("\n"))
}

fn select_content_root(document: &Html) -> Result<ElementRef<'_>, ScrapeError> {
    for selector_str in CONTENT_SELECTORS {
        let selector = Selector::parse(selector_str).map_err(|e| {
            ScrapeError::Extract(format!("Failed to parse selector '{}': {}", selector_str, e))
        })?;
        if let Some(element) = document.select(&selector).next() {
            return Ok(element);
        }
    }
    Err(ScrapeError::Extract("document has no body".to_string()))
}

fn collect_text(element: ElementRef<'_>, lines: &mut Vec<String>) {
    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            let collapsed = collapse_whitespace(&text.text);
            if !collapsed.is_empty() {
                lines.push(collapsed);
            }
        } else if let Some(child_element) = ElementRef::wrap(child) {
            if !SKIP_TAGS.contains(&child_element.value().name()) {
                collect_text(child_element, lines);
            }
        }
    }
}

fn collapse_whitespace(input: &str) -> String {
    let mut buf = String::with_capacity(input.len());
    let mut last_space = false;
    for ch in input.chars() {
        if ch.is_whitespace() {
            if !last_space && !buf.is_empty() {
                buf.push(' ');
            }
            last_space = true;
        } else {
            buf.push(ch);
            last_space = false;
        }
    }
    buf.trim_end().to_string()
}

/// Drop blank lines and lines containing a blocklisted keyword.
///
/// Keyword matching is case-insensitive so "Advertisement" banners are
/// caught as well. Empty keywords are ignored, since every line contains
/// the empty string.
pub fn filter_lines(text: &str, blocklist: &[String]) -> String {
    let lowered: Vec<String> = blocklist
        .iter()
        .filter(|word| !word.is_empty())
        .map(|word| word.to_lowercase())
        .collect();

    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter(|line| {
            let line_lower = line.to_lowercase();
            !lowered.iter().any(|word| line_lower.contains(word))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_prefers_main_content_container() {
        let html = r#"
            <html><body>
                <nav>Site navigation</nav>
                <main><p>Scholarship information</p></main>
                <footer>Copyright</footer>
            </body></html>
        "#;

        let text = extract_text(html).unwrap();
        assert_eq!(text, "Scholarship information");
    }

    #[test]
    fn test_extract_falls_back_to_body() {
        let html = "<html><body><p>First block</p><p>Second block</p></body></html>";
        let text = extract_text(html).unwrap();
        assert_eq!(text, "First block\nSecond block");
    }

    #[test]
    fn test_extract_skips_script_and_style() {
        let html = r#"
            <html><body>
                <script>var hidden = true;</script>
                <style>.a { color: red; }</style>
                <p>Visible</p>
            </body></html>
        "#;

        let text = extract_text(html).unwrap();
        assert_eq!(text, "Visible");
    }

    #[test]
    fn test_extract_collapses_internal_whitespace() {
        let html = "<html><body><p>Spaced   out\n   text</p></body></html>";
        let text = extract_text(html).unwrap();
        assert_eq!(text, "Spaced out text");
    }

    #[test]
    fn test_filter_lines_drops_blanks_and_blocklisted() {
        let text = "Tuition fees\n\n  \nThis Advertisement pays our bills\nContact us";
        let filtered = filter_lines(text, &["advertisement".to_string()]);
        assert_eq!(filtered, "Tuition fees\nContact us");
    }

    #[test]
    fn test_filter_lines_with_empty_blocklist_keeps_content() {
        let text = "One\n\nTwo";
        assert_eq!(filter_lines(text, &[]), "One\nTwo");
    }

    #[test]
    fn test_filter_lines_ignores_empty_keyword() {
        let text = "One\nTwo";
        assert_eq!(filter_lines(text, &[String::new()]), "One\nTwo");
    }
}
