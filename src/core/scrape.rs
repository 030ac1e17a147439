//! Web page text extraction
//!
//! Fetches a page and reduces it to its title plus the visible text of its
//! body, one fragment per line.

use reqwest::header::USER_AGENT;
use scraper::{Html, Selector};
use tracing::{debug, warn};

/// User agent sent with every page request
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Title used when a page has none
pub const NO_TITLE: &str = "No title found";

/// Elements whose content never counts as page text
const SKIPPED_ELEMENTS: [&str; 4] = ["script", "style", "img", "input"];

/// Fetch `url` and return `title + "\n\n" + text`, or `None` after logging
/// the failure.
pub async fn fetch_website_contents(client: &reqwest::Client, url: &str) -> Option<String> {
    let response = match client
        .get(url)
        .header(USER_AGENT, BROWSER_USER_AGENT)
        .send()
        .await
    {
        Ok(response) => response,
        Err(e) => {
            warn!(url, error = %e, "Error fetching website contents");
            return None;
        }
    };

    let status = response.status();
    let html = match response.text().await {
        Ok(html) => html,
        Err(e) => {
            warn!(url, error = %e, "Error reading website contents");
            return None;
        }
    };
    debug!(url, status = status.as_u16(), bytes = html.len(), "Fetched page");

    let contents = extract_page_text(&html);
    if contents.is_none() {
        warn!(url, "Page has no body");
    }
    contents
}

/// Title and visible body text of an HTML document, `None` without a body
pub fn extract_page_text(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let title_selector = Selector::parse("title").ok()?;
    let body_selector = Selector::parse("body").ok()?;

    let title = document
        .select(&title_selector)
        .next()
        .map(|title| title.text().collect::<String>().trim().to_string())
        .filter(|title| !title.is_empty())
        .unwrap_or_else(|| NO_TITLE.to_string());

    let body = document.select(&body_selector).next()?;
    let fragments: Vec<&str> = body
        .descendants()
        .filter_map(|node| {
            let text = node.value().as_text()?;
            let skipped = node.ancestors().any(|ancestor| {
                ancestor
                    .value()
                    .as_element()
                    .is_some_and(|element| SKIPPED_ELEMENTS.contains(&element.name()))
            });
            if skipped {
                return None;
            }
            let text: &str = text;
            Some(text.trim()).filter(|fragment| !fragment.is_empty())
        })
        .collect();

    Some(format!("{}\n\n{}", title, fragments.join("\n")))
}
