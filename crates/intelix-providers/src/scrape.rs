//! Scraping answer provider: fetches a result page for the query and
//! extracts the answer text with a CSS selector.
//!
//! This models the driven-browser fallback as a plain fetch-and-extract
//! provider; the engine stays agnostic to how the page text is produced.

use intelix_core::AnswerProvider;
use scraper::{Html, Selector};
use std::time::Duration;

const PROVIDER_NAME: &str = "ScrapeAnswerProvider";

/// Fetches `base_url?{query_param}=<context>` and returns the text of the
/// first node matching the answer selector.
pub struct ScrapeAnswerProvider {
    base_url: String,
    query_param: String,
    answer_selector: Selector,
    client: reqwest::Client,
}

impl ScrapeAnswerProvider {
    /// Fails only when the CSS selector does not parse.
    pub fn new(
        base_url: impl Into<String>,
        query_param: impl Into<String>,
        answer_selector: &str,
        timeout: Duration,
    ) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let answer_selector = Selector::parse(answer_selector).map_err(|e| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("invalid answer selector: {e}"),
            )
        })?;
        Ok(Self {
            base_url: base_url.into(),
            query_param: query_param.into(),
            answer_selector,
            client: reqwest::Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_default(),
        })
    }
}

/// Text of the first matching node, whitespace-collapsed; None when the
/// selector matches nothing or only blank text.
fn extract_text(html: &str, selector: &Selector) -> Option<String> {
    let document = Html::parse_document(html);
    let node = document.select(selector).next()?;
    let text = node
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ");
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

#[async_trait::async_trait]
impl AnswerProvider for ScrapeAnswerProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    async fn query(
        &self,
        context: &str,
    ) -> Result<Option<String>, Box<dyn std::error::Error + Send + Sync>> {
        let url =
            reqwest::Url::parse_with_params(&self.base_url, &[(self.query_param.as_str(), context)])?;
        let html = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        let answer = extract_text(&html, &self.answer_selector);
        tracing::debug!(
            target: "intelix::provider",
            provider = PROVIDER_NAME,
            bytes = html.len(),
            found = answer.is_some(),
            "result page scraped"
        );
        Ok(answer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selector(css: &str) -> Selector {
        Selector::parse(css).unwrap()
    }

    #[test]
    fn extract_text_reads_the_first_matching_node() {
        let html = r#"<html><body>
            <div class="snippet">  The capital of
            France is <b>Paris</b>.  </div>
            <div class="snippet">second match</div>
        </body></html>"#;
        assert_eq!(
            extract_text(html, &selector("div.snippet")),
            Some("The capital of France is Paris .".to_string())
        );
    }

    #[test]
    fn extract_text_misses_cleanly() {
        let html = "<html><body><p>nothing here</p></body></html>";
        assert_eq!(extract_text(html, &selector("div.answer")), None);
        assert_eq!(
            extract_text("<div class='answer'>   </div>", &selector("div.answer")),
            None
        );
    }

    #[test]
    fn bad_selectors_are_rejected_at_construction() {
        let result = ScrapeAnswerProvider::new(
            "https://example.com/search",
            "q",
            ":::not-a-selector",
            Duration::from_secs(1),
        );
        assert!(result.is_err());
    }
}
