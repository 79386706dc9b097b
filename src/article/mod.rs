use reqwest::Client;
use reqwest::header::USER_AGENT;

use crate::document::HtmlNormalizer;
use crate::error::{DocsError, Result};
use crate::github::CLIENT_USER_AGENT;

/// An external article converted to text.
#[derive(Debug, Clone)]
pub struct Article {
    pub url: String,
    pub text: String,
}

/// Fetches long-form articles from outside GitHub and flattens their HTML.
pub struct ArticleFetcher {
    client: Client,
    default_url: String,
    normalizer: HtmlNormalizer,
}

impl ArticleFetcher {
    pub fn new(client: Client, default_url: impl Into<String>) -> std::result::Result<Self, regex::Error> {
        Ok(Self {
            client,
            default_url: default_url.into(),
            normalizer: HtmlNormalizer::new()?,
        })
    }

    pub fn default_url(&self) -> &str {
        &self.default_url
    }

    /// Fetch `url`, or the configured article when `None`.
    pub async fn fetch(&self, url: Option<&str>) -> Result<Article> {
        let url = url.unwrap_or(&self.default_url);
        tracing::debug!("GET {}", url);

        let failed = |reason: String| DocsError::ArticleFetch {
            url: url.to_string(),
            reason,
        };

        // No GitHub headers or token go to the article host
        let response = self
            .client
            .get(url)
            .header(USER_AGENT, CLIENT_USER_AGENT)
            .send()
            .await
            .map_err(|e| failed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(failed(format!("HTTP {status}")));
        }

        let html = response.text().await.map_err(|e| failed(e.to_string()))?;

        Ok(Article {
            url: url.to_string(),
            text: self.normalizer.to_text(&html),
        })
    }
}
