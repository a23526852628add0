use async_trait::async_trait;
use log::{debug, error};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use url::Url;

use crate::errors::ProviderError;
use crate::providers::KnowledgeBase;

/// Wikipedia client for page summaries and title search
#[derive(Debug)]
pub struct Wikipedia {
    /// HTTP client for API requests
    client: Client,
    /// Base URL of the language edition, e.g. `https://en.wikipedia.org`
    base_url: String,
}

/// Subset of the REST page summary payload
#[derive(Debug, Deserialize)]
pub struct PageSummary {
    /// Canonical page title
    #[serde(default)]
    pub title: String,
    /// Plain-text lead section
    #[serde(default)]
    pub extract: String,
}

impl Wikipedia {
    /// Create a new Wikipedia client
    pub fn new(base_url: impl Into<String>, user_agent: &str, timeout_secs: u64) -> Self {
        Self {
            client: Client::builder()
                .user_agent(user_agent)
                .timeout(Duration::from_secs(timeout_secs))
                .build()
                .unwrap_or_default(),
            base_url: base_url.into(),
        }
    }

    /// `{base}/api/rest_v1/page/summary/{title}` with the title path-encoded
    pub fn summary_url(&self, title: &str) -> Result<Url, ProviderError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| ProviderError::RequestFailed(format!("Invalid base URL: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| ProviderError::RequestFailed("Base URL cannot hold a path".to_string()))?
            .pop_if_empty()
            .extend(["api", "rest_v1", "page", "summary"])
            .push(&title.trim().replace(' ', "_"));
        Ok(url)
    }

    fn search_url(&self) -> String {
        format!("{}/w/api.php", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl KnowledgeBase for Wikipedia {
    async fn summary(&self, title: &str) -> Result<Option<String>, ProviderError> {
        if title.trim().is_empty() {
            return Ok(None);
        }

        let url = self.summary_url(title)?;
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            debug!("No page titled '{}'", title);
            return Ok(None);
        }
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!("Wikipedia summary error ({}): {}", status, error_text);
            return Err(ProviderError::from_status(status.as_u16(), error_text));
        }

        let summary = response
            .json::<PageSummary>()
            .await
            .map_err(|e| ProviderError::ParseError(e.to_string()))?;

        let extract = summary.extract.trim();
        if extract.is_empty() {
            Ok(None)
        } else {
            Ok(Some(extract.to_string()))
        }
    }

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<String>, ProviderError> {
        let limit = limit.to_string();
        let response = self
            .client
            .get(self.search_url())
            .query(&[
                ("action", "opensearch"),
                ("search", query.trim()),
                ("limit", limit.as_str()),
                ("namespace", "0"),
                ("format", "json"),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!("Wikipedia search error ({}): {}", status, error_text);
            return Err(ProviderError::from_status(status.as_u16(), error_text));
        }

        let body = response
            .json::<serde_json::Value>()
            .await
            .map_err(|e| ProviderError::ParseError(e.to_string()))?;

        parse_opensearch_titles(&body)
    }
}

/// Titles from an opensearch payload: `[query, [titles], [descriptions], [urls]]`
pub fn parse_opensearch_titles(body: &serde_json::Value) -> Result<Vec<String>, ProviderError> {
    let titles = body
        .get(1)
        .and_then(|v| v.as_array())
        .ok_or_else(|| ProviderError::ParseError("Unexpected opensearch payload".to_string()))?;

    Ok(titles
        .iter()
        .filter_map(|t| t.as_str())
        .map(str::to_string)
        .collect())
}
