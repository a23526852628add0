use async_trait::async_trait;
use futures::stream::{self, StreamExt, TryStreamExt};
use log::{debug, error};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::errors::ProviderError;
use crate::providers::Translator;

/// Client for the Cloud Translation v2 REST endpoint
#[derive(Debug)]
pub struct GoogleTranslate {
    /// HTTP client for API requests
    client: Client,
    /// Endpoint URL
    endpoint: String,
    /// API key sent as the `key` form field
    api_key: String,
    /// Payload format ("text" or "html")
    format: String,
    /// Paragraphs in flight at once
    concurrent_requests: usize,
}

#[derive(Debug, Deserialize)]
struct TranslateResponse {
    data: TranslateData,
}

#[derive(Debug, Deserialize)]
struct TranslateData {
    translations: Vec<Translation>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Translation {
    translated_text: String,
}

impl GoogleTranslate {
    /// Create a new client
    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        format: impl Into<String>,
        concurrent_requests: usize,
        timeout_secs: u64,
    ) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .build()
                .unwrap_or_default(),
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            format: format.into(),
            concurrent_requests: concurrent_requests.max(1),
        }
    }

    /// Translate one paragraph with a single request
    pub async fn translate_text(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<String, ProviderError> {
        let params = [
            ("q", text),
            ("source", source_language),
            ("target", target_language),
            ("format", self.format.as_str()),
            ("key", self.api_key.as_str()),
        ];

        let response = self.client.post(&self.endpoint).form(&params).send().await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!("Translation API error ({}): {}", status, error_text);
            return Err(ProviderError::from_status(status.as_u16(), error_text));
        }

        let body = response
            .json::<TranslateResponse>()
            .await
            .map_err(|e| ProviderError::ParseError(e.to_string()))?;

        body.data
            .translations
            .into_iter()
            .next()
            .map(|t| t.translated_text)
            .ok_or_else(|| ProviderError::ParseError("Response held no translations".to_string()))
    }
}

#[async_trait]
impl Translator for GoogleTranslate {
    async fn translate_batch(
        &self,
        paragraphs: &[String],
        source_language: &str,
        target_language: &str,
    ) -> Result<Vec<String>, ProviderError> {
        debug!(
            "Translating {} paragraph(s) {} -> {} ({} in flight)",
            paragraphs.len(),
            source_language,
            target_language,
            self.concurrent_requests
        );

        let requests: Vec<_> = paragraphs
            .iter()
            .map(|paragraph| self.translate_text(paragraph, source_language, target_language))
            .collect();

        // `buffered` yields in input order; the first failure ends the batch
        stream::iter(requests)
            .buffered(self.concurrent_requests)
            .try_collect()
            .await
    }
}
