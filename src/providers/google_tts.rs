use async_trait::async_trait;
use log::{debug, error};
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;
use std::time::Duration;

use crate::errors::ProviderError;
use crate::providers::SpeechSynthesizer;

// A run of text up to and including its closing punctuation
static SENTENCE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^.!?;:،。！？\n]+[.!?;:،。！？]*").expect("valid sentence regex"));

/// Client for the Google Translate text-to-speech endpoint
///
/// The endpoint only accepts short inputs, so text is split into chunks and
/// the returned MP3 streams are concatenated.
#[derive(Debug)]
pub struct GoogleTts {
    /// HTTP client for API requests
    client: Client,
    /// Endpoint URL
    endpoint: String,
    /// Largest chunk sent per request, in characters
    max_chars: usize,
    /// Use the slow speaking rate
    slow: bool,
}

impl GoogleTts {
    /// Create a new client
    pub fn new(endpoint: impl Into<String>, max_chars: usize, slow: bool, timeout_secs: u64) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .build()
                .unwrap_or_default(),
            endpoint: endpoint.into(),
            max_chars: max_chars.max(1),
            slow,
        }
    }

    async fn fetch_chunk(
        &self,
        chunk: &str,
        language: &str,
        index: usize,
        total: usize,
    ) -> Result<Vec<u8>, ProviderError> {
        let speed = if self.slow { "0.24" } else { "1" };
        let total = total.to_string();
        let index = index.to_string();
        let text_len = chunk.chars().count().to_string();

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("ie", "UTF-8"),
                ("q", chunk),
                ("tl", language),
                ("client", "tw-ob"),
                ("ttsspeed", speed),
                ("total", total.as_str()),
                ("idx", index.as_str()),
                ("textlen", text_len.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!("Text-to-speech error ({}): {}", status, error_text);
            return Err(ProviderError::from_status(status.as_u16(), error_text));
        }

        let bytes = response.bytes().await?;
        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl SpeechSynthesizer for GoogleTts {
    async fn synthesize(&self, text: &str, language: &str) -> Result<Vec<u8>, ProviderError> {
        let chunks = chunk_text(text, self.max_chars);
        if chunks.is_empty() {
            return Err(ProviderError::RequestFailed("No text to speak".to_string()));
        }

        debug!("Synthesizing {} chunk(s) in '{}'", chunks.len(), language);

        let mut audio = Vec::new();
        for (index, chunk) in chunks.iter().enumerate() {
            let bytes = self.fetch_chunk(chunk, language, index, chunks.len()).await?;
            audio.extend_from_slice(&bytes);
        }

        if audio.is_empty() {
            return Err(ProviderError::ParseError("Service returned no audio".to_string()));
        }

        Ok(audio)
    }
}

/// Split text into chunks of at most `max_chars` characters
///
/// Sentences are packed together where they fit; longer sentences are split on
/// word boundaries, and single words longer than the limit are cut.
pub fn chunk_text(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut chunks = Vec::new();
    let mut current = String::new();

    for sentence in SENTENCE_RE.find_iter(text) {
        let sentence = sentence.as_str().trim();
        let fits = current.chars().count() + 1 + sentence.chars().count() <= max_chars;
        // Start a new chunk rather than splitting a sentence that would fit in one
        if !current.is_empty() && !fits && sentence.chars().count() <= max_chars {
            chunks.push(std::mem::take(&mut current));
        }

        for word in sentence.split_whitespace() {
            push_word(&mut chunks, &mut current, word, max_chars);
        }
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
}

fn push_word(chunks: &mut Vec<String>, current: &mut String, word: &str, max_chars: usize) {
    let word_len = word.chars().count();
    let current_len = current.chars().count();

    if current_len > 0 && current_len + 1 + word_len <= max_chars {
        current.push(' ');
        current.push_str(word);
        return;
    }

    if current_len > 0 {
        chunks.push(std::mem::take(current));
    }

    if word_len <= max_chars {
        current.push_str(word);
        return;
    }

    let chars: Vec<char> = word.chars().collect();
    let mut pieces = chars.chunks(max_chars).map(|c| c.iter().collect::<String>()).peekable();
    while let Some(piece) = pieces.next() {
        if pieces.peek().is_some() {
            chunks.push(piece);
        } else {
            *current = piece;
        }
    }
}
