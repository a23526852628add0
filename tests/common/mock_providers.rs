/*!
 * Mock collaborator implementations for testing
 *
 * Each mock implements one collaborator trait, returns predetermined
 * responses and records the calls it receives, so tests can assert both on
 * results and on whether the network would have been touched.
 */

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use eduscript::errors::ProviderError;
use eduscript::providers::{KnowledgeBase, SpeechSynthesizer, TextGenerator, Translator};

/// Type of error to simulate
#[derive(Debug, Clone, Copy)]
pub enum MockErrorType {
    /// Authentication error (invalid API key)
    Auth,
    /// Connection error
    Connection,
    /// Rate limit error
    RateLimit,
}

impl MockErrorType {
    fn to_error(self) -> ProviderError {
        match self {
            MockErrorType::Auth => ProviderError::AuthenticationError("Invalid API key".to_string()),
            MockErrorType::Connection => ProviderError::ConnectionError("Host unreachable".to_string()),
            MockErrorType::RateLimit => ProviderError::RateLimitExceeded("Slow down".to_string()),
        }
    }
}

/// Mock text generator returning a fixed completion
#[derive(Debug)]
pub struct MockGenerator {
    reply: String,
    failure: Option<MockErrorType>,
    /// Time every call takes before answering
    delay: Option<Duration>,
    /// (system, prompt) of every call
    calls: Mutex<Vec<(String, String)>>,
}

impl MockGenerator {
    pub fn new(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
            failure: None,
            delay: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// A generator whose every call fails
    pub fn failing(error_type: MockErrorType) -> Self {
        Self {
            failure: Some(error_type),
            ..Self::new("")
        }
    }

    /// Make every call wait before answering
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.calls.lock().unwrap().iter().map(|(_, p)| p.clone()).collect()
    }
}

#[async_trait]
impl TextGenerator for MockGenerator {
    async fn generate(&self, system: &str, prompt: &str) -> Result<String, ProviderError> {
        self.calls
            .lock()
            .unwrap()
            .push((system.to_string(), prompt.to_string()));

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match self.failure {
            Some(error_type) => Err(error_type.to_error()),
            None => Ok(self.reply.clone()),
        }
    }
}

/// Mock knowledge base with a fixed set of pages
#[derive(Debug, Default)]
pub struct MockKnowledgeBase {
    pages: HashMap<String, String>,
    search_results: Vec<String>,
    failure: Option<MockErrorType>,
    summary_requests: Mutex<Vec<String>>,
    search_count: Mutex<usize>,
}

impl MockKnowledgeBase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_summary(mut self, title: &str, summary: &str) -> Self {
        self.pages.insert(title.to_string(), summary.to_string());
        self
    }

    pub fn with_search_results(mut self, titles: &[&str]) -> Self {
        self.search_results = titles.iter().map(|t| t.to_string()).collect();
        self
    }

    pub fn failing(error_type: MockErrorType) -> Self {
        Self {
            failure: Some(error_type),
            ..Self::default()
        }
    }

    /// Titles whose summary was requested, in order
    pub fn summary_requests(&self) -> Vec<String> {
        self.summary_requests.lock().unwrap().clone()
    }

    pub fn search_count(&self) -> usize {
        *self.search_count.lock().unwrap()
    }
}

#[async_trait]
impl KnowledgeBase for MockKnowledgeBase {
    async fn summary(&self, title: &str) -> Result<Option<String>, ProviderError> {
        self.summary_requests.lock().unwrap().push(title.to_string());
        if let Some(error_type) = self.failure {
            return Err(error_type.to_error());
        }
        Ok(self.pages.get(title).cloned())
    }

    async fn search(&self, _query: &str, limit: usize) -> Result<Vec<String>, ProviderError> {
        *self.search_count.lock().unwrap() += 1;
        if let Some(error_type) = self.failure {
            return Err(error_type.to_error());
        }
        Ok(self.search_results.iter().take(limit).cloned().collect())
    }
}

/// Mock translator that tags each paragraph with the target language
#[derive(Debug, Default)]
pub struct MockTranslator {
    failure: Option<MockErrorType>,
    drop_last: bool,
    /// Paragraph batches received, in call order
    batches: Mutex<Vec<Vec<String>>>,
}

impl MockTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(error_type: MockErrorType) -> Self {
        Self {
            failure: Some(error_type),
            ..Self::default()
        }
    }

    /// A translator that loses the last paragraph of every batch
    pub fn dropping_last() -> Self {
        Self {
            drop_last: true,
            ..Self::default()
        }
    }

    pub fn call_count(&self) -> usize {
        self.batches.lock().unwrap().len()
    }

    pub fn batches(&self) -> Vec<Vec<String>> {
        self.batches.lock().unwrap().clone()
    }
}

#[async_trait]
impl Translator for MockTranslator {
    async fn translate_batch(
        &self,
        paragraphs: &[String],
        _source_language: &str,
        target_language: &str,
    ) -> Result<Vec<String>, ProviderError> {
        self.batches.lock().unwrap().push(paragraphs.to_vec());
        if let Some(error_type) = self.failure {
            return Err(error_type.to_error());
        }

        let mut translated: Vec<String> = paragraphs
            .iter()
            .map(|p| format!("[{}] {}", target_language, p))
            .collect();
        if self.drop_last {
            translated.pop();
        }
        Ok(translated)
    }
}

/// Mock speech synthesizer returning a fixed MP3 payload
#[derive(Debug, Default)]
pub struct MockSpeech {
    failure: Option<MockErrorType>,
    /// (text, language) of every call
    calls: Mutex<Vec<(String, String)>>,
}

/// Bytes returned by `MockSpeech`
pub const MOCK_MP3: &[u8] = b"ID3\x03\x00mock-audio";

impl MockSpeech {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(error_type: MockErrorType) -> Self {
        Self {
            failure: Some(error_type),
            ..Self::default()
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl SpeechSynthesizer for MockSpeech {
    async fn synthesize(&self, text: &str, language: &str) -> Result<Vec<u8>, ProviderError> {
        self.calls
            .lock()
            .unwrap()
            .push((text.to_string(), language.to_string()));

        match self.failure {
            Some(error_type) => Err(error_type.to_error()),
            None => Ok(MOCK_MP3.to_vec()),
        }
    }
}
