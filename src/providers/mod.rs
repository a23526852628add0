/*!
 * Client implementations for the external services the pipelines call.
 *
 * - `openai`: OpenAI-compatible chat completions (Groq, OpenAI)
 * - `anthropic`: Anthropic messages API
 * - `wikipedia`: page summaries and title search
 * - `google_translate`: Cloud Translation v2 REST API
 * - `google_tts`: Google Translate text-to-speech endpoint
 *
 * The pipeline stages only see the collaborator traits declared here, so any
 * of these clients can be swapped for a test double.
 */

use async_trait::async_trait;
use log::debug;
use std::fmt::Debug;

use crate::app_config::{GenerationConfig, GenerationProvider};
use crate::errors::ProviderError;

use self::anthropic::{Anthropic, AnthropicRequest};
use self::openai::{OpenAI, OpenAIRequest};

/// Common trait for all LLM providers
///
/// This trait defines the interface that all chat-completion clients follow,
/// allowing them to be used interchangeably behind `GenerationClient`.
#[async_trait]
pub trait Provider: Send + Sync + Debug {
    /// The request type for this provider
    type Request: Send + Sync;

    /// The response type for this provider
    type Response: Send + Sync;

    /// Complete a request using this provider
    async fn complete(&self, request: Self::Request) -> Result<Self::Response, ProviderError>;

    /// Test the connection to the provider
    async fn test_connection(&self) -> Result<(), ProviderError>;

    /// Extract text from the provider response
    fn extract_text(response: &Self::Response) -> String;
}

/// Produces one completion for a system instruction and a user prompt
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, system: &str, prompt: &str) -> Result<String, ProviderError>;
}

/// Encyclopedia used to find background text for a topic
#[async_trait]
pub trait KnowledgeBase: Send + Sync {
    /// Summary of the page with exactly this title, `None` if there is no such page
    async fn summary(&self, title: &str) -> Result<Option<String>, ProviderError>;

    /// Up to `limit` page titles related to the query, best match first
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<String>, ProviderError>;
}

/// Translates a batch of independent paragraphs
///
/// Implementations must return exactly one translation per input paragraph,
/// in input order.
#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate_batch(
        &self,
        paragraphs: &[String],
        source_language: &str,
        target_language: &str,
    ) -> Result<Vec<String>, ProviderError>;
}

/// Turns text into encoded (MP3) audio
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    async fn synthesize(&self, text: &str, language: &str) -> Result<Vec<u8>, ProviderError>;
}

// Anthropic rejects requests without a token limit
const ANTHROPIC_MAX_TOKENS: u32 = 4096;

/// Chat-completion client selected by configuration
#[derive(Debug)]
pub enum GenerationClient {
    /// OpenAI-compatible API (Groq, OpenAI)
    OpenAI {
        client: OpenAI,
        temperature: f32,
        max_tokens: Option<u32>,
    },

    /// Anthropic API
    Anthropic {
        client: Anthropic,
        temperature: f32,
        max_tokens: u32,
    },
}

impl GenerationClient {
    /// Build the client for the configured provider
    pub fn from_config(config: &GenerationConfig) -> Self {
        let model = config.get_model();
        let endpoint = config.get_endpoint();

        match config.provider {
            GenerationProvider::Groq | GenerationProvider::OpenAI => Self::OpenAI {
                client: OpenAI::new(&config.api_key, endpoint, model, config.timeout_secs),
                temperature: config.temperature,
                max_tokens: config.get_max_tokens(),
            },
            GenerationProvider::Anthropic => Self::Anthropic {
                client: Anthropic::new(&config.api_key, endpoint, model, config.timeout_secs),
                temperature: config.temperature,
                max_tokens: config.get_max_tokens().unwrap_or(ANTHROPIC_MAX_TOKENS),
            },
        }
    }

    /// Check that the service accepts our credential and model
    pub async fn test_connection(&self) -> Result<(), ProviderError> {
        match self {
            Self::OpenAI { client, .. } => client.test_connection().await,
            Self::Anthropic { client, .. } => client.test_connection().await,
        }
    }
}

#[async_trait]
impl TextGenerator for GenerationClient {
    async fn generate(&self, system: &str, prompt: &str) -> Result<String, ProviderError> {
        let text = match self {
            Self::OpenAI {
                client,
                temperature,
                max_tokens,
            } => {
                let mut request = OpenAIRequest::new(client.model())
                    .add_message("system", system)
                    .add_message("user", prompt)
                    .temperature(*temperature);
                if let Some(limit) = max_tokens {
                    request = request.max_tokens(*limit);
                }
                let response = client.complete(request).await?;
                OpenAI::extract_text(&response)
            }
            Self::Anthropic {
                client,
                temperature,
                max_tokens,
            } => {
                let request = AnthropicRequest::new(client.model(), *max_tokens)
                    .system(system)
                    .add_message("user", prompt)
                    .temperature(*temperature);
                let response = client.complete(request).await?;
                Anthropic::extract_text(&response)
            }
        };

        if text.trim().is_empty() {
            return Err(ProviderError::ParseError(
                "Completion contained no text".to_string(),
            ));
        }

        debug!("Received completion of {} characters", text.len());
        Ok(text)
    }
}

pub mod anthropic;
pub mod google_translate;
pub mod google_tts;
pub mod openai;
pub mod wikipedia;
