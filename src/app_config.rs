use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Application configuration module
/// This module handles loading the configuration file, applying environment
/// credentials on top of it and validating the result at startup.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Text generation (chat completion) settings
    #[serde(default)]
    pub generation: GenerationConfig,

    /// Paragraph translation settings
    #[serde(default)]
    pub translation: TranslationConfig,

    /// Background lookup settings
    #[serde(default)]
    pub knowledge_base: KnowledgeBaseConfig,

    /// Text-to-speech settings
    #[serde(default)]
    pub speech: SpeechConfig,

    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Narration speed used to turn minutes into a word target
    #[serde(default = "default_words_per_minute")]
    pub words_per_minute: u32,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Text generation provider type
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum GenerationProvider {
    // @provider: Groq (OpenAI-compatible)
    #[default]
    Groq,
    // @provider: OpenAI
    OpenAI,
    // @provider: Anthropic
    Anthropic,
}

impl GenerationProvider {
    // @returns: Capitalized provider name
    pub fn display_name(&self) -> &str {
        match self {
            Self::Groq => "Groq",
            Self::OpenAI => "OpenAI",
            Self::Anthropic => "Anthropic",
        }
    }

    // @returns: Lowercase provider identifier
    pub fn to_lowercase_string(&self) -> String {
        match self {
            Self::Groq => "groq".to_string(),
            Self::OpenAI => "openai".to_string(),
            Self::Anthropic => "anthropic".to_string(),
        }
    }

    // @returns: Environment variables holding the credential, preferred first
    pub fn api_key_env_vars(&self) -> &'static [&'static str] {
        match self {
            Self::Groq => &["GROQ_API_KEY", "Groq_API_Key"],
            Self::OpenAI => &["OPENAI_API_KEY"],
            Self::Anthropic => &["ANTHROPIC_API_KEY"],
        }
    }
}

impl std::fmt::Display for GenerationProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_lowercase_string())
    }
}

impl std::str::FromStr for GenerationProvider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "groq" => Ok(Self::Groq),
            "openai" => Ok(Self::OpenAI),
            "anthropic" => Ok(Self::Anthropic),
            _ => Err(anyhow!("Invalid provider type: {}", s)),
        }
    }
}

/// Chat-completion service configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct GenerationConfig {
    /// Provider to use
    #[serde(default)]
    pub provider: GenerationProvider,

    /// Model identifier; empty means the provider default
    #[serde(default = "String::new")]
    pub model: String,

    /// Service URL; empty means the provider default
    #[serde(default = "String::new")]
    pub endpoint: String,

    /// API key (normally supplied through the environment)
    #[serde(default = "String::new", skip_serializing)]
    pub api_key: String,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Upper bound on generated tokens; unset leaves it to the provider default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,

    /// Request timeout in seconds
    #[serde(default = "default_generation_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            provider: GenerationProvider::default(),
            model: String::new(),
            endpoint: String::new(),
            api_key: String::new(),
            temperature: default_temperature(),
            max_tokens: None,
            timeout_secs: default_generation_timeout_secs(),
        }
    }
}

impl GenerationConfig {
    /// Get the model for the active provider
    pub fn get_model(&self) -> String {
        if !self.model.is_empty() {
            return self.model.clone();
        }

        match self.provider {
            GenerationProvider::Groq => default_groq_model(),
            GenerationProvider::OpenAI => default_openai_model(),
            GenerationProvider::Anthropic => default_anthropic_model(),
        }
    }

    /// Get the token limit sent with each completion
    ///
    /// OpenAI-compatible services get no limit unless one is configured.
    /// Anthropic requires one, so it falls back to 4096.
    pub fn get_max_tokens(&self) -> Option<u32> {
        match (self.max_tokens, &self.provider) {
            (Some(limit), _) => Some(limit),
            (None, GenerationProvider::Anthropic) => Some(default_anthropic_max_tokens()),
            (None, _) => None,
        }
    }

    /// Get the endpoint for the active provider
    pub fn get_endpoint(&self) -> String {
        if !self.endpoint.is_empty() {
            return self.endpoint.clone();
        }

        match self.provider {
            GenerationProvider::Groq => default_groq_endpoint(),
            GenerationProvider::OpenAI => default_openai_endpoint(),
            GenerationProvider::Anthropic => default_anthropic_endpoint(),
        }
    }
}

/// Translation service configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationConfig {
    /// REST endpoint of the translation API
    #[serde(default = "default_translate_endpoint")]
    pub endpoint: String,

    /// API key (normally supplied through the environment)
    #[serde(default = "String::new", skip_serializing)]
    pub api_key: String,

    /// Language the scripts are written in
    #[serde(default = "default_source_language")]
    pub source_language: String,

    /// Payload format sent to the API ("text" or "html")
    #[serde(default = "default_translate_format")]
    pub format: String,

    /// Paragraphs in flight at once; 1 translates sequentially
    #[serde(default = "default_concurrent_requests")]
    pub concurrent_requests: usize,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            endpoint: default_translate_endpoint(),
            api_key: String::new(),
            source_language: default_source_language(),
            format: default_translate_format(),
            concurrent_requests: default_concurrent_requests(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Encyclopedia lookup configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct KnowledgeBaseConfig {
    /// Wikipedia language edition
    #[serde(default = "default_source_language")]
    pub language: String,

    /// User agent sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Number of related titles tried when the exact title is missing
    #[serde(default = "default_search_limit")]
    pub search_limit: usize,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for KnowledgeBaseConfig {
    fn default() -> Self {
        Self {
            language: default_source_language(),
            user_agent: default_user_agent(),
            search_limit: default_search_limit(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl KnowledgeBaseConfig {
    /// Base URL of the configured Wikipedia edition
    pub fn base_url(&self) -> String {
        format!("https://{}.wikipedia.org", self.language)
    }
}

/// Text-to-speech configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SpeechConfig {
    /// TTS endpoint
    #[serde(default = "default_tts_endpoint")]
    pub endpoint: String,

    /// Maximum characters sent per TTS request
    #[serde(default = "default_tts_max_chars")]
    pub max_chars_per_request: usize,

    /// Use the slower speaking rate
    #[serde(default)]
    pub slow: bool,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            endpoint: default_tts_endpoint(),
            max_chars_per_request: default_tts_max_chars(),
            slow: false,
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ServerConfig {
    /// Interface to bind
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Largest accepted upload in bytes
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Matching `log` filter
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_words_per_minute() -> u32 {
    130
}

fn default_temperature() -> f32 {
    0.7
}

fn default_anthropic_max_tokens() -> u32 {
    4096
}

fn default_generation_timeout_secs() -> u64 {
    120
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_concurrent_requests() -> usize {
    1
}

fn default_search_limit() -> usize {
    3
}

fn default_tts_max_chars() -> usize {
    100
}

fn default_max_upload_bytes() -> usize {
    // 20 MiB
    20 * 1024 * 1024
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8501
}

fn default_source_language() -> String {
    "en".to_string()
}

fn default_translate_format() -> String {
    "text".to_string()
}

fn default_user_agent() -> String {
    "EducationalScriptApp/1.0".to_string()
}

fn default_translate_endpoint() -> String {
    "https://translation.googleapis.com/language/translate/v2".to_string()
}

fn default_tts_endpoint() -> String {
    "https://translate.google.com/translate_tts".to_string()
}

fn default_groq_endpoint() -> String {
    "https://api.groq.com/openai/v1".to_string()
}

fn default_openai_endpoint() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_anthropic_endpoint() -> String {
    "https://api.anthropic.com".to_string()
}

fn default_groq_model() -> String {
    "llama3-70b-8192".to_string()
}

fn default_openai_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_anthropic_model() -> String {
    "claude-3-haiku-20240307".to_string()
}

/// Environment variables holding the translation credential, preferred first
pub const TRANSLATION_API_KEY_ENV_VARS: &[&str] = &["GOOGLE_API_KEY", "Google_API"];

/// Highest accepted narration pace
pub const MAX_WORDS_PER_MINUTE: u32 = 1000;

impl Config {
    /// Load the configuration file if it exists, otherwise start from defaults
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let file = File::open(path)
            .with_context(|| format!("Failed to open config file: {}", path.display()))?;
        let reader = BufReader::new(file);
        let config: Config = serde_json::from_reader(reader)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Fill credentials from environment variables
    ///
    /// Values present in the environment override the file.
    pub fn apply_env(&mut self) {
        self.apply_env_with(|name| std::env::var(name).ok());
    }

    /// Fill credentials using a custom variable lookup
    pub fn apply_env_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let first_set = |names: &[&str]| {
            names
                .iter()
                .filter_map(|name| lookup(name))
                .map(|value| value.trim().to_string())
                .find(|value| !value.is_empty())
        };

        if let Some(key) = first_set(self.generation.provider.api_key_env_vars()) {
            self.generation.api_key = key;
        }
        if let Some(key) = first_set(TRANSLATION_API_KEY_ENV_VARS) {
            self.translation.api_key = key;
        }
    }

    /// Validate the configuration for consistency and required values
    ///
    /// Missing credentials are startup errors, never runtime ones.
    pub fn validate(&self) -> Result<()> {
        if self.generation.api_key.trim().is_empty() {
            return Err(anyhow!(
                "Missing {} API key. Set {} in the environment.",
                self.generation.provider.display_name(),
                self.generation.provider.api_key_env_vars()[0]
            ));
        }

        if self.translation.api_key.trim().is_empty() {
            return Err(anyhow!(
                "Missing translation API key. Set {} in the environment.",
                TRANSLATION_API_KEY_ENV_VARS[0]
            ));
        }

        crate::language_utils::get_language_name(&self.translation.source_language)?;

        if self.words_per_minute == 0 || self.words_per_minute > MAX_WORDS_PER_MINUTE {
            return Err(anyhow!(
                "words_per_minute must be between 1 and {}",
                MAX_WORDS_PER_MINUTE
            ));
        }

        if self.generation.max_tokens == Some(0) {
            return Err(anyhow!("generation.max_tokens must be greater than zero when set"));
        }

        if self.knowledge_base.search_limit == 0 {
            return Err(anyhow!("knowledge_base.search_limit must be greater than zero"));
        }

        if self.speech.max_chars_per_request == 0 {
            return Err(anyhow!("speech.max_chars_per_request must be greater than zero"));
        }

        if self.server.port == 0 {
            return Err(anyhow!("server.port must be greater than zero"));
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            generation: GenerationConfig::default(),
            translation: TranslationConfig::default(),
            knowledge_base: KnowledgeBaseConfig::default(),
            speech: SpeechConfig::default(),
            server: ServerConfig::default(),
            words_per_minute: default_words_per_minute(),
            log_level: LogLevel::default(),
        }
    }
}
