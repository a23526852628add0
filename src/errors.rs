/*!
 * Error types for the eduscript application.
 *
 * Collaborator failures are `ProviderError`s. Each pipeline stage converts
 * them into a tagged `StageError` at its boundary, so callers pattern-match
 * on the kind instead of inspecting display strings. The marker-prefixed
 * text shown to users is produced by `StageError::user_message`.
 */

use thiserror::Error;

/// Marker shown in front of every user-visible fault message
pub const ERROR_MARKER: &str = "❌";

/// Marker shown in front of user-visible warnings
pub const WARNING_MARKER: &str = "⚠️";

/// Errors that can occur when working with external services
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Error related to rate limiting
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Error with authentication
    #[error("Authentication error: {0}")]
    AuthenticationError(String),
}

impl ProviderError {
    /// Classify a non-success HTTP status into the matching variant
    pub fn from_status(status_code: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status_code {
            401 | 403 => Self::AuthenticationError(message),
            429 => Self::RateLimitExceeded(message),
            _ => Self::ApiError { status_code, message },
        }
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_connect() || error.is_timeout() {
            Self::ConnectionError(error.to_string())
        } else if error.is_decode() {
            Self::ParseError(error.to_string())
        } else {
            Self::RequestFailed(error.to_string())
        }
    }
}

/// Which stage produced a `StageError`, and how it should be surfaced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageErrorKind {
    /// Background lookup failed (not the same as "nothing found")
    Lookup,
    /// Narration script generation failed
    Generation,
    /// Scene-by-scene video script generation failed
    VideoGeneration,
    /// Paragraph translation failed
    Translation,
    /// There is no usable script to work on
    NoValidScript,
    /// Reading text out of a document failed
    Extraction,
    /// The uploaded file has an extension no reader handles
    UnsupportedFormat,
    /// The document contained no text
    EmptyDocument,
    /// The document language could not be determined
    LanguageDetection,
    /// Text-to-speech synthesis failed
    Speech,
    /// Caller supplied an out-of-range or blank value
    InvalidInput,
    /// A newer script or upload replaced the input while the stage ran
    Superseded,
}

impl StageErrorKind {
    /// Headline used when rendering the error for users
    fn headline(&self) -> &'static str {
        match self {
            Self::Lookup => "Error in background lookup",
            Self::Generation => "Error in script generation",
            Self::VideoGeneration => "Error in video script generation",
            Self::Translation => "Error in translation",
            Self::NoValidScript => "No valid script content",
            Self::Extraction => "Error reading document",
            Self::UnsupportedFormat => "Unsupported file format",
            Self::EmptyDocument => "Error",
            Self::LanguageDetection => "Error detecting language",
            Self::Speech => "Error in speech synthesis",
            Self::InvalidInput => "Invalid input",
            Self::Superseded => "Result discarded",
        }
    }
}

/// Tagged failure of a single pipeline stage
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{}: {message}", kind.headline())]
pub struct StageError {
    /// Stage and category of the failure
    pub kind: StageErrorKind,
    /// Human readable detail
    pub message: String,
}

/// Result type returned by every pipeline stage
pub type StageResult<T> = Result<T, StageError>;

impl StageError {
    /// Create a new stage error
    pub fn new(kind: StageErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Warnings are expected user-facing conditions rather than faults
    pub fn is_warning(&self) -> bool {
        matches!(
            self.kind,
            StageErrorKind::NoValidScript | StageErrorKind::Superseded
        )
    }

    /// Fatal errors halt the operation instead of being displayed in place of content
    pub fn is_fatal(&self) -> bool {
        matches!(self.kind, StageErrorKind::UnsupportedFormat)
    }

    /// Marker distinguishing this message from normal content
    pub fn marker(&self) -> &'static str {
        if self.is_warning() {
            WARNING_MARKER
        } else {
            ERROR_MARKER
        }
    }

    /// Marker-prefixed text displayed in place of the stage output
    pub fn user_message(&self) -> String {
        format!("{} {}", self.marker(), self)
    }
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from a provider
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Error from a pipeline stage
    #[error("Stage error: {0}")]
    Stage(#[from] StageError),

    /// Invalid or incomplete configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
