/*!
 * # EduScript - Educational script and speech generator
 *
 * A Rust library that turns a topic into a narration script, a scene-by-scene
 * video script and translations of that script, and turns uploaded documents
 * into spoken audio.
 *
 * ## Features
 *
 * - Topic lookup on Wikipedia to ground generated scripts in factual content
 * - Script generation with a length derived from the requested duration
 * - Video script expansion from an existing script
 * - Paragraph-wise translation into 17 target languages
 * - Text extraction from TXT, PDF and DOCX uploads
 * - Language detection and speech synthesis of extracted text
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `pipeline`: The script stages:
 *   - `pipeline::lookup`: Background lookup for a topic
 *   - `pipeline::synthesis`: Script generation and markup cleanup
 *   - `pipeline::scenes`: Video script expansion
 *   - `pipeline::translation`: Paragraph-wise translation
 * - `document`: Text extraction from uploaded documents
 * - `speech`: Document to audio conversion
 * - `session`: Per-session state and its registry
 * - `app_controller`: Main application controller
 * - `server`: HTTP surface and browser page
 * - `file_utils`: File system operations and download naming
 * - `language_utils`: Language codes, detection and target languages
 * - `providers`: Clients for the external services:
 *   - `providers::openai`: OpenAI-compatible chat API client (OpenAI, Groq)
 *   - `providers::anthropic`: Anthropic API client
 *   - `providers::wikipedia`: Wikipedia summary and search client
 *   - `providers::google_translate`: Google Cloud Translation client
 *   - `providers::google_tts`: Google text-to-speech client
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod document;
pub mod errors;
pub mod file_utils;
pub mod language_utils;
pub mod pipeline;
pub mod providers;
pub mod server;
pub mod session;
pub mod speech;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::{Controller, Download};
pub use errors::{AppError, ProviderError, StageError, StageErrorKind, StageResult};
pub use file_utils::{DownloadKind, FileManager};
pub use language_utils::{get_language_name, normalize_to_part2t, SUPPORTED_TARGET_LANGUAGES};
pub use session::{SessionContext, SessionManager, TranslatedScript};
pub use speech::AudioResult;
