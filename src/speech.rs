/*!
 * Speech conversion: uploaded document to narrated audio.
 *
 * Extraction, language detection and synthesis run in sequence. An error is
 * never paired with audio.
 */

use log::{error, info};
use std::sync::Arc;

use crate::document;
use crate::errors::{StageError, StageErrorKind, StageResult};
use crate::file_utils::FileManager;
use crate::language_utils;
use crate::providers::SpeechSynthesizer;

/// Synthesized narration of a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioResult {
    /// Detected language of the document (ISO 639-1 when available)
    pub language: String,
    /// MP3 payload
    pub audio: Vec<u8>,
}

impl AudioResult {
    /// Status line shown next to the audio player
    pub fn status(&self) -> String {
        format!("Language detected: {}", self.language)
    }
}

/// Converts uploaded documents to speech
#[derive(Clone)]
pub struct SpeechConverter {
    synthesizer: Arc<dyn SpeechSynthesizer>,
}

impl SpeechConverter {
    pub fn new(synthesizer: Arc<dyn SpeechSynthesizer>) -> Self {
        Self { synthesizer }
    }

    /// Extract, detect and speak a document
    ///
    /// An unsupported extension comes back as a fatal `UnsupportedFormat`
    /// error; every other failure is a recoverable stage error.
    pub async fn convert(&self, file_name: &str, bytes: &[u8]) -> StageResult<AudioResult> {
        let text = document::extract_text(file_name, bytes)?;

        if text.trim().is_empty() {
            return Err(StageError::new(
                StageErrorKind::EmptyDocument,
                "No text found in the file.",
            ));
        }

        let language = language_utils::detect_language(&text)
            .map_err(|e| StageError::new(StageErrorKind::LanguageDetection, e.to_string()))?;
        info!("Detected language '{}' in '{}'", language, file_name);

        let mp3 = self
            .synthesizer
            .synthesize(text.trim(), &language)
            .await
            .map_err(|e| {
                error!("Speech synthesis for '{}' failed: {}", file_name, e);
                StageError::new(StageErrorKind::Speech, e.to_string())
            })?;

        let audio = Self::stage_audio(&mp3)
            .map_err(|e| StageError::new(StageErrorKind::Speech, format!("{:#}", e)))?;

        Ok(AudioResult { language, audio })
    }

    // Round-trips the audio through a temp file that is removed on drop,
    // including on the error path
    fn stage_audio(mp3: &[u8]) -> anyhow::Result<Vec<u8>> {
        let staged = FileManager::stage_temp_file(mp3, ".mp3")?;
        FileManager::read_bytes(staged.path())
    }
}
