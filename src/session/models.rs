/*!
 * Per-session state retained between user interactions.
 */

use serde::Serialize;

use crate::language_utils;
use crate::speech::AudioResult;

/// A script translated into one target language
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranslatedScript {
    /// Target language code
    pub language: String,
    /// Translated text, paragraphs separated by blank lines
    pub text: String,
}

impl TranslatedScript {
    /// Whether the text should be displayed right to left
    pub fn is_right_to_left(&self) -> bool {
        language_utils::is_right_to_left(&self.language)
    }
}

/// Everything one user session keeps between requests
///
/// Each field is either absent or a complete value. Derived scripts are
/// dropped whenever the script they came from is replaced.
#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    /// Topic the current script was generated for
    topic: Option<String>,
    /// Narration script
    script: Option<String>,
    /// Scene-by-scene script derived from `script`
    video_script: Option<String>,
    /// Translation derived from `script`
    translated_script: Option<TranslatedScript>,
    /// Bumped every time the script is replaced or removed
    script_version: u64,
    /// Status line of the last speech conversion
    speech_status: Option<String>,
    /// Audio from the last successful speech conversion
    audio: Option<AudioResult>,
    /// Name of the most recently uploaded file
    last_uploaded_file: Option<String>,
    /// Bumped every time a conversion starts or the session is cleared
    speech_version: u64,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn topic(&self) -> Option<&str> {
        self.topic.as_deref()
    }

    pub fn script(&self) -> Option<&str> {
        self.script.as_deref()
    }

    pub fn video_script(&self) -> Option<&str> {
        self.video_script.as_deref()
    }

    pub fn translated_script(&self) -> Option<&TranslatedScript> {
        self.translated_script.as_ref()
    }

    pub fn script_version(&self) -> u64 {
        self.script_version
    }

    pub fn speech_status(&self) -> Option<&str> {
        self.speech_status.as_deref()
    }

    pub fn audio(&self) -> Option<&AudioResult> {
        self.audio.as_ref()
    }

    pub fn last_uploaded_file(&self) -> Option<&str> {
        self.last_uploaded_file.as_deref()
    }

    pub fn speech_version(&self) -> u64 {
        self.speech_version
    }

    /// Replace the script, invalidating everything derived from the old one
    pub fn set_script(&mut self, topic: &str, script: String) {
        self.topic = Some(topic.trim().to_string());
        self.script = Some(script);
        self.invalidate_derived();
    }

    /// Drop the script after a failed regeneration
    pub fn clear_script(&mut self) {
        self.script = None;
        self.invalidate_derived();
    }

    pub fn set_video_script(&mut self, video_script: String) {
        self.video_script = Some(video_script);
    }

    pub fn set_translated_script(&mut self, translated: TranslatedScript) {
        self.translated_script = Some(translated);
    }

    /// Record an upload; a different file than last time clears the previous result
    ///
    /// Returns true when the previous result was cleared.
    pub fn note_upload(&mut self, file_name: &str) -> bool {
        if self.last_uploaded_file.as_deref() == Some(file_name) {
            return false;
        }

        self.last_uploaded_file = Some(file_name.to_string());
        self.clear_speech();
        true
    }

    /// Start a conversion of `file_name`, dropping any previous result
    ///
    /// Returns the speech version the conversion's result must be stored against.
    pub fn begin_speech(&mut self, file_name: &str) -> u64 {
        self.note_upload(file_name);
        self.clear_speech();
        self.speech_version += 1;
        self.speech_version
    }

    /// Forget the previous conversion result
    pub fn clear_speech(&mut self) {
        self.audio = None;
        self.speech_status = None;
    }

    /// Store a successful conversion
    pub fn set_audio(&mut self, audio: AudioResult) {
        self.speech_status = Some(audio.status());
        self.audio = Some(audio);
    }

    /// Store a failed conversion; no audio survives next to an error status
    pub fn set_speech_error(&mut self, status: String) {
        self.speech_status = Some(status);
        self.audio = None;
    }

    /// Reset the whole session ("Clear All")
    pub fn clear(&mut self) {
        let script_version = self.script_version;
        let speech_version = self.speech_version;
        *self = Self::default();
        // Keep counting so results started before the reset are still told apart
        self.script_version = script_version + 1;
        self.speech_version = speech_version + 1;
    }

    fn invalidate_derived(&mut self) {
        self.video_script = None;
        self.translated_script = None;
        self.script_version += 1;
    }
}
