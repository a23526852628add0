use log::{info, warn};
use std::sync::Arc;

use crate::app_config::Config;
use crate::errors::{StageError, StageErrorKind, StageResult};
use crate::file_utils::{DownloadKind, FileManager};
use crate::pipeline::{SceneExpander, ScriptDuration, ScriptSynthesizer, ScriptTranslator, SourceLookup};
use crate::providers::google_translate::GoogleTranslate;
use crate::providers::google_tts::GoogleTts;
use crate::providers::wikipedia::Wikipedia;
use crate::providers::{GenerationClient, KnowledgeBase, SpeechSynthesizer, TextGenerator, Translator};
use crate::session::{SessionContext, TranslatedScript};
use crate::speech::{AudioResult, SpeechConverter};

// @module: Application controller driving the pipelines for one session

/// A file ready to be handed to the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download {
    pub file_name: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

/// Main application controller
///
/// Every operation works on the `SessionContext` it is given and records
/// its outcome there, so handlers never reach for shared mutable state.
/// Each one also comes split in two: an async half that touches no session,
/// and an `apply_*` half that records the outcome. The server runs the first
/// without holding the session lock and the second under it.
#[derive(Clone)]
pub struct Controller {
    synthesizer: ScriptSynthesizer,
    expander: SceneExpander,
    translator: ScriptTranslator,
    speech: SpeechConverter,
}

impl Controller {
    /// Create a controller from ready-made stages
    pub fn new(
        synthesizer: ScriptSynthesizer,
        expander: SceneExpander,
        translator: ScriptTranslator,
        speech: SpeechConverter,
    ) -> Self {
        Self {
            synthesizer,
            expander,
            translator,
            speech,
        }
    }

    /// Wire the stages to arbitrary collaborators
    pub fn with_services(
        config: &Config,
        generator: Arc<dyn TextGenerator>,
        knowledge_base: Arc<dyn KnowledgeBase>,
        translator: Arc<dyn Translator>,
        synthesizer: Arc<dyn SpeechSynthesizer>,
    ) -> Self {
        let lookup = SourceLookup::new(knowledge_base, config.knowledge_base.search_limit);
        Self::new(
            ScriptSynthesizer::new(lookup, generator.clone(), config.words_per_minute),
            SceneExpander::new(generator),
            ScriptTranslator::new(translator, config.translation.source_language.clone()),
            SpeechConverter::new(synthesizer),
        )
    }

    /// Wire the stages to the configured HTTP clients
    pub fn from_config(config: &Config) -> Self {
        info!(
            "Using {} model '{}' for generation",
            config.generation.provider.display_name(),
            config.generation.get_model()
        );

        let generator = Arc::new(GenerationClient::from_config(&config.generation));
        let knowledge_base = Arc::new(Wikipedia::new(
            config.knowledge_base.base_url(),
            &config.knowledge_base.user_agent,
            config.knowledge_base.timeout_secs,
        ));
        let translator = Arc::new(GoogleTranslate::new(
            config.translation.endpoint.clone(),
            config.translation.api_key.clone(),
            config.translation.format.clone(),
            config.translation.concurrent_requests,
            config.translation.timeout_secs,
        ));
        let tts = Arc::new(GoogleTts::new(
            config.speech.endpoint.clone(),
            config.speech.max_chars_per_request,
            config.speech.slow,
            config.speech.timeout_secs,
        ));

        Self::with_services(config, generator, knowledge_base, translator, tts)
    }

    /// Generate a narration script and make it the session's current script
    ///
    /// Invalid input leaves the session untouched; a failed generation removes
    /// the previous script together with everything derived from it.
    pub async fn generate_script(
        &self,
        ctx: &mut SessionContext,
        topic: &str,
        minutes: u32,
    ) -> StageResult<String> {
        let base_version = ctx.script_version();
        let result = self.synthesize_script(topic, minutes).await;
        self.apply_script(ctx, topic, base_version, result)
    }

    /// Run script synthesis without touching any session
    pub async fn synthesize_script(&self, topic: &str, minutes: u32) -> StageResult<String> {
        let duration = ScriptDuration::new(minutes)?;
        self.synthesizer.synthesize(topic, duration).await
    }

    /// Record a script generation that started at `base_version`
    ///
    /// A new script always replaces the current one. A failure only clears
    /// the script if nothing replaced it while the generation ran.
    pub fn apply_script(
        &self,
        ctx: &mut SessionContext,
        topic: &str,
        base_version: u64,
        result: StageResult<String>,
    ) -> StageResult<String> {
        match result {
            Ok(script) => {
                ctx.set_script(topic, script.clone());
                Ok(script)
            }
            Err(e) if e.kind == StageErrorKind::InvalidInput => Err(e),
            Err(e) => {
                if ctx.script_version() == base_version {
                    ctx.clear_script();
                }
                Err(e)
            }
        }
    }

    /// Expand the session's script into a video script
    pub async fn generate_video_script(&self, ctx: &mut SessionContext) -> StageResult<String> {
        let base_version = ctx.script_version();
        let result = self.expand_script(ctx.script()).await;
        self.apply_video_script(ctx, base_version, result)
    }

    /// Run scene expansion on a script taken out of a session
    pub async fn expand_script(&self, script: Option<&str>) -> StageResult<String> {
        let script = script.ok_or_else(|| {
            StageError::new(StageErrorKind::NoValidScript, "Generate a script first")
        })?;
        self.expander.expand(script).await
    }

    /// Record a video script derived from script version `base_version`
    pub fn apply_video_script(
        &self,
        ctx: &mut SessionContext,
        base_version: u64,
        result: StageResult<String>,
    ) -> StageResult<String> {
        let video_script = result?;
        ensure_script_unchanged(ctx, base_version)?;
        ctx.set_video_script(video_script.clone());
        Ok(video_script)
    }

    /// Translate the session's script
    pub async fn translate_script(
        &self,
        ctx: &mut SessionContext,
        language: &str,
    ) -> StageResult<TranslatedScript> {
        let base_version = ctx.script_version();
        let result = self.translate_text(ctx.script(), language).await;
        self.apply_translation(ctx, base_version, result)
    }

    /// Run translation on a script taken out of a session
    pub async fn translate_text(
        &self,
        script: Option<&str>,
        language: &str,
    ) -> StageResult<TranslatedScript> {
        let text = self.translator.translate(script, language).await?;
        Ok(TranslatedScript {
            language: language.trim().to_string(),
            text,
        })
    }

    /// Record a translation derived from script version `base_version`
    pub fn apply_translation(
        &self,
        ctx: &mut SessionContext,
        base_version: u64,
        result: StageResult<TranslatedScript>,
    ) -> StageResult<TranslatedScript> {
        let translated = result?;
        ensure_script_unchanged(ctx, base_version)?;
        ctx.set_translated_script(translated.clone());
        Ok(translated)
    }

    /// Convert an uploaded document to speech
    ///
    /// Any previous result is cleared first. Fatal errors are returned without
    /// touching the status line; recoverable ones are recorded as the status.
    pub async fn convert_speech(
        &self,
        ctx: &mut SessionContext,
        file_name: &str,
        bytes: &[u8],
    ) -> StageResult<AudioResult> {
        let speech_version = ctx.begin_speech(file_name);
        let result = self.synthesize_speech(file_name, bytes).await;
        self.apply_speech(ctx, speech_version, file_name, result)
    }

    /// Run speech conversion without touching any session
    pub async fn synthesize_speech(&self, file_name: &str, bytes: &[u8]) -> StageResult<AudioResult> {
        self.speech.convert(file_name, bytes).await
    }

    /// Record a conversion begun with `SessionContext::begin_speech`
    ///
    /// The outcome is dropped when another upload started in the meantime.
    pub fn apply_speech(
        &self,
        ctx: &mut SessionContext,
        speech_version: u64,
        file_name: &str,
        result: StageResult<AudioResult>,
    ) -> StageResult<AudioResult> {
        if let Err(e) = &result {
            if e.is_fatal() {
                warn!("Rejected upload '{}': {}", file_name, e);
                return result;
            }
        }

        if ctx.speech_version() != speech_version {
            warn!("Dropping speech result for superseded upload '{}'", file_name);
            return Err(StageError::new(
                StageErrorKind::Superseded,
                "Another upload replaced this file before it was converted",
            ));
        }

        match result {
            Ok(audio) => {
                ctx.set_audio(audio.clone());
                Ok(audio)
            }
            Err(e) => {
                ctx.set_speech_error(e.user_message());
                Err(e)
            }
        }
    }

    /// Reset the session ("Clear All")
    pub fn clear(&self, ctx: &mut SessionContext) {
        ctx.clear();
    }

    /// Package stored content as a file download
    pub fn download(&self, ctx: &SessionContext, kind: DownloadKind) -> Option<Download> {
        let topic = ctx.topic().unwrap_or_default();
        let bytes = match kind {
            DownloadKind::Script => ctx.script()?.as_bytes().to_vec(),
            DownloadKind::VideoScript => ctx.video_script()?.as_bytes().to_vec(),
            DownloadKind::TranslatedScript => ctx.translated_script()?.text.as_bytes().to_vec(),
            DownloadKind::Audio => ctx.audio()?.audio.clone(),
        };

        Some(Download {
            file_name: FileManager::download_file_name(topic, kind),
            content_type: kind.content_type(),
            bytes,
        })
    }
}

// Derived output is only kept for the script it was made from
fn ensure_script_unchanged(ctx: &SessionContext, base_version: u64) -> StageResult<()> {
    if ctx.script_version() != base_version {
        warn!("Dropping output derived from script version {}", base_version);
        return Err(StageError::new(
            StageErrorKind::Superseded,
            "The script changed while this was running. Run it again for the new script.",
        ));
    }
    Ok(())
}
