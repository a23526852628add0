/*!
 * Script synthesis: turn a topic (and any background text) into a narration
 * script of a target length.
 */

use log::{error, info};
use std::sync::Arc;

use crate::errors::{StageError, StageErrorKind, StageResult};
use crate::providers::TextGenerator;

use super::lookup::SourceLookup;
use super::prompts::{SCRIPT_SYSTEM_PROMPT, build_script_prompt};

/// Narration speed used when none is configured
pub const DEFAULT_WORDS_PER_MINUTE: u32 = 130;

/// Script length in minutes, bounded to `[MIN, MAX]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScriptDuration(u32);

impl ScriptDuration {
    pub const MIN: u32 = 1;
    pub const MAX: u32 = 30;

    /// Validate a duration in minutes
    pub fn new(minutes: u32) -> StageResult<Self> {
        if (Self::MIN..=Self::MAX).contains(&minutes) {
            Ok(Self(minutes))
        } else {
            Err(StageError::new(
                StageErrorKind::InvalidInput,
                format!(
                    "Duration must be between {} and {} minutes, got {}",
                    Self::MIN,
                    Self::MAX,
                    minutes
                ),
            ))
        }
    }

    pub fn minutes(&self) -> u32 {
        self.0
    }

    /// Word count to ask the model for
    pub fn target_words(&self, words_per_minute: u32) -> u32 {
        self.0.saturating_mul(words_per_minute)
    }
}

impl Default for ScriptDuration {
    fn default() -> Self {
        Self(2)
    }
}

/// Strip the emphasis and heading markers models add despite instructions
pub fn clean_markup(text: &str) -> String {
    text.trim()
        .replace("**", "")
        .replace('*', "")
        .replace("###", "")
        .replace("##", "")
        .replace('#', "")
}

/// Runs source lookup followed by text generation
#[derive(Clone)]
pub struct ScriptSynthesizer {
    lookup: SourceLookup,
    generator: Arc<dyn TextGenerator>,
    words_per_minute: u32,
}

impl ScriptSynthesizer {
    pub fn new(lookup: SourceLookup, generator: Arc<dyn TextGenerator>, words_per_minute: u32) -> Self {
        Self {
            lookup,
            generator,
            words_per_minute,
        }
    }

    /// Generate a cleaned narration script
    ///
    /// Missing background text falls back to a topic-only prompt. Any lookup or
    /// generation fault becomes a `Generation` error.
    pub async fn synthesize(&self, topic: &str, duration: ScriptDuration) -> StageResult<String> {
        let topic = topic.trim();
        if topic.is_empty() {
            return Err(StageError::new(
                StageErrorKind::InvalidInput,
                "Please enter a topic",
            ));
        }

        let target_words = duration.target_words(self.words_per_minute);

        let background = self.lookup.lookup(topic).await.map_err(|e| {
            error!("Background lookup for '{}' failed: {}", topic, e);
            StageError::new(StageErrorKind::Generation, e.to_string())
        })?;

        info!(
            "Generating ~{} word script for '{}' ({})",
            target_words,
            topic,
            if background.is_some() { "with background" } else { "topic only" }
        );

        let prompt = build_script_prompt(topic, target_words, background.as_deref());

        let raw = self
            .generator
            .generate(SCRIPT_SYSTEM_PROMPT, &prompt)
            .await
            .map_err(|e| {
                error!("Script generation for '{}' failed: {}", topic, e);
                StageError::new(StageErrorKind::Generation, e.to_string())
            })?;

        let script = clean_markup(&raw);
        if script.is_empty() {
            return Err(StageError::new(
                StageErrorKind::Generation,
                "The model returned an empty script",
            ));
        }

        Ok(script)
    }
}
