/*!
 * Script translation, one paragraph at a time.
 */

use log::{error, info, warn};
use std::sync::Arc;

use crate::errors::{ERROR_MARKER, StageError, StageErrorKind, StageResult, WARNING_MARKER};
use crate::language_utils;
use crate::providers::Translator;

/// Separator between paragraphs in scripts and translations
pub const PARAGRAPH_SEPARATOR: &str = "\n\n";

/// Split a script at blank-line boundaries, dropping empty paragraphs
pub fn split_paragraphs(script: &str) -> Vec<String> {
    script
        .split(PARAGRAPH_SEPARATOR)
        .filter(|p| !p.trim().is_empty())
        .map(str::to_string)
        .collect()
}

/// Translates scripts through a paragraph `Translator`
#[derive(Clone)]
pub struct ScriptTranslator {
    translator: Arc<dyn Translator>,
    source_language: String,
}

impl ScriptTranslator {
    pub fn new(translator: Arc<dyn Translator>, source_language: impl Into<String>) -> Self {
        Self {
            translator,
            source_language: source_language.into(),
        }
    }

    /// Translate a script into `target_language`
    ///
    /// A missing, blank or error-marked script is refused with a
    /// `NoValidScript` warning before any request is made. A failure on any
    /// paragraph fails the whole translation.
    pub async fn translate(&self, script: Option<&str>, target_language: &str) -> StageResult<String> {
        let script = match script.map(str::trim) {
            Some(s) if !s.is_empty() && !s.starts_with(ERROR_MARKER) && !s.starts_with(WARNING_MARKER) => s,
            _ => {
                warn!("Translation requested without a usable script");
                return Err(StageError::new(
                    StageErrorKind::NoValidScript,
                    "No valid script content to translate.",
                ));
            }
        };

        if !language_utils::is_supported_target_language(target_language) {
            return Err(StageError::new(
                StageErrorKind::InvalidInput,
                format!("Unsupported target language: {}", target_language),
            ));
        }

        let paragraphs = split_paragraphs(script);
        info!(
            "Translating {} paragraph(s) into {}",
            paragraphs.len(),
            target_language
        );

        let translated = self
            .translator
            .translate_batch(&paragraphs, &self.source_language, target_language)
            .await
            .map_err(|e| {
                error!("Translation into {} failed: {}", target_language, e);
                StageError::new(StageErrorKind::Translation, e.to_string())
            })?;

        if translated.len() != paragraphs.len() {
            return Err(StageError::new(
                StageErrorKind::Translation,
                format!(
                    "Expected {} translated paragraphs, got {}",
                    paragraphs.len(),
                    translated.len()
                ),
            ));
        }

        Ok(translated.join(PARAGRAPH_SEPARATOR))
    }
}
