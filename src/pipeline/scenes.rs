/*!
 * Scene expansion: turn a narration script into a scene-by-scene video script.
 */

use log::{error, info};
use std::sync::Arc;

use crate::errors::{StageError, StageErrorKind, StageResult};
use crate::providers::TextGenerator;

use super::prompts::{VIDEO_SYSTEM_PROMPT, build_video_prompt};

/// Converts scripts into visual scene descriptions
#[derive(Clone)]
pub struct SceneExpander {
    generator: Arc<dyn TextGenerator>,
}

impl SceneExpander {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    /// Expand a script into scene descriptions
    ///
    /// The model output is returned as is, without markup stripping.
    pub async fn expand(&self, script: &str) -> StageResult<String> {
        if script.trim().is_empty() {
            return Err(StageError::new(
                StageErrorKind::NoValidScript,
                "Generate a script first",
            ));
        }

        info!("Expanding {} character script into scenes", script.len());

        let video_script = self
            .generator
            .generate(VIDEO_SYSTEM_PROMPT, &build_video_prompt(script))
            .await
            .map_err(|e| {
                error!("Video script generation failed: {}", e);
                StageError::new(StageErrorKind::VideoGeneration, e.to_string())
            })?;

        Ok(video_script.trim().to_string())
    }
}
