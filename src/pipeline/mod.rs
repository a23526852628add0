/*!
 * Content generation pipeline.
 *
 * Four stages, each composed only after the previous one succeeded:
 *
 * - `lookup`: topic to optional background text
 * - `synthesis`: background text (or bare topic) to a narration script
 * - `scenes`: narration script to a scene-by-scene video script
 * - `translation`: narration script to another language, paragraph by paragraph
 *
 * Every stage returns a `StageResult`; faults never escape as panics or raw
 * provider errors.
 */

pub use self::lookup::SourceLookup;
pub use self::scenes::SceneExpander;
pub use self::synthesis::{ScriptDuration, ScriptSynthesizer, clean_markup};
pub use self::translation::{ScriptTranslator, split_paragraphs};

pub mod lookup;
pub mod prompts;
pub mod scenes;
pub mod synthesis;
pub mod translation;
