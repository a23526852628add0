/*!
 * Prompt templates for script and video script generation.
 */

/// System instruction for narration scripts
pub const SCRIPT_SYSTEM_PROMPT: &str = "You are an AI assistant that formats factual content into structured educational scripts. \
Start directly with the script content, focusing on the topic. \
Do NOT include any introductory phrases like 'Here is a formatted script', 'This script contains', or any mention of word count or script details. \
Do NOT include unnecessary descriptions or metadata. \
Do NOT use markdown formatting such as headings, bold or italics.";

/// System instruction for scene-by-scene video scripts
pub const VIDEO_SYSTEM_PROMPT: &str = "You are an AI assistant that converts educational text into structured video scene descriptions for AI-generated videos.";

/// User prompt when background text was found
pub const BACKGROUND_SCRIPT_TEMPLATE: &str = "Format the following factual content into an educational script in English with approximately {target_words} words. \
Do not include extra text like 'Here is the formatted script' or descriptions.\n\n{background}";

/// User prompt when no background text exists
pub const TOPIC_SCRIPT_TEMPLATE: &str = "Write an original educational script about {topic} in English with approximately {target_words} words. \
Keep it factual and engaging. \
Do not include extra text like 'Here is the script' or descriptions.";

/// User prompt for scene expansion
pub const VIDEO_SCRIPT_TEMPLATE: &str = "Convert the following educational script into a video script with scene descriptions, suitable for AI-generated video production.\n\n{script}";

/// Build the narration prompt, preferring background text when there is some
pub fn build_script_prompt(topic: &str, target_words: u32, background: Option<&str>) -> String {
    let target_words = target_words.to_string();
    match background.map(str::trim).filter(|b| !b.is_empty()) {
        Some(background) => BACKGROUND_SCRIPT_TEMPLATE
            .replace("{target_words}", &target_words)
            .replace("{background}", background),
        None => TOPIC_SCRIPT_TEMPLATE
            .replace("{target_words}", &target_words)
            .replace("{topic}", topic.trim()),
    }
}

/// Build the scene expansion prompt
pub fn build_video_prompt(script: &str) -> String {
    VIDEO_SCRIPT_TEMPLATE.replace("{script}", script.trim())
}
