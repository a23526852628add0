use anyhow::{Result, anyhow};
use isolang::Language;

/// Language utilities for ISO language code handling
///
/// This module provides the fixed list of translation targets offered to
/// users, detection of a document's dominant language, and helpers for
/// validating and normalizing ISO 639-1 (2-letter) and ISO 639-2 (3-letter)
/// codes.
/// Target languages offered for translation, as (label, code) pairs
pub const SUPPORTED_TARGET_LANGUAGES: &[(&str, &str)] = &[
    ("Urdu", "ur"),
    ("Punjabi", "pa"),
    ("Pashto", "ps"),
    ("Sindhi", "sd"),
    ("Hindi", "hi"),
    ("Arabic", "ar"),
    ("Tamil", "ta"),
    ("Telugu", "te"),
    ("Chinese (Simplified)", "zh-CN"),
    ("Chinese (Traditional)", "zh-TW"),
    ("Turkish", "tr"),
    ("French", "fr"),
    ("Spanish", "es"),
    ("German", "de"),
    ("Italian", "it"),
    ("Russian", "ru"),
    ("Japanese", "ja"),
];

// Written right to left
const RTL_LANGUAGES: &[&str] = &["ur", "ps", "sd", "ar"];

/// Check whether a code is one of the offered translation targets
pub fn is_supported_target_language(code: &str) -> bool {
    target_language_label(code).is_some()
}

/// Display label of an offered translation target
pub fn target_language_label(code: &str) -> Option<&'static str> {
    let code = code.trim();
    SUPPORTED_TARGET_LANGUAGES
        .iter()
        .find(|(_, c)| c.eq_ignore_ascii_case(code))
        .map(|(label, _)| *label)
}

/// Whether text in this language should be rendered right to left
pub fn is_right_to_left(code: &str) -> bool {
    let primary = primary_subtag(code);
    RTL_LANGUAGES.contains(&primary.as_str())
}

/// Detect the dominant language of a text, as an ISO 639-1 code when one exists
pub fn detect_language(text: &str) -> Result<String> {
    let info = whatlang::detect(text)
        .ok_or_else(|| anyhow!("Could not detect the language of the text"))?;

    let code_639_3 = info.lang().code();

    // Mandarin is reported as a 639-3 macrolanguage member with no 639-1 code
    if code_639_3 == "cmn" {
        return Ok("zh".to_string());
    }

    normalize_to_part1_or_part2t(code_639_3)
}

// ISO 639-2/B codes that differ from their 639-2/T counterpart
fn part2b_to_part2t(code: &str) -> Option<&'static str> {
    match code {
        "fre" => Some("fra"),
        "ger" => Some("deu"),
        "dut" => Some("nld"),
        "gre" => Some("ell"),
        "chi" => Some("zho"),
        "cze" => Some("ces"),
        "ice" => Some("isl"),
        "alb" => Some("sqi"),
        "arm" => Some("hye"),
        "baq" => Some("eus"),
        "bur" => Some("mya"),
        "per" => Some("fas"),
        "geo" => Some("kat"),
        "may" => Some("msa"),
        "mac" => Some("mkd"),
        "rum" => Some("ron"),
        "slo" => Some("slk"),
        "wel" => Some("cym"),
        _ => None,
    }
}

// Lowercased language subtag, without any region ("zh-CN" -> "zh")
fn primary_subtag(code: &str) -> String {
    code.trim()
        .split(['-', '_'])
        .next()
        .unwrap_or_default()
        .to_lowercase()
}

/// Normalize a language code to ISO 639-2/T (3-letter) format
pub fn normalize_to_part2t(code: &str) -> Result<String> {
    let normalized_code = primary_subtag(code);

    if normalized_code.len() == 2 {
        if let Some(lang) = Language::from_639_1(&normalized_code) {
            return Ok(lang.to_639_3().to_string());
        }
    } else if normalized_code.len() == 3 {
        if Language::from_639_3(&normalized_code).is_some() {
            return Ok(normalized_code);
        }

        if let Some(part2t) = part2b_to_part2t(&normalized_code) {
            return Ok(part2t.to_string());
        }
    }

    Err(anyhow!("Cannot normalize invalid language code: {}", code))
}

/// Normalize a language code to ISO 639-1 (2-letter) format if possible
/// Falls back to ISO 639-2/T if no ISO 639-1 code exists
pub fn normalize_to_part1_or_part2t(code: &str) -> Result<String> {
    let normalized_code = primary_subtag(code);

    if normalized_code.len() == 2 {
        if Language::from_639_1(&normalized_code).is_some() {
            return Ok(normalized_code);
        }
    } else if normalized_code.len() == 3 {
        let part2t = part2b_to_part2t(&normalized_code).unwrap_or(normalized_code.as_str());

        if let Some(lang) = Language::from_639_3(part2t) {
            if let Some(code_639_1) = lang.to_639_1() {
                return Ok(code_639_1.to_string());
            }

            return Ok(part2t.to_string());
        }
    }

    Err(anyhow!("Cannot normalize invalid language code: {}", code))
}

/// Get the language name from a code
pub fn get_language_name(code: &str) -> Result<String> {
    let normalized = normalize_to_part2t(code)?;
    let lang = Language::from_639_3(&normalized)
        .ok_or_else(|| anyhow!("Failed to get language from code: {}", normalized))?;

    Ok(lang.to_name().to_string())
}
