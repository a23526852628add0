/*!
 * Tests for language code utilities and detection
 */

use eduscript::language_utils::{
    SUPPORTED_TARGET_LANGUAGES, detect_language, get_language_name, is_right_to_left,
    is_supported_target_language, normalize_to_part1_or_part2t, normalize_to_part2t,
    target_language_label,
};

#[test]
fn test_supportedTargets_shouldOfferSeventeenLanguagesInOrder() {
    assert_eq!(SUPPORTED_TARGET_LANGUAGES.len(), 17);
    assert_eq!(SUPPORTED_TARGET_LANGUAGES[0], ("Urdu", "ur"));
    assert_eq!(SUPPORTED_TARGET_LANGUAGES[16], ("Japanese", "ja"));

    let codes: Vec<&str> = SUPPORTED_TARGET_LANGUAGES.iter().map(|(_, c)| *c).collect();
    assert!(codes.contains(&"zh-CN"));
    assert!(codes.contains(&"zh-TW"));
}

#[test]
fn test_isSupportedTargetLanguage_withRegionCodes_shouldMatchExactly() {
    assert!(is_supported_target_language("zh-CN"));
    assert!(is_supported_target_language("zh-cn"));
    assert!(is_supported_target_language(" fr "));
    assert!(!is_supported_target_language("zh"));
    assert!(!is_supported_target_language("pt"));
    assert!(!is_supported_target_language(""));
}

#[test]
fn test_targetLanguageLabel_shouldReturnDisplayName() {
    assert_eq!(target_language_label("ta"), Some("Tamil"));
    assert_eq!(target_language_label("zh-TW"), Some("Chinese (Traditional)"));
    assert_eq!(target_language_label("xx"), None);
}

#[test]
fn test_isRightToLeft_shouldHoldForArabicScriptTargets() {
    for code in ["ur", "ps", "sd", "ar"] {
        assert!(is_right_to_left(code), "{} should be right to left", code);
    }
    for code in ["pa", "hi", "fr", "zh-CN", "ja"] {
        assert!(!is_right_to_left(code), "{} should be left to right", code);
    }
}

#[test]
fn test_detectLanguage_withEnglishText_shouldReturnPart1Code() {
    let text = "Photosynthesis is the process by which green plants use sunlight \
                to synthesize nutrients from carbon dioxide and water.";
    assert_eq!(detect_language(text).unwrap(), "en");
}

#[test]
fn test_detectLanguage_withFrenchText_shouldReturnFr() {
    let text = "La photosynthèse est le processus par lequel les plantes vertes \
                utilisent la lumière du soleil pour fabriquer leur nourriture.";
    assert_eq!(detect_language(text).unwrap(), "fr");
}

#[test]
fn test_detectLanguage_withMandarinText_shouldReturnZh() {
    let text = "光合作用是绿色植物利用阳光将二氧化碳和水转化为养分的过程，同时释放氧气。";
    assert_eq!(detect_language(text).unwrap(), "zh");
}

#[test]
fn test_detectLanguage_withNoLetters_shouldFail() {
    assert!(detect_language("1234 5678 !!!").is_err());
}

#[test]
fn test_normalizeToPart2t_withVariousCodes_shouldNormalize() {
    assert_eq!(normalize_to_part2t("en").unwrap(), "eng");
    assert_eq!(normalize_to_part2t("fre").unwrap(), "fra");
    assert_eq!(normalize_to_part2t("zh-CN").unwrap(), "zho");
    assert!(normalize_to_part2t("xx").is_err());
}

#[test]
fn test_normalizeToPart1OrPart2t_withThreeLetterCodes_shouldPreferPart1() {
    assert_eq!(normalize_to_part1_or_part2t("eng").unwrap(), "en");
    assert_eq!(normalize_to_part1_or_part2t("ger").unwrap(), "de");
    assert_eq!(normalize_to_part1_or_part2t("pt_BR").unwrap(), "pt");
}

#[test]
fn test_getLanguageName_withValidCode_shouldReturnEnglishName() {
    assert_eq!(get_language_name("ja").unwrap(), "Japanese");
    assert!(get_language_name("zz").is_err());
}
