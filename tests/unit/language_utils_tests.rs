/*!
 * Tests for language code utilities
 */

use traduire::language_utils::{
    LanguageCodeType, get_language_name, language_codes_match, normalize_to_part2t, validate_language_code,
};

/// Test code type detection
#[test]
fn test_validate_language_code_withValidCodes_shouldDetectType() {
    assert_eq!(validate_language_code("fr").unwrap(), LanguageCodeType::Part1);
    assert_eq!(validate_language_code("EN").unwrap(), LanguageCodeType::Part1);
    assert_eq!(validate_language_code("fra").unwrap(), LanguageCodeType::Part2T);
    assert_eq!(validate_language_code("fre").unwrap(), LanguageCodeType::Part2B);
    assert_eq!(validate_language_code(" deu ").unwrap(), LanguageCodeType::Part2T);
}

/// Test invalid codes are rejected
#[test]
fn test_validate_language_code_withInvalidCodes_shouldFail() {
    for code in ["", "x", "xx", "xyz", "french", "f1"] {
        assert!(validate_language_code(code).is_err(), "code: {code:?}");
    }
}

/// Test normalization to 3-letter terminology codes
#[test]
fn test_normalize_to_part2t_withAnyForm_shouldReturnTerminologyCode() {
    assert_eq!(normalize_to_part2t("fr").unwrap(), "fra");
    assert_eq!(normalize_to_part2t("fre").unwrap(), "fra");
    assert_eq!(normalize_to_part2t("FRA").unwrap(), "fra");
    assert_eq!(normalize_to_part2t("ger").unwrap(), "deu");
    assert_eq!(normalize_to_part2t("en").unwrap(), "eng");
}

/// Test matching across code forms
#[test]
fn test_language_codes_match_withEquivalentCodes_shouldMatch() {
    assert!(language_codes_match("fr", "fra"));
    assert!(language_codes_match("fre", "fr"));
    assert!(language_codes_match("EN", "eng"));
    assert!(!language_codes_match("fr", "en"));
    assert!(!language_codes_match("fr", "xyz"));
}

/// Test English language names used in prompts
#[test]
fn test_get_language_name_withKnownCodes_shouldReturnEnglishName() {
    assert_eq!(get_language_name("fr").unwrap(), "French");
    assert_eq!(get_language_name("eng").unwrap(), "English");
    assert_eq!(get_language_name("ger").unwrap(), "German");
    assert!(get_language_name("zz").is_err());
}
