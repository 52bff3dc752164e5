/*!
 * Tests for language utility functions
 */

use anyhow::Result;
use captionkit::language_utils::{
    get_language_name, is_known_language, language_tags_match, primary_subtag, validate_language_tag,
};

/// Test validation of language tags
#[test]
fn test_validateLanguageTag_withValidTags_shouldSucceed() {
    assert!(validate_language_tag("en").is_ok());
    assert!(validate_language_tag("en-US").is_ok());
    assert!(validate_language_tag("fr_CA").is_ok());
    assert!(validate_language_tag("deu").is_ok());

    // ISO 639-2/B codes resolve through their terminology equivalent
    assert!(validate_language_tag("fre").is_ok());
    assert!(validate_language_tag("ger-AT").is_ok());

    // Whitespace and case
    assert!(validate_language_tag(" EN-us ").is_ok());
}

#[test]
fn test_validateLanguageTag_withInvalidTags_shouldFail() {
    assert!(validate_language_tag("").is_err());
    assert!(validate_language_tag("e").is_err());
    assert!(validate_language_tag("123").is_err());
    assert!(validate_language_tag("en--US").is_err());
    assert!(validate_language_tag("en US").is_err());
}

#[test]
fn test_primarySubtag_withRegionAndScript_shouldReturnLanguagePart() {
    assert_eq!(primary_subtag("en-US"), "en");
    assert_eq!(primary_subtag("zh_Hant_TW"), "zh");
    assert_eq!(primary_subtag(" fr "), "fr");
}

#[test]
fn test_languageTagsMatch_shouldIgnoreCaseAndWhitespace() {
    assert!(language_tags_match("en-US", "EN-us"));
    assert!(language_tags_match(" fr ", "fr"));
    assert!(!language_tags_match("en-US", "en-GB"));
    assert!(!language_tags_match("en", "en-US"));
}

#[test]
fn test_getLanguageName_withKnownTags_shouldReturnEnglishName() -> Result<()> {
    assert_eq!(get_language_name("fr-FR")?, "French");
    assert_eq!(get_language_name("de")?, "German");
    assert_eq!(get_language_name("eng")?, "English");
    assert!(get_language_name("123").is_err());
    Ok(())
}

#[test]
fn test_isKnownLanguage_shouldCheckPrimarySubtagOnly() {
    assert!(is_known_language("es-419"));
    assert!(!is_known_language("q1-US"));
}
