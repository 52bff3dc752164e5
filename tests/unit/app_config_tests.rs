/*!
 * Tests for reader configuration
 */

use anyhow::Result;
use captionkit::app_config::{Config, EndOfMedia};

/// Test default configuration values
#[test]
fn test_defaultConfig_withNoParameters_shouldHaveCorrectDefaults() {
    let config = Config::default();

    assert_eq!(config.default_language, "en-US");
    assert_eq!(config.end_of_media, EndOfMedia::Duration { ms: 4000 });
    assert!(config.validate().is_ok());
}

#[test]
fn test_fromJsonStr_withEmptyObject_shouldUseDefaults() -> Result<()> {
    let config = Config::from_json_str("{}")?;
    assert_eq!(config, Config::default());
    Ok(())
}

#[test]
fn test_fromJsonStr_withAbsoluteEndOfMedia_shouldParse() -> Result<()> {
    let config = Config::from_json_str(
        r#"{"default_language": "fr-CA", "end_of_media": {"mode": "absolute", "ms": 60000}}"#,
    )?;

    assert_eq!(config.default_language, "fr-CA");
    assert_eq!(config.end_of_media, EndOfMedia::Absolute { ms: 60000 });
    Ok(())
}

#[test]
fn test_fromJsonStr_withDurationModeWithoutMs_shouldDefaultTo4000() -> Result<()> {
    let config = Config::from_json_str(r#"{"end_of_media": {"mode": "duration"}}"#)?;
    assert_eq!(config.end_of_media, EndOfMedia::Duration { ms: 4000 });
    Ok(())
}

/// Test configuration validation
#[test]
fn test_validate_withBadLanguages_shouldFail() {
    assert!(Config::with_default_language("").validate().is_err());
    assert!(Config::with_default_language("   ").validate().is_err());
    assert!(Config::with_default_language("123").validate().is_err());
    assert!(Config::with_default_language("en--US").validate().is_err());
    assert!(Config::from_json_str(r#"{"default_language": ""}"#).is_err());

    assert!(Config::with_default_language("de").validate().is_ok());
    assert!(Config::with_default_language("pt-BR").validate().is_ok());
}

#[test]
fn test_resolve_withDuration_shouldAddToStart() {
    let policy = EndOfMedia::Duration { ms: 4000 };
    assert_eq!(policy.resolve(1_301_000), 5_301_000);
}

#[test]
fn test_resolve_withAbsoluteBeforeStart_shouldClampToStart() {
    let policy = EndOfMedia::Absolute { ms: 10_000 };
    assert_eq!(policy.resolve(2_000_000), 10_000_000);
    assert_eq!(policy.resolve(12_000_000), 12_000_000);
}

#[test]
fn test_resolvedDefaultLanguage_withBlankLanguage_shouldFallBackToEnUs() {
    let config = Config::with_default_language("  ");
    assert_eq!(config.resolved_default_language(), "en-US");

    let config = Config::with_default_language(" es ").with_end_of_media(EndOfMedia::Absolute { ms: 1 });
    assert_eq!(config.resolved_default_language(), "es");
    assert_eq!(config.end_of_media, EndOfMedia::Absolute { ms: 1 });
}
