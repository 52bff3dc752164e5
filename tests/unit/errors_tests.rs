/*!
 * Tests for error types and conversions
 */

use captionkit::errors::CaptionError;
use captionkit::{CaptionFormat, Config};

#[test]
fn test_malformedDocument_shouldDisplayFormatAndReason() {
    let error = CaptionError::malformed(CaptionFormat::Sami, "no Sync timing elements found");
    let display = format!("{}", error);
    assert!(display.contains("SAMI"));
    assert!(display.contains("no Sync timing elements found"));
    assert_eq!(error.format(), Some(CaptionFormat::Sami));
}

#[test]
fn test_invalidDocument_shouldDisplayFormatAndReason() {
    let error = CaptionError::invalid(CaptionFormat::WebVtt, "caption 1 ends before it starts");
    let display = format!("{}", error);
    assert!(display.contains("WebVTT"));
    assert!(display.contains("ends before it starts"));
}

#[test]
fn test_unsupportedReader_shouldNameFormat() {
    let error = CaptionError::UnsupportedReader(CaptionFormat::Dfxp);
    assert!(error.to_string().contains("DFXP"));
    assert_eq!(error.format(), Some(CaptionFormat::Dfxp));
}

#[test]
fn test_fromAnyhow_withConfigFailure_shouldBecomeConfigError() {
    let failure = Config::from_json_str("{ not json").unwrap_err();
    let error: CaptionError = failure.into();

    assert!(matches!(error, CaptionError::Config(_)));
    assert!(error.to_string().starts_with("Configuration error"));
    assert_eq!(error.format(), None);
}

#[test]
fn test_fromSerdeJson_shouldBecomeConfigError() {
    let failure = serde_json::from_str::<Config>("[1, 2]").unwrap_err();
    let error: CaptionError = failure.into();
    assert!(matches!(error, CaptionError::Config(_)));
}
