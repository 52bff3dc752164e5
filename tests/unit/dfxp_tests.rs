/*!
 * Tests for the DFXP writer
 */

use anyhow::Result;
use captionkit::formats::dfxp::{TTML_NS, TTML_STYLING_NS};
use captionkit::{Caption, CaptionError, CaptionNode, CaptionWriter, DfxpWriter, Document, StyleAttributes, Track};

use crate::common;

#[test]
fn test_write_shouldDeclareBothNamespacesVerbatim() -> Result<()> {
    let document = common::read_sami(common::SAMPLE_SAMI)?;
    let output = DfxpWriter::new().write(&document)?;

    assert!(output.contains(r#"xmlns="http://www.w3.org/ns/ttml""#));
    assert!(output.contains(r#"xmlns:tts="http://www.w3.org/ns/ttml#styling""#));
    assert_eq!(TTML_NS, "http://www.w3.org/ns/ttml");
    assert_eq!(TTML_STYLING_NS, "http://www.w3.org/ns/ttml#styling");
    Ok(())
}

#[test]
fn test_write_withSampleSami_shouldWriteTimedParagraphs() -> Result<()> {
    let document = common::read_sami(common::SAMPLE_SAMI)?;
    let output = DfxpWriter::new().write(&document)?;

    assert!(output.starts_with("<?xml version=\"1.0\" encoding=\"utf-8\"?>"));
    assert!(output.contains(r#"<tt xml:lang="en-US""#));
    assert!(output.contains(r#"<div xml:lang="en-US">"#));
    assert!(output.contains(r#"<p begin="00:00:09.209" end="00:00:12.312">( clock ticking )</p>"#));
    assert!(output.contains(
        r#"<p begin="00:00:14.848" end="00:00:17.000">MAN:<br/>When we think<br/>of &quot;E equals m c-squared&quot;,</p>"#
    ));
    assert!(output.contains(
        r#"<span tts:fontStyle="italic">as an old, wrinkly man</span><br/>with white hair.</p>"#
    ));
    assert!(output.trim_end().ends_with("</tt>"));
    Ok(())
}

#[test]
fn test_write_withMalformedSource_shouldStillBeWellFormed() -> Result<()> {
    let document = common::read_sami(common::SAMPLE_SAMI_SYNTAX_ERROR)?;
    let output = DfxpWriter::new().write(&document)?;

    assert!(output.contains(r#"xmlns="http://www.w3.org/ns/ttml""#));
    assert!(output.contains(r#"xmlns:tts="http://www.w3.org/ns/ttml#styling""#));
    assert!(output.contains(
        r##"<span tts:color="#fff">Look at the <span tts:fontStyle="italic">mountains in the back</span></span>"##
    ));
    assert_eq!(output.matches("<p ").count(), output.matches("</p>").count());
    assert_eq!(output.matches("<span").count(), output.matches("</span>").count());
    Ok(())
}

#[test]
fn test_write_withClassStyles_shouldWriteStylingSection() -> Result<()> {
    let document = common::read_sami(common::SAMPLE_SAMI_MULTI_LANGUAGE)?;
    let output = DfxpWriter::new().write(&document)?;

    assert!(output.contains(r##"<style xml:id="FRFRCC" tts:color="#ffff00"/>"##));
    assert!(!output.contains(r#"xml:id="ENUSCC""#));
    assert!(output.contains(r#"<div xml:lang="fr-FR">"#));
    assert!(output.contains(r#"<p begin="00:00:01.000" end="00:00:02.500" style="FRFRCC">Bonjour</p>"#));
    assert!(output.contains(r#"<p begin="00:00:01.000" end="00:00:02.500">Hello</p>"#));
    Ok(())
}

#[test]
fn test_write_withSpecialCharacters_shouldEscapeText() -> Result<()> {
    let mut document = Document::new();
    document.add_caption(
        "en",
        Caption::new(0, 1_000, vec![CaptionNode::text(r#"<b> & "quotes" 'single'"#)])
            .with_style(StyleAttributes {
                alignment: captionkit::Alignment::parse("center"),
                ..StyleAttributes::default()
            }),
    );

    let output = DfxpWriter::new().write(&document)?;
    assert!(output.contains(
        r#"<p begin="00:00:00.000" end="00:00:00.001" tts:textAlign="center">&lt;b&gt; &amp; &quot;quotes&quot; &apos;single&apos;</p>"#
    ));
    Ok(())
}

#[test]
fn test_write_withEmptyDocument_shouldUseFallbackLanguage() -> Result<()> {
    let output = DfxpWriter::new().write(&Document::new())?;
    assert!(output.contains(r#"<tt xml:lang="en""#));
    assert!(output.contains("<body>\n</body>"));
    Ok(())
}

#[test]
fn test_write_withDuplicateLanguages_shouldFailWithInvalidDocument() {
    let mut document = Document::new();
    document.tracks.push(Track::new("en"));
    document.tracks.push(Track::new("EN"));

    assert!(matches!(
        DfxpWriter::new().write(&document),
        Err(CaptionError::InvalidDocument { .. })
    ));
}
