/*!
 * Tests for the WebVTT writer
 */

use anyhow::Result;
use captionkit::{Caption, CaptionNode, CaptionWriter, Document, StyleAttributes, WebVttWriter};

use crate::common;

#[test]
fn test_write_withSampleSami_shouldMatchExpectedWebVtt() -> Result<()> {
    let document = common::read_sami(common::SAMPLE_SAMI)?;
    let output = WebVttWriter::new().write(&document)?;
    assert_eq!(output, common::SAMPLE_WEBVTT);
    Ok(())
}

#[test]
fn test_write_withStyledCaption_shouldDropStylesAndKeepBreaks() -> Result<()> {
    let mut document = Document::new();
    document.add_caption(
        "en",
        Caption::new(
            3_600_000_000,
            3_601_234_567,
            vec![
                CaptionNode::styled(StyleAttributes::underline(), vec![CaptionNode::text("under")]),
                CaptionNode::LineBreak,
                CaptionNode::text("x --> y & <z>"),
            ],
        ),
    );

    let output = WebVttWriter::new().write(&document)?;
    assert_eq!(
        output,
        "WEBVTT\n\n01:00:00.000 --> 01:00:01.234\nunder\nx --&gt; y &amp; &lt;z&gt;\n\n"
    );
    Ok(())
}

#[test]
fn test_write_withTwoTracks_shouldInterleaveCuesByStart() -> Result<()> {
    let document = common::read_sami(common::SAMPLE_SAMI_MULTI_LANGUAGE)?;
    let output = WebVttWriter::new().write(&document)?;

    let hello = output.find("Hello").expect("English cue");
    let bonjour = output.find("Bonjour").expect("French cue");
    let revoir = output.find("Au revoir").expect("second French cue");
    assert!(hello < bonjour && bonjour < revoir);
    assert!(output.contains("00:00:02.500 --> 00:00:04.000\nAu revoir\n"));
    Ok(())
}

#[test]
fn test_write_withEmptyDocument_shouldOnlyWriteHeader() -> Result<()> {
    let output = WebVttWriter::new().write(&Document::new())?;
    assert_eq!(output, "WEBVTT\n\n");
    Ok(())
}
