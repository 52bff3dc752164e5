/*!
 * Integration tests for end-to-end caption conversion
 */

use anyhow::Result;
use captionkit::{
    convert, writer_for, Caption, CaptionError, CaptionFormat, CaptionNode, CaptionReader, CaptionWriter, Config,
    Document, SamiReader, SamiWriter, StyleAttributes,
};

use crate::common;

/// Two syncs at 0 and 1301 ms become two SRT blocks, the last one ending at end of media
#[test]
fn test_convert_withTwoSyncSamiToSrt_shouldProduceNumberedBlocks() -> Result<()> {
    common::init_test_logging();
    let output = convert(
        common::SAMPLE_SAMI_TWO_SYNCS,
        CaptionFormat::Sami,
        CaptionFormat::Srt,
        &Config::default(),
    )?;

    assert_eq!(
        output,
        "1\n00:00:00,000 --> 00:00:01,301\nFirst line > here\n\n2\n00:00:01,301 --> 00:00:05,301\nSecond line\n\n"
    );
    Ok(())
}

#[test]
fn test_samiRoundTrip_withReaderOutput_shouldBeFixedPoint() -> Result<()> {
    for sample in [
        common::SAMPLE_SAMI,
        common::SAMPLE_SAMI_MISSING_LANGUAGE,
        common::SAMPLE_SAMI_SYNTAX_ERROR,
        common::SAMPLE_SAMI_MULTI_LANGUAGE,
        common::SAMPLE_SAMI_TWO_SYNCS,
    ] {
        let document = common::read_sami(sample)?;
        let written = SamiWriter::new().write(&document)?;
        let reread = common::read_sami(&written)?;

        assert_eq!(reread, document, "round trip changed the document written as:\n{}", written);
        assert_eq!(SamiWriter::new().write(&reread)?, written);
    }
    Ok(())
}

#[test]
fn test_convert_withMissingLanguageSamiToSami_shouldInjectDefaultLanguage() -> Result<()> {
    let output = convert(
        common::SAMPLE_SAMI_MISSING_LANGUAGE,
        CaptionFormat::Sami,
        CaptionFormat::Sami,
        &Config::default(),
    )?;
    assert!(output.contains("lang: en-US;"));

    let output = convert(
        common::SAMPLE_SAMI_MISSING_LANGUAGE,
        CaptionFormat::Sami,
        CaptionFormat::Sami,
        &Config::with_default_language("fr-CA"),
    )?;
    assert!(output.contains("lang: fr-CA;"));
    assert!(!output.contains("en-US"));
    Ok(())
}

#[test]
fn test_convert_withMalformedSamiToDfxp_shouldKeepNamespaces() -> Result<()> {
    let output = convert(
        common::SAMPLE_SAMI_SYNTAX_ERROR,
        CaptionFormat::Sami,
        CaptionFormat::Dfxp,
        &Config::default(),
    )?;

    assert!(output.contains(r#"xmlns="http://www.w3.org/ns/ttml""#));
    assert!(output.contains(r#"xmlns:tts="http://www.w3.org/ns/ttml#styling""#));
    Ok(())
}

/// Sub-millisecond values are truncated the same way in every output format
#[test]
fn test_writers_withSubMillisecondTimes_shouldTruncateToMillis() -> Result<()> {
    let mut document = Document::new();
    document.add_caption(
        "en",
        Caption::new(61_001_999, 62_345_678, vec![CaptionNode::text("timed")]),
    );

    let srt = writer_for(CaptionFormat::Srt).write(&document)?;
    let vtt = writer_for(CaptionFormat::WebVtt).write(&document)?;
    let dfxp = writer_for(CaptionFormat::Dfxp).write(&document)?;
    let sami = writer_for(CaptionFormat::Sami).write(&document)?;

    assert!(srt.contains("00:01:01,001 --> 00:01:02,345"));
    assert!(vtt.contains("00:01:01.001 --> 00:01:02.345"));
    assert!(dfxp.contains(r#"begin="00:01:01.001" end="00:01:02.345""#));
    assert!(sami.contains(r#"<sync start="61001">"#));
    assert!(sami.contains(r#"<sync start="62345">"#));
    Ok(())
}

/// Styles are dropped by SRT and WebVTT while text, breaks and timing survive
#[test]
fn test_lossyWriters_withStyledSami_shouldKeepTextBreaksAndTiming() -> Result<()> {
    let sami = r#"<SAMI><BODY>
<SYNC Start=1000><P><b>Bold</b> and <span style="color: red">red<br>next</span></P>
<SYNC Start=2000><P>&nbsp;</P>
</BODY></SAMI>"#;
    let document = common::read_sami(sami)?;

    let srt = writer_for(CaptionFormat::Srt).write(&document)?;
    let vtt = writer_for(CaptionFormat::WebVtt).write(&document)?;

    assert_eq!(srt, "1\n00:00:01,000 --> 00:00:02,000\nBold and red\nnext\n\n");
    assert_eq!(vtt, "WEBVTT\n\n00:00:01.000 --> 00:00:02.000\nBold and red\nnext\n\n");

    // The same document still carries the styles for the formats that can hold them.
    let dfxp = writer_for(CaptionFormat::Dfxp).write(&document)?;
    assert!(dfxp.contains(r#"<span tts:fontWeight="bold">Bold</span>"#));
    assert!(dfxp.contains(r#"<span tts:color="red">red<br/>next</span>"#));
    Ok(())
}

#[test]
fn test_convert_withSrtToSami_shouldKeepInlineTags() -> Result<()> {
    let output = convert(
        common::SAMPLE_SRT_MESSY,
        CaptionFormat::Srt,
        CaptionFormat::Sami,
        &Config::default(),
    )?;

    assert!(output.contains(".en-US {lang: en-US;}"));
    assert!(output.contains(r#"<sync start="1000"><p class="en-US"><i>Hello</i> there</p></sync>"#));
    assert!(output.contains(r#"<p class="en-US">Line one<br/><b>Line two</b></p>"#));
    Ok(())
}

#[test]
fn test_convert_fromWriteOnlyFormat_shouldFailWithUnsupportedReader() {
    let result = convert("<tt/>", CaptionFormat::Dfxp, CaptionFormat::Srt, &Config::default());
    assert!(matches!(result, Err(CaptionError::UnsupportedReader(CaptionFormat::Dfxp))));
}

#[test]
fn test_convert_withNonCaptionInput_shouldFailWithoutOutput() {
    let result = convert("plain words", CaptionFormat::Sami, CaptionFormat::Dfxp, &Config::default());
    assert!(matches!(result, Err(CaptionError::MalformedDocument { .. })));
}

/// One document can be written by several writers on different threads
#[test]
fn test_writers_withSharedDocumentAcrossThreads_shouldAgreeWithSequentialOutput() -> Result<()> {
    let document = SamiReader::new(Config::default()).read(common::SAMPLE_SAMI_MULTI_LANGUAGE)?;

    let parallel: Vec<String> = std::thread::scope(|scope| {
        let handles: Vec<_> = CaptionFormat::ALL
            .iter()
            .map(|&format| {
                let document = &document;
                scope.spawn(move || writer_for(format).write(document))
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().expect("writer thread panicked"))
            .collect::<Result<Vec<_>, CaptionError>>()
    })?;

    for (format, output) in CaptionFormat::ALL.iter().zip(parallel) {
        assert_eq!(output, writer_for(*format).write(&document)?);
    }
    Ok(())
}

#[test]
fn test_document_withSerdeJson_shouldSerializeNodeTree() -> Result<()> {
    let document = common::read_sami(common::SAMPLE_SAMI_SYNTAX_ERROR)?;
    let json = serde_json::to_string(&document)?;
    let restored: Document = serde_json::from_str(&json)?;

    assert_eq!(restored, document);
    assert!(json.contains("\"line_break\""));
    let white = StyleAttributes {
        font_color: Some("#fff".to_string()),
        ..StyleAttributes::default()
    };
    assert!(matches!(
        &restored.tracks[0].captions[1].nodes[0],
        CaptionNode::Style { style, .. } if *style == white
    ));
    Ok(())
}
