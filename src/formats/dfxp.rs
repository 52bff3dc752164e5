/*!
 * DFXP / TTML writer.
 *
 * Output is always a well-formed TTML document: the root carries the TTML
 * and styling namespaces unconditionally, each track becomes a `div` with
 * its `xml:lang`, and each caption a `p` with clock-time `begin`/`end`.
 * Styled spans map to `tts:*` attributes and line breaks to `<br/>`.
 */

use std::fmt::Display;
use std::io::Cursor;

use log::debug;
use quick_xml::escape::escape;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::caption::model::{Caption, CaptionNode, Document};
use crate::caption::style::{StyleAttributes, StyleRegistry};
use crate::caption::timing;
use crate::errors::{CaptionError, Result};
use crate::formats::{CaptionFormat, CaptionWriter};

/// TTML namespace
pub const TTML_NS: &str = "http://www.w3.org/ns/ttml";

/// TTML styling namespace
pub const TTML_STYLING_NS: &str = "http://www.w3.org/ns/ttml#styling";

/// `xml:lang` of the root when the document has no track
const FALLBACK_LANGUAGE: &str = "en";

/// Writes a `Document` as DFXP
#[derive(Debug, Clone, Copy, Default)]
pub struct DfxpWriter;

/// Thin wrapper that maps quick-xml failures into `CaptionError::Xml`
struct XmlOutput {
    writer: Writer<Cursor<Vec<u8>>>,
}

fn xml_error(context: &str, error: impl Display) -> CaptionError {
    CaptionError::Xml(format!("Failed to write {}: {}", context, error))
}

impl XmlOutput {
    fn new() -> Self {
        Self {
            writer: Writer::new(Cursor::new(Vec::new())),
        }
    }

    fn write(&mut self, event: Event<'_>, context: &str) -> Result<()> {
        self.writer
            .write_event(event)
            .map_err(|e| xml_error(context, e))
    }

    fn start(&mut self, element: BytesStart<'_>) -> Result<()> {
        let name = String::from_utf8_lossy(element.name().as_ref()).into_owned();
        self.write(Event::Start(element), &name)
    }

    fn empty(&mut self, element: BytesStart<'_>) -> Result<()> {
        let name = String::from_utf8_lossy(element.name().as_ref()).into_owned();
        self.write(Event::Empty(element), &name)
    }

    fn end(&mut self, name: &str) -> Result<()> {
        self.write(Event::End(BytesEnd::new(name)), name)
    }

    fn text(&mut self, content: &str) -> Result<()> {
        self.write(Event::Text(BytesText::from_escaped(escape(content))), "text")
    }

    fn newline(&mut self) -> Result<()> {
        self.write(Event::Text(BytesText::from_escaped("\n")), "text")
    }

    fn finish(self) -> Result<String> {
        let bytes = self.writer.into_inner().into_inner();
        String::from_utf8(bytes).map_err(|e| xml_error("document", e))
    }
}

/// `tts:*` attributes for a style, in a fixed order
fn tts_attributes(style: &StyleAttributes) -> Vec<(&'static str, String)> {
    let mut attributes = Vec::new();
    if let Some(color) = &style.font_color {
        attributes.push(("tts:color", color.clone()));
    }
    if let Some(family) = &style.font_family {
        attributes.push(("tts:fontFamily", family.clone()));
    }
    if style.bold {
        attributes.push(("tts:fontWeight", "bold".to_string()));
    }
    if style.italics {
        attributes.push(("tts:fontStyle", "italic".to_string()));
    }
    if style.underline {
        attributes.push(("tts:textDecoration", "underline".to_string()));
    }
    if let Some(alignment) = style.alignment {
        attributes.push(("tts:textAlign", alignment.keyword().to_string()));
    }
    attributes
}

fn push_tts(element: &mut BytesStart<'_>, style: &StyleAttributes) {
    for (name, value) in tts_attributes(style) {
        element.push_attribute((name, value.as_str()));
    }
}

impl DfxpWriter {
    pub fn new() -> Self {
        Self
    }

    fn write_head(output: &mut XmlOutput, styles: &StyleRegistry) -> Result<()> {
        output.start(BytesStart::new("head"))?;
        output.newline()?;
        output.start(BytesStart::new("styling"))?;
        output.newline()?;
        for rule in styles.rules().filter(|rule| !rule.attributes.is_empty()) {
            let mut style = BytesStart::new("style");
            style.push_attribute(("xml:id", rule.class_name.as_str()));
            push_tts(&mut style, &rule.attributes);
            output.empty(style)?;
            output.newline()?;
        }
        output.end("styling")?;
        output.newline()?;
        output.end("head")?;
        output.newline()
    }

    fn write_caption(output: &mut XmlOutput, caption: &Caption, styles: &StyleRegistry) -> Result<()> {
        let begin = timing::format_ttml_timestamp(caption.start);
        let end = timing::format_ttml_timestamp(caption.end);

        let mut paragraph = BytesStart::new("p");
        paragraph.push_attribute(("begin", begin.as_str()));
        paragraph.push_attribute(("end", end.as_str()));
        if let Some(rule) = caption
            .class_name
            .as_deref()
            .and_then(|class_name| styles.get(class_name))
            .filter(|rule| !rule.attributes.is_empty())
        {
            paragraph.push_attribute(("style", rule.class_name.as_str()));
        }
        push_tts(&mut paragraph, &caption.style);

        output.start(paragraph)?;
        Self::write_nodes(output, &caption.nodes)?;
        output.end("p")?;
        output.newline()
    }

    fn write_nodes(output: &mut XmlOutput, nodes: &[CaptionNode]) -> Result<()> {
        for node in nodes {
            match node {
                CaptionNode::Text(content) => {
                    let mut lines = content.split('\n');
                    if let Some(first) = lines.next() {
                        output.text(first)?;
                    }
                    for line in lines {
                        output.empty(BytesStart::new("br"))?;
                        output.text(line)?;
                    }
                }
                CaptionNode::LineBreak => output.empty(BytesStart::new("br"))?,
                CaptionNode::Style { style, children } if style.is_empty() => {
                    Self::write_nodes(output, children)?;
                }
                CaptionNode::Style { style, children } => {
                    let mut span = BytesStart::new("span");
                    push_tts(&mut span, style);
                    output.start(span)?;
                    Self::write_nodes(output, children)?;
                    output.end("span")?;
                }
            }
        }
        Ok(())
    }
}

impl CaptionWriter for DfxpWriter {
    fn format(&self) -> CaptionFormat {
        CaptionFormat::Dfxp
    }

    fn write(&self, document: &Document) -> Result<String> {
        document.validate(CaptionFormat::Dfxp)?;

        let mut output = XmlOutput::new();
        output.write(
            Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)),
            "XML declaration",
        )?;
        output.newline()?;

        let root_language = document
            .tracks
            .first()
            .map_or(FALLBACK_LANGUAGE, |track| track.language.as_str());
        let mut root = BytesStart::new("tt");
        root.push_attribute(("xml:lang", root_language));
        root.push_attribute(("xmlns", TTML_NS));
        root.push_attribute(("xmlns:tts", TTML_STYLING_NS));
        output.start(root)?;
        output.newline()?;

        Self::write_head(&mut output, &document.styles)?;

        output.start(BytesStart::new("body"))?;
        output.newline()?;
        for track in &document.tracks {
            let mut div = BytesStart::new("div");
            div.push_attribute(("xml:lang", track.language.as_str()));
            output.start(div)?;
            output.newline()?;
            for caption in track.iter() {
                Self::write_caption(&mut output, caption, &document.styles)?;
            }
            output.end("div")?;
            output.newline()?;
        }
        output.end("body")?;
        output.newline()?;
        output.end("tt")?;
        output.newline()?;

        debug!(
            "Wrote DFXP document: {} div(s), {} paragraph(s)",
            document.tracks.len(),
            document.caption_count()
        );
        output.finish()
    }
}
