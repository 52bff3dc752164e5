/*!
 * SAMI writer.
 *
 * Every track language gets a class rule in the stylesheet. Captions of all
 * tracks are merged into one `Sync` per start time, and a blank `Sync`
 * (`&nbsp;`) is written where a caption ends before the next caption of its
 * language starts, so end times are kept when the output is read back.
 */

use std::borrow::Cow;
use std::collections::BTreeMap;

use log::debug;

use crate::caption::model::{Caption, CaptionNode, Document, Track};
use crate::caption::style::{StyleAttributes, StyleRegistry, StyleRule};
use crate::caption::timing;
use crate::errors::Result;
use crate::formats::{CaptionFormat, CaptionWriter};

/// Writes a `Document` as SAMI
#[derive(Debug, Clone, Copy, Default)]
pub struct SamiWriter;

impl SamiWriter {
    pub fn new() -> Self {
        Self
    }

    /// Registry used for output: the document's rules plus one rule for every
    /// track language no class declares.
    fn output_registry(document: &Document) -> StyleRegistry {
        let mut registry = document.styles.clone();
        for track in &document.tracks {
            if registry.ensure_language(&track.language) {
                debug!("Synthesized class .{} for track without a language rule", track.language);
            }
        }
        registry
    }

    fn write_stylesheet(registry: &StyleRegistry, output: &mut String) {
        output.push_str("<style type=\"text/css\"><!--\n");
        for rule in registry.rules() {
            output.push_str(&format_rule(rule));
            output.push('\n');
        }
        output.push_str("--></style>\n");
    }

    /// Class written on the paragraphs of a caption
    fn class_for<'a>(caption: &Caption, track: &'a Track, registry: &'a StyleRegistry) -> &'a str {
        let declared = caption
            .class_name
            .as_deref()
            .and_then(|class_name| registry.get(class_name))
            .filter(|rule| rule.declares(&track.language));

        match declared.or_else(|| registry.classes_for_language(&track.language).next()) {
            Some(rule) => rule.class_name.as_str(),
            None => track.language.as_str(),
        }
    }

    /// Paragraphs keyed by start millisecond, in track order within a key
    fn collect_syncs(document: &Document, registry: &StyleRegistry) -> BTreeMap<u64, Vec<String>> {
        let mut syncs: BTreeMap<u64, Vec<String>> = BTreeMap::new();

        for track in &document.tracks {
            let mut captions = track.captions.iter().peekable();
            while let Some(caption) = captions.next() {
                let class_name = Self::class_for(caption, track, registry);
                let start = timing::micros_to_millis(caption.start);
                let end = timing::micros_to_millis(caption.end);

                syncs
                    .entry(start)
                    .or_default()
                    .push(format_paragraph(class_name, &caption.style, &caption.nodes));

                // The next caption's own Sync ends this one when they touch or overlap.
                let next_start = captions.peek().map(|next| timing::micros_to_millis(next.start));
                if next_start.is_none_or(|next_start| next_start > end) {
                    syncs
                        .entry(end)
                        .or_default()
                        .push(format!("<p class=\"{}\">&nbsp;</p>", escape_attribute(class_name)));
                }
            }
        }

        syncs
    }
}

impl CaptionWriter for SamiWriter {
    fn format(&self) -> CaptionFormat {
        CaptionFormat::Sami
    }

    fn write(&self, document: &Document) -> Result<String> {
        document.validate(CaptionFormat::Sami)?;

        let registry = Self::output_registry(document);
        let syncs = Self::collect_syncs(document, &registry);

        let mut output = String::from("<sami>\n<head>\n");
        Self::write_stylesheet(&registry, &mut output);
        output.push_str("</head>\n<body>\n");
        for (start, paragraphs) in &syncs {
            output.push_str(&format!("<sync start=\"{}\">", start));
            for paragraph in paragraphs {
                output.push_str(paragraph);
            }
            output.push_str("</sync>\n");
        }
        output.push_str("</body>\n</sami>\n");

        debug!(
            "Wrote SAMI document: {} sync element(s), {} class rule(s)",
            syncs.len(),
            registry.len()
        );
        Ok(output)
    }
}

/// `.class {lang: xx; color: ...; extra: ...;}`
fn format_rule(rule: &StyleRule) -> String {
    let mut declarations = Vec::new();
    if let Some(language) = &rule.language {
        declarations.push(format!("lang: {};", language));
    }
    for (name, value) in rule.attributes.css_declarations() {
        declarations.push(format!("{}: {};", name, value));
    }
    for (name, value) in &rule.extra {
        declarations.push(format!("{}: {};", name, value));
    }
    format!(".{} {{{}}}", rule.class_name, declarations.join(" "))
}

fn format_paragraph(class_name: &str, style: &StyleAttributes, nodes: &[CaptionNode]) -> String {
    let mut paragraph = format!("<p class=\"{}\"", escape_attribute(class_name));
    if !style.is_empty() {
        paragraph.push_str(&format!(" style=\"{}\"", escape_attribute(&inline_style(style))));
    }
    paragraph.push('>');
    write_nodes(nodes, &mut paragraph);
    paragraph.push_str("</p>");
    paragraph
}

fn inline_style(style: &StyleAttributes) -> String {
    style
        .css_declarations()
        .iter()
        .map(|(name, value)| format!("{}: {}", name, value))
        .collect::<Vec<_>>()
        .join("; ")
}

fn write_nodes(nodes: &[CaptionNode], output: &mut String) {
    for node in nodes {
        match node {
            CaptionNode::Text(content) => {
                let mut lines = content.split('\n');
                if let Some(first) = lines.next() {
                    output.push_str(&escape_text(first));
                }
                for line in lines {
                    output.push_str("<br/>");
                    output.push_str(&escape_text(line));
                }
            }
            CaptionNode::LineBreak => output.push_str("<br/>"),
            CaptionNode::Style { style, children } => {
                let (open, close) = span_tags(style);
                output.push_str(&open);
                write_nodes(children, output);
                output.push_str(close);
            }
        }
    }
}

/// Open and close tags for a styled span. A single emphasis flag keeps its
/// short tag; anything else becomes one `<span style>` so the reader maps it
/// back to the same attribute set.
fn span_tags(style: &StyleAttributes) -> (String, &'static str) {
    if *style == StyleAttributes::bold() {
        return ("<b>".to_string(), "</b>");
    }
    if *style == StyleAttributes::italics() {
        return ("<i>".to_string(), "</i>");
    }
    if *style == StyleAttributes::underline() {
        return ("<u>".to_string(), "</u>");
    }
    if style.is_empty() {
        return (String::new(), "");
    }
    (
        format!("<span style=\"{}\">", escape_attribute(&inline_style(style))),
        "</span>",
    )
}

fn escape_text(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '<', '>', '\u{a0}']) {
        return Cow::Borrowed(text);
    }
    let mut escaped = String::with_capacity(text.len() + 8);
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '\u{a0}' => escaped.push_str("&nbsp;"),
            _ => escaped.push(c),
        }
    }
    Cow::Owned(escaped)
}

fn escape_attribute(value: &str) -> String {
    escape_text(value).replace('"', "&quot;")
}
