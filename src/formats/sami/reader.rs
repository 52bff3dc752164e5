/*!
 * Lenient SAMI reader.
 *
 * Broken markup is repaired rather than rejected: tag and attribute case is
 * ignored, attribute values may be bare, paragraphs and inline tags close
 * themselves, and paragraphs without a language get the configured default.
 * Only input that has no markup or no `Sync` element at all is an error.
 */

use log::{debug, trace, warn};

use crate::app_config::Config;
use crate::caption::model::{Caption, CaptionNode, Document};
use crate::caption::style::{StyleAttributes, StyleRegistry};
use crate::caption::text;
use crate::caption::timing;
use crate::errors::{CaptionError, Result};
use crate::formats::markup::{css, InlineBuilder, InlineKind, Scanner, Token};
use crate::formats::{CaptionFormat, CaptionReader};
use crate::language_utils;

/// Reads SAMI text into a `Document`
#[derive(Debug, Clone, Default)]
pub struct SamiReader {
    config: Config,
}

/// A paragraph being collected inside a `Sync`
struct OpenParagraph {
    class_name: Option<String>,
    language: Option<String>,
    style: StyleAttributes,
    builder: InlineBuilder,
}

impl OpenParagraph {
    fn from_attributes(token: &Token<'_>) -> Self {
        let attribute = |name: &str| {
            token
                .attribute(name)
                .map(|value| text::decode_entities(value.trim()).into_owned())
                .filter(|value| !value.is_empty())
        };

        Self {
            class_name: attribute("class"),
            language: attribute("lang"),
            style: attribute("style")
                .map(|style| css::parse_inline_style(&style))
                .unwrap_or_default(),
            builder: InlineBuilder::new(true),
        }
    }

    fn implicit() -> Self {
        Self {
            class_name: None,
            language: None,
            style: StyleAttributes::default(),
            builder: InlineBuilder::new(true),
        }
    }
}

/// A finished paragraph; `nodes` is empty for blank paragraphs
struct Paragraph {
    class_name: Option<String>,
    language: Option<String>,
    style: StyleAttributes,
    nodes: Vec<CaptionNode>,
}

/// Start time plus the paragraphs of one `Sync` element
struct SyncBlock {
    start: u64,
    paragraphs: Vec<Paragraph>,
}

/// A timed paragraph routed to its language
struct TimedEntry {
    start: u64,
    class_name: Option<String>,
    style: StyleAttributes,
    nodes: Vec<CaptionNode>,
}

impl SamiReader {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Collect class rules from every `<style>` element
    fn read_styles(tokens: &[Token<'_>]) -> StyleRegistry {
        let mut styles = StyleRegistry::new();
        let mut in_style = false;
        for token in tokens {
            match token {
                Token::StartTag { name, self_closing, .. } if name == "style" => in_style = !self_closing,
                Token::EndTag { name } if name == "style" => in_style = false,
                Token::Text(source) if in_style => {
                    for rule in css::parse_stylesheet(source) {
                        trace!("Style rule .{} (lang: {:?})", rule.class_name, rule.language);
                        styles.insert(rule);
                    }
                }
                _ => {}
            }
        }
        styles
    }

    /// Walk the body and group paragraphs by `Sync`
    fn read_syncs(tokens: &[Token<'_>]) -> Result<Vec<SyncBlock>> {
        let body_start = tokens
            .iter()
            .position(|token| matches!(token, Token::StartTag { name, .. } if name == "body"))
            .map(|index| index + 1)
            .unwrap_or_else(|| {
                debug!("No <body> element, scanning the whole document for Sync elements");
                0
            });

        let mut blocks = Vec::new();
        let mut sync_tags = 0usize;
        let mut current: Option<SyncBlock> = None;
        let mut paragraph: Option<OpenParagraph> = None;
        let mut in_raw_text = false;

        for token in &tokens[body_start..] {
            match token {
                Token::StartTag { name, self_closing, .. } if name == "style" || name == "script" => {
                    in_raw_text = !self_closing;
                }
                Token::EndTag { name } if name == "style" || name == "script" => in_raw_text = false,
                _ if in_raw_text => {}

                Token::StartTag { name, .. } if name == "sync" => {
                    sync_tags += 1;
                    Self::close_sync(&mut current, &mut paragraph, &mut blocks);
                    current = match token.attribute("start").and_then(parse_start) {
                        Some(start) => Some(SyncBlock {
                            start,
                            paragraphs: Vec::new(),
                        }),
                        None => {
                            warn!(
                                "Skipping Sync element without a usable start attribute: {:?}",
                                token.attribute("start")
                            );
                            None
                        }
                    };
                }
                Token::EndTag { name } if name == "sync" => {
                    Self::close_sync(&mut current, &mut paragraph, &mut blocks);
                }
                Token::EndTag { name } if name == "body" || name == "sami" => break,

                Token::StartTag { name, .. } if name == "p" => {
                    Self::close_paragraph(&mut current, &mut paragraph);
                    if current.is_some() {
                        paragraph = Some(OpenParagraph::from_attributes(token));
                    } else {
                        trace!("Ignoring paragraph outside of a Sync element");
                    }
                }
                Token::EndTag { name } if name == "p" => Self::close_paragraph(&mut current, &mut paragraph),

                Token::Text(raw) => {
                    if current.is_none() {
                        continue;
                    }
                    let decoded = text::decode_entities(raw);
                    match paragraph.as_mut() {
                        Some(open) => open.builder.push_text(&decoded),
                        None if decoded.trim().is_empty() => {}
                        None => {
                            trace!("Text directly inside Sync, wrapping it in a paragraph");
                            let mut open = OpenParagraph::implicit();
                            open.builder.push_text(&decoded);
                            paragraph = Some(open);
                        }
                    }
                }
                Token::StartTag {
                    name,
                    attributes,
                    self_closing,
                } => {
                    if current.is_none() || (name != "br" && InlineKind::from_tag(name).is_none()) {
                        trace!("Ignoring <{}> element", name);
                        continue;
                    }
                    paragraph
                        .get_or_insert_with(OpenParagraph::implicit)
                        .builder
                        .start_tag(name, attributes, *self_closing);
                }
                Token::EndTag { name } => {
                    if let Some(open) = paragraph.as_mut() {
                        if !open.builder.end_tag(name) {
                            trace!("Ignoring </{}>", name);
                        }
                    }
                }
                Token::Comment(_) => {}
            }
        }
        Self::close_sync(&mut current, &mut paragraph, &mut blocks);

        if sync_tags == 0 {
            return Err(CaptionError::malformed(CaptionFormat::Sami, "no Sync timing elements found"));
        }
        if blocks.is_empty() {
            return Err(CaptionError::malformed(
                CaptionFormat::Sami,
                "no Sync element has a usable start time",
            ));
        }
        Ok(blocks)
    }

    fn close_paragraph(current: &mut Option<SyncBlock>, paragraph: &mut Option<OpenParagraph>) {
        let Some(open) = paragraph.take() else {
            return;
        };
        let Some(block) = current.as_mut() else {
            return;
        };
        let nodes = open.builder.finish();
        block.paragraphs.push(Paragraph {
            class_name: open.class_name,
            language: open.language,
            style: open.style,
            nodes: if text::is_blank(&nodes) { Vec::new() } else { nodes },
        });
    }

    fn close_sync(
        current: &mut Option<SyncBlock>,
        paragraph: &mut Option<OpenParagraph>,
        blocks: &mut Vec<SyncBlock>,
    ) {
        Self::close_paragraph(current, paragraph);
        if let Some(block) = current.take() {
            blocks.push(block);
        }
    }

    /// Language and canonical class of a paragraph
    fn resolve_language(&self, paragraph: &Paragraph, styles: &StyleRegistry) -> (String, Option<String>) {
        let rule = paragraph
            .class_name
            .as_deref()
            .and_then(|class_name| styles.get(class_name));
        let class_name = rule
            .map(|rule| rule.class_name.clone())
            .or_else(|| paragraph.class_name.clone());

        if let Some(language) = &paragraph.language {
            return (language.clone(), class_name);
        }
        if let Some(language) = rule.and_then(|rule| rule.language.clone()) {
            return (language, class_name);
        }

        debug!(
            "Paragraph with class {:?} declares no language, using {}",
            paragraph.class_name,
            self.config.resolved_default_language()
        );
        (self.config.resolved_default_language().to_string(), class_name)
    }

    /// Route paragraphs to languages, then derive end times per language
    fn build_document(&self, blocks: Vec<SyncBlock>, mut styles: StyleRegistry) -> Document {
        let mut by_language: Vec<(String, Vec<TimedEntry>)> = Vec::new();

        for block in blocks {
            for paragraph in block.paragraphs {
                let (language, class_name) = self.resolve_language(&paragraph, &styles);
                let entry = TimedEntry {
                    start: block.start,
                    class_name,
                    style: paragraph.style,
                    nodes: paragraph.nodes,
                };
                match by_language
                    .iter_mut()
                    .find(|(existing, _)| language_utils::language_tags_match(existing, &language))
                {
                    Some((_, entries)) => entries.push(entry),
                    None => by_language.push((language, vec![entry])),
                }
            }
        }

        let mut document = Document::new();
        for (language, mut entries) in by_language {
            entries.sort_by_key(|entry| entry.start);

            let mut captions = Vec::new();
            let mut pending: Option<Caption> = None;
            for entry in entries {
                if let Some(mut caption) = pending.take() {
                    caption.end = entry.start;
                    captions.push(caption);
                }
                if entry.nodes.is_empty() {
                    continue;
                }
                let mut caption = Caption::new(entry.start, entry.start, entry.nodes).with_style(entry.style);
                caption.class_name = entry.class_name;
                pending = Some(caption);
            }
            if let Some(mut caption) = pending {
                caption.end = self.config.end_of_media.resolve(caption.start);
                captions.push(caption);
            }

            if captions.is_empty() {
                debug!("Language {} has only blank paragraphs, no track created", language);
                continue;
            }
            if !language_utils::is_known_language(&language) {
                debug!("Language tag {} has no known ISO 639 primary subtag", language);
            }

            if styles.ensure_language(&language) {
                debug!("Added style rule .{} for undeclared language", language);
            }

            // Captions keep their class only when it declares their language.
            let language_class = styles
                .classes_for_language(&language)
                .next()
                .map(|rule| rule.class_name.clone());
            let track = document.track_mut(&language);
            for mut caption in captions {
                let declared = caption
                    .class_name
                    .as_deref()
                    .and_then(|class_name| styles.get(class_name))
                    .is_some_and(|rule| rule.declares(&language));
                if !declared {
                    caption.class_name.clone_from(&language_class);
                }
                track.push(caption);
            }
        }

        styles.retain(|rule| match &rule.language {
            Some(language) => {
                let used = document.track(language).is_some();
                if !used {
                    debug!("Dropping style rule .{}: language {} has no captions", rule.class_name, language);
                }
                used
            }
            None => true,
        });
        document.styles = styles;
        document
    }
}

impl CaptionReader for SamiReader {
    fn format(&self) -> CaptionFormat {
        CaptionFormat::Sami
    }

    fn read(&self, content: &str) -> Result<Document> {
        if content.trim().is_empty() {
            return Err(CaptionError::malformed(CaptionFormat::Sami, "input is empty"));
        }

        let tokens: Vec<Token<'_>> = Scanner::new(content).collect();
        if !tokens.iter().any(|token| matches!(token, Token::StartTag { .. })) {
            return Err(CaptionError::malformed(CaptionFormat::Sami, "no markup found"));
        }

        let styles = Self::read_styles(&tokens);
        let blocks = Self::read_syncs(&tokens)?;
        let document = self.build_document(blocks, styles);

        debug!(
            "Read SAMI document: {} track(s), {} caption(s), {} style rule(s)",
            document.tracks.len(),
            document.caption_count(),
            document.styles.len()
        );
        Ok(document)
    }
}

/// Integer milliseconds at the start of the attribute; fractions are truncated
fn parse_start(value: &str) -> Option<u64> {
    let value = value.trim();
    let digits_end = value
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(value.len());
    if digits_end == 0 {
        return None;
    }
    value[..digits_end]
        .parse::<u64>()
        .ok()
        .map(timing::millis_to_micros)
}
