use std::fmt;

use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::app_config::Config;
use crate::caption::model::{Caption, CaptionNode, Document};
use crate::caption::text;
use crate::caption::timing;
use crate::errors::{CaptionError, Result};
use crate::formats::markup::{InlineBuilder, Scanner, Token};
use crate::formats::{CaptionFormat, CaptionReader, CaptionWriter};

// @module: SubRip numbered block reader and writer

// @const: Timing line, either millisecond separator, trailing cue settings ignored
static TIMING_LINE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d+:\d{1,2}:\d{1,2}[,.]\d{1,3})\s*-->\s*(\d+:\d{1,2}:\d{1,2}[,.]\d{1,3})")
        .expect("Invalid SRT timing regex")
});

// @struct: One numbered block as written to SRT
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SrtBlock {
    // @field: Sequence number, 1-based
    pub seq_num: usize,

    // @field: Start time in microseconds
    pub start: u64,

    // @field: End time in microseconds
    pub end: u64,

    // @field: Text lines, markup already stripped
    pub lines: Vec<String>,
}

impl SrtBlock {
    /// Block for a caption, or None when it has no visible text
    pub fn from_caption(seq_num: usize, caption: &Caption) -> Option<Self> {
        let lines = text::plain_lines(&caption.nodes, text::verbatim);
        if lines.is_empty() {
            return None;
        }
        Some(Self {
            seq_num,
            start: caption.start,
            end: caption.end,
            lines,
        })
    }
}

impl fmt::Display for SrtBlock {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}", self.seq_num)?;
        writeln!(
            f,
            "{} --> {}",
            timing::format_srt_timestamp(self.start),
            timing::format_srt_timestamp(self.end)
        )?;
        for line in &self.lines {
            writeln!(f, "{}", line)?;
        }
        writeln!(f)
    }
}

/// Reads SubRip text into a single-track `Document`
#[derive(Debug, Clone, Default)]
pub struct SrtReader {
    config: Config,
}

/// Block state while scanning lines
#[derive(Default)]
struct PendingBlock {
    seq_num: Option<usize>,
    timing: Option<(u64, u64)>,
    lines: Vec<String>,
}

impl SrtReader {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Parse a timing line into start and end microseconds
    pub fn parse_timing_line(line: &str) -> Option<(u64, u64)> {
        let caps = TIMING_LINE_REGEX.captures(line.trim())?;
        let start = timing::parse_clock(caps.get(1)?.as_str())?;
        let end = timing::parse_clock(caps.get(2)?.as_str())?;
        Some((start, end))
    }

    /// Build the node tree of a block: inline tags become styles, lines are
    /// joined by explicit breaks.
    fn parse_text(lines: &[String]) -> Vec<CaptionNode> {
        let mut builder = InlineBuilder::new(false);
        for (index, line) in lines.iter().enumerate() {
            if index > 0 {
                builder.line_break();
            }
            for token in Scanner::new(line) {
                match token {
                    Token::Text(content) => builder.push_text(&text::decode_entities(content)),
                    Token::StartTag {
                        name,
                        attributes,
                        self_closing,
                    } => {
                        if !builder.start_tag(&name, &attributes, self_closing) {
                            debug!("Ignoring <{}> in SRT text", name);
                        }
                    }
                    Token::EndTag { name } => {
                        builder.end_tag(&name);
                    }
                    Token::Comment(_) => {}
                }
            }
        }
        builder.finish()
    }

    fn finish_block(block: PendingBlock, line_number: usize, captions: &mut Vec<Caption>) {
        let Some((start, end)) = block.timing else {
            if block.seq_num.is_some() || !block.lines.is_empty() {
                warn!("Skipping SRT block ending at line {} without a timing line", line_number);
            }
            return;
        };
        if end < start {
            warn!("Skipping SRT block ending at line {}: ends before it starts", line_number);
            return;
        }

        let nodes = Self::parse_text(&block.lines);
        if text::is_blank(&nodes) {
            warn!("Skipping empty SRT block ending at line {}", line_number);
            return;
        }
        captions.push(Caption::new(start, end, nodes));
    }
}

impl CaptionReader for SrtReader {
    fn format(&self) -> CaptionFormat {
        CaptionFormat::Srt
    }

    fn read(&self, content: &str) -> Result<Document> {
        if content.trim().is_empty() {
            return Err(CaptionError::malformed(CaptionFormat::Srt, "input is empty"));
        }

        let content = content.trim_start_matches('\u{feff}');
        let mut captions = Vec::new();
        let mut block = PendingBlock::default();
        let mut line_number = 0;

        for line in content.lines() {
            line_number += 1;
            let trimmed = line.trim();

            if trimmed.is_empty() {
                if block.timing.is_some() || block.seq_num.is_some() {
                    Self::finish_block(std::mem::take(&mut block), line_number, &mut captions);
                }
                continue;
            }

            if block.timing.is_none() {
                if let Some(timing) = Self::parse_timing_line(trimmed) {
                    block.timing = Some(timing);
                    continue;
                }
                if block.seq_num.is_none() {
                    if let Ok(num) = trimmed.parse::<usize>() {
                        block.seq_num = Some(num);
                        continue;
                    }
                }
                warn!("Unexpected text at line {} before a timing line: {}", line_number, trimmed);
                continue;
            }

            block.lines.push(trimmed.to_string());
        }
        Self::finish_block(block, line_number, &mut captions);

        if captions.is_empty() {
            return Err(CaptionError::malformed(
                CaptionFormat::Srt,
                "no valid caption blocks found",
            ));
        }

        let language = self.config.resolved_default_language().to_string();
        let mut document = Document::new();
        let track = document.track_mut(&language);
        for caption in captions {
            track.push(caption);
        }

        let overlaps = track
            .captions
            .windows(2)
            .filter(|pair| pair[0].end > pair[1].start)
            .count();
        if overlaps > 0 {
            warn!("Found {} overlapping SRT blocks", overlaps);
        }

        document.styles.ensure_language(&language);
        debug!("Read SRT document: {} caption(s)", document.caption_count());
        Ok(document)
    }
}

/// Writes every track as numbered SubRip blocks
#[derive(Debug, Clone, Copy, Default)]
pub struct SrtWriter;

impl SrtWriter {
    pub fn new() -> Self {
        Self
    }

    /// Blocks for the whole document, numbered from 1 across all tracks
    pub fn blocks(document: &Document) -> Vec<SrtBlock> {
        let mut blocks = Vec::new();
        for caption in document.tracks.iter().flat_map(|track| track.iter()) {
            match SrtBlock::from_caption(blocks.len() + 1, caption) {
                Some(block) => blocks.push(block),
                None => debug!("Skipping caption at {}us with no text", caption.start),
            }
        }
        blocks
    }
}

impl CaptionWriter for SrtWriter {
    fn format(&self) -> CaptionFormat {
        CaptionFormat::Srt
    }

    fn write(&self, document: &Document) -> Result<String> {
        document.validate(CaptionFormat::Srt)?;

        Ok(Self::blocks(document)
            .iter()
            .map(SrtBlock::to_string)
            .collect())
    }
}
