/*!
 * Caption file formats.
 *
 * Each format module provides a reader, a writer, or both:
 * - `sami`: SAMI markup with an embedded stylesheet (reader and writer)
 * - `srt`: SubRip numbered blocks (reader and writer)
 * - `dfxp`: DFXP / TTML namespaced XML (writer)
 * - `webvtt`: WebVTT cues (writer)
 * - `markup`: tag scanner, inline style builder and CSS parsing shared by
 *   the markup-based readers
 */

use anyhow::anyhow;
use std::fmt;
use std::str::FromStr;

use crate::app_config::Config;
use crate::caption::Document;
use crate::errors::Result;

pub mod dfxp;
pub mod markup;
pub mod sami;
pub mod srt;
pub mod webvtt;

pub use dfxp::DfxpWriter;
pub use sami::{SamiReader, SamiWriter};
pub use srt::{SrtReader, SrtWriter};
pub use webvtt::WebVttWriter;

/// Supported caption formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CaptionFormat {
    // @format: SAMI markup with CSS classes
    Sami,
    // @format: SubRip numbered blocks
    Srt,
    // @format: DFXP / TTML XML
    Dfxp,
    // @format: WebVTT cues
    WebVtt,
}

impl CaptionFormat {
    pub const ALL: [CaptionFormat; 4] = [Self::Sami, Self::Srt, Self::Dfxp, Self::WebVtt];

    // @returns: Human readable format name
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Sami => "SAMI",
            Self::Srt => "SRT",
            Self::Dfxp => "DFXP",
            Self::WebVtt => "WebVTT",
        }
    }

    // @returns: Conventional file extension without the dot
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Sami => "smi",
            Self::Srt => "srt",
            Self::Dfxp => "dfxp",
            Self::WebVtt => "vtt",
        }
    }

    /// Whether a reader exists for this format
    pub fn is_readable(&self) -> bool {
        matches!(self, Self::Sami | Self::Srt)
    }

    /// Whether the format can carry span styling
    pub fn supports_styling(&self) -> bool {
        matches!(self, Self::Sami | Self::Dfxp)
    }
}

impl fmt::Display for CaptionFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for CaptionFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.trim().trim_start_matches('.').to_lowercase().as_str() {
            "sami" | "smi" => Ok(Self::Sami),
            "srt" | "subrip" => Ok(Self::Srt),
            "dfxp" | "ttml" | "xml" => Ok(Self::Dfxp),
            "webvtt" | "vtt" => Ok(Self::WebVtt),
            _ => Err(anyhow!("Invalid caption format: {}", s)),
        }
    }
}

/// Turns decoded text of one format into a `Document`
pub trait CaptionReader: Send + Sync {
    fn format(&self) -> CaptionFormat;

    fn read(&self, content: &str) -> Result<Document>;
}

/// Serializes a `Document` into text of one format
pub trait CaptionWriter: Send + Sync {
    fn format(&self) -> CaptionFormat;

    fn write(&self, document: &Document) -> Result<String>;
}

/// Reader for a format, if the format can be read
pub fn reader_for(format: CaptionFormat, config: &Config) -> Option<Box<dyn CaptionReader>> {
    match format {
        CaptionFormat::Sami => Some(Box::new(SamiReader::new(config.clone()))),
        CaptionFormat::Srt => Some(Box::new(SrtReader::new(config.clone()))),
        CaptionFormat::Dfxp | CaptionFormat::WebVtt => None,
    }
}

/// Writer for a format
pub fn writer_for(format: CaptionFormat) -> Box<dyn CaptionWriter> {
    match format {
        CaptionFormat::Sami => Box::new(SamiWriter::new()),
        CaptionFormat::Srt => Box::new(SrtWriter::new()),
        CaptionFormat::Dfxp => Box::new(DfxpWriter::new()),
        CaptionFormat::WebVtt => Box::new(WebVttWriter::new()),
    }
}
