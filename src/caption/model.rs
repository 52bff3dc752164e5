/*!
 * Core document model types for caption conversion.
 *
 * A `Document` is built once by a reader and only read afterwards. Fields
 * are public so documents can be assembled by hand; writers call
 * `Document::validate` before emitting anything, so a hand-built document
 * that breaks an invariant is rejected rather than silently repaired.
 */

use serde::{Deserialize, Serialize};

use crate::caption::style::{StyleAttributes, StyleRegistry};
use crate::caption::text;
use crate::errors::{CaptionError, Result};
use crate::formats::CaptionFormat;
use crate::language_utils;

/// A node of a caption's content tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaptionNode {
    /// Literal text, already unescaped
    Text(String),

    /// Explicit line break
    LineBreak,

    /// Styled span owning its children
    Style {
        style: StyleAttributes,
        children: Vec<CaptionNode>,
    },
}

impl CaptionNode {
    pub fn text(text: &str) -> Self {
        Self::Text(text.to_string())
    }

    pub fn styled(style: StyleAttributes, children: Vec<CaptionNode>) -> Self {
        Self::Style { style, children }
    }
}

/// One timed unit of caption text.
///
/// Times are microseconds so that millisecond and frame based formats can
/// be converted without accumulating rounding error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Caption {
    /// Start time in microseconds
    pub start: u64,

    /// End time in microseconds
    pub end: u64,

    /// Content tree
    pub nodes: Vec<CaptionNode>,

    /// Class the caption was declared with, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,

    /// Caption-level style and layout hints (alignment, colour)
    #[serde(default, skip_serializing_if = "StyleAttributes::is_empty")]
    pub style: StyleAttributes,
}

impl Caption {
    pub fn new(start: u64, end: u64, nodes: Vec<CaptionNode>) -> Self {
        Self {
            start,
            end,
            nodes,
            class_name: None,
            style: StyleAttributes::default(),
        }
    }

    pub fn with_class(mut self, class_name: &str) -> Self {
        self.class_name = Some(class_name.to_string());
        self
    }

    pub fn with_style(mut self, style: StyleAttributes) -> Self {
        self.style = style;
        self
    }

    /// Text content with line breaks as `\n` and styling dropped
    pub fn plain_text(&self) -> String {
        text::plain_lines(&self.nodes, text::verbatim).join("\n")
    }

    /// True when the caption has no visible text
    pub fn is_blank(&self) -> bool {
        text::is_blank(&self.nodes)
    }
}

/// Captions of a single language, ordered by start time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    /// Language tag identifying the track
    pub language: String,

    /// Captions in non-decreasing start order
    pub captions: Vec<Caption>,
}

impl Track {
    pub fn new(language: &str) -> Self {
        Self {
            language: language.to_string(),
            captions: Vec::new(),
        }
    }

    /// Insert a caption after every caption that starts at or before it
    pub fn push(&mut self, caption: Caption) {
        let index = self
            .captions
            .partition_point(|existing| existing.start <= caption.start);
        self.captions.insert(index, caption);
    }

    pub fn len(&self) -> usize {
        self.captions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.captions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Caption> {
        self.captions.iter()
    }
}

/// A complete caption file in memory
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// One track per language, in order of first appearance
    pub tracks: Vec<Track>,

    /// Class rules, including the language declarations
    #[serde(default)]
    pub styles: StyleRegistry,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Find a track by language, ignoring case
    pub fn track(&self, language: &str) -> Option<&Track> {
        self.tracks
            .iter()
            .find(|track| language_utils::language_tags_match(&track.language, language))
    }

    /// Find a track by language, creating it on first use
    pub fn track_mut(&mut self, language: &str) -> &mut Track {
        let position = self
            .tracks
            .iter()
            .position(|track| language_utils::language_tags_match(&track.language, language));
        let index = match position {
            Some(index) => index,
            None => {
                self.tracks.push(Track::new(language));
                self.tracks.len() - 1
            }
        };
        &mut self.tracks[index]
    }

    /// Append a caption to a language's track, keeping start order
    pub fn add_caption(&mut self, language: &str, caption: Caption) {
        self.track_mut(language).push(caption);
    }

    /// Track languages in document order
    pub fn languages(&self) -> Vec<&str> {
        self.tracks.iter().map(|track| track.language.as_str()).collect()
    }

    /// Total number of captions over all tracks
    pub fn caption_count(&self) -> usize {
        self.tracks.iter().map(Track::len).sum()
    }

    /// True when no track holds a caption
    pub fn is_empty(&self) -> bool {
        self.tracks.iter().all(Track::is_empty)
    }

    /// Check the model invariants, reporting the first violation as an
    /// `InvalidDocument` error attributed to the writer's `format`.
    pub fn validate(&self, format: CaptionFormat) -> Result<()> {
        for (index, track) in self.tracks.iter().enumerate() {
            if track.language.trim().is_empty() {
                return Err(CaptionError::invalid(format, format!("track {} has an empty language", index + 1)));
            }

            if self.tracks[..index]
                .iter()
                .any(|other| language_utils::language_tags_match(&other.language, &track.language))
            {
                return Err(CaptionError::invalid(
                    format,
                    format!("language {} has more than one track", track.language),
                ));
            }

            let mut previous_start = 0;
            for (position, caption) in track.captions.iter().enumerate() {
                if caption.end < caption.start {
                    return Err(CaptionError::invalid(
                        format,
                        format!(
                            "caption {} of {} ends at {}us before it starts at {}us",
                            position + 1,
                            track.language,
                            caption.end,
                            caption.start
                        ),
                    ));
                }
                if caption.start < previous_start {
                    return Err(CaptionError::invalid(
                        format,
                        format!("captions of {} are not ordered by start time", track.language),
                    ));
                }
                previous_start = caption.start;
            }
        }

        for language in self.styles.languages() {
            if self.track(language).is_none() {
                return Err(CaptionError::invalid(
                    format,
                    format!("style registry declares language {} which has no track", language),
                ));
            }
        }

        Ok(())
    }
}
