/*!
 * WebVTT writer.
 *
 * Cues are written without identifiers. Styling is dropped; line breaks are
 * kept as newlines. Cue text escapes `&`, `<` and `>`, which also keeps a
 * literal `-->` from being read as a timing line.
 */

use std::borrow::Cow;

use log::debug;

use crate::caption::model::{Caption, Document};
use crate::caption::text;
use crate::caption::timing;
use crate::errors::Result;
use crate::formats::{CaptionFormat, CaptionWriter};

/// First line of every WebVTT file
pub const WEBVTT_HEADER: &str = "WEBVTT";

/// Writes a `Document` as WebVTT cues
#[derive(Debug, Clone, Copy, Default)]
pub struct WebVttWriter;

impl WebVttWriter {
    pub fn new() -> Self {
        Self
    }

    fn write_cue(caption: &Caption, output: &mut String) -> bool {
        let lines = text::plain_lines(&caption.nodes, escape_cue_text);
        if lines.is_empty() {
            debug!("Skipping caption at {}us with no text", caption.start);
            return false;
        }

        output.push_str(&format!(
            "{} --> {}\n",
            timing::format_vtt_timestamp(caption.start),
            timing::format_vtt_timestamp(caption.end)
        ));
        output.push_str(&lines.join("\n"));
        output.push_str("\n\n");
        true
    }
}

impl CaptionWriter for WebVttWriter {
    fn format(&self) -> CaptionFormat {
        CaptionFormat::WebVtt
    }

    fn write(&self, document: &Document) -> Result<String> {
        document.validate(CaptionFormat::WebVtt)?;

        // Cues of all tracks share one timeline; ties keep track order.
        let mut captions: Vec<&Caption> = document.tracks.iter().flat_map(|track| track.iter()).collect();
        captions.sort_by_key(|caption| caption.start);

        let mut output = format!("{}\n\n", WEBVTT_HEADER);
        let mut written = 0;
        for caption in captions {
            if Self::write_cue(caption, &mut output) {
                written += 1;
            }
        }

        debug!("Wrote WebVTT document: {} cue(s)", written);
        Ok(output)
    }
}

/// Escape cue text so it cannot open a tag or look like a timing arrow
pub fn escape_cue_text(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '<', '>']) {
        return Cow::Borrowed(text);
    }
    Cow::Owned(
        text.replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;"),
    )
}
