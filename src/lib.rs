/*!
 * # captionkit - caption format conversion
 *
 * A Rust library that reads timed-text caption files into a format-agnostic
 * document model and writes that model back out in other formats.
 *
 * ## Features
 *
 * - Lenient SAMI reader that repairs broken markup instead of failing
 * - SRT reader
 * - Writers for SAMI, SRT, DFXP/TTML and WebVTT
 * - Microsecond timing with millisecond truncation on output
 * - Per-language class rules with default-language injection
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `caption`: Document model, style registry, timing and text helpers
 * - `formats`: Readers and writers, one module per format:
 *   - `formats::markup`: Tag scanner, inline style stack and CSS parsing
 *   - `formats::sami`: SAMI reader and writer
 *   - `formats::srt`: SRT reader and writer
 *   - `formats::dfxp`: DFXP writer
 *   - `formats::webvtt`: WebVTT writer
 * - `app_config`: Reader configuration
 * - `language_utils`: ISO language tag utilities
 * - `errors`: Error types for the library
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod caption;
pub mod errors;
pub mod formats;
pub mod language_utils;

use log::debug;

// Re-export main types for easier usage
pub use app_config::{Config, EndOfMedia};
pub use caption::{Alignment, Caption, CaptionNode, Document, StyleAttributes, StyleRegistry, StyleRule, Track};
pub use errors::{CaptionError, Result};
pub use formats::{
    reader_for, writer_for, CaptionFormat, CaptionReader, CaptionWriter, DfxpWriter, SamiReader, SamiWriter,
    SrtReader, SrtWriter, WebVttWriter,
};
pub use language_utils::{get_language_name, language_tags_match};

/// Read `content` as `from` and write it as `to`
pub fn convert(content: &str, from: CaptionFormat, to: CaptionFormat, config: &Config) -> Result<String> {
    let reader = reader_for(from, config).ok_or(CaptionError::UnsupportedReader(from))?;
    let document = reader.read(content)?;
    debug!(
        "Converting {} caption(s) in {} track(s) from {} to {}",
        document.caption_count(),
        document.tracks.len(),
        from,
        to
    );
    writer_for(to).write(&document)
}
