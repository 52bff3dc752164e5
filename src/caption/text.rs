/*!
 * Text helpers shared across formats: character reference decoding and
 * flattening a node tree into plain lines for formats without styling.
 */

use std::borrow::Cow;

use quick_xml::escape::{resolve_html5_entity, unescape_with};

use crate::caption::model::CaptionNode;

/// Identity escape for formats whose text needs no escaping
pub fn verbatim(text: &str) -> Cow<'_, str> {
    Cow::Borrowed(text)
}

/// Longest HTML5 entity name, `CounterClockwiseContourIntegral`
const MAX_REFERENCE_LEN: usize = 32;

/// Decode HTML character references (`&gt;`, `&#62;`, `&#x3E;`, `&Eacute;`).
///
/// Named references resolve against the full HTML5 entity table. Names that
/// only match in lowercase (`&NBSP;`) are accepted as well. Unknown or
/// unterminated references are kept literally.
pub fn decode_entities(input: &str) -> Cow<'_, str> {
    if !input.contains('&') {
        return Cow::Borrowed(input);
    }

    let mut output = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(amp) = rest.find('&') {
        output.push_str(&rest[..amp]);
        let candidate = &rest[amp..];
        let decoded = candidate[1..]
            .find(['&', ';'])
            .map(|index| index + 1)
            .filter(|&end| end > 1 && end <= MAX_REFERENCE_LEN + 1 && candidate.as_bytes()[end] == b';')
            .and_then(|end| decode_reference(&candidate[..=end]).map(|value| (value, end)));

        match decoded {
            Some((value, end)) => {
                output.push_str(&value);
                rest = &candidate[end + 1..];
            }
            None => {
                output.push('&');
                rest = &candidate[1..];
            }
        }
    }
    output.push_str(rest);
    Cow::Owned(output)
}

/// Resolve a single `&...;` reference, or `None` when it is not one
fn decode_reference(reference: &str) -> Option<Cow<'_, str>> {
    unescape_with(reference, |name| {
        resolve_html5_entity(name).or_else(|| resolve_html5_entity(&name.to_ascii_lowercase()))
    })
    .ok()
}

/// Collapse runs of ASCII whitespace into single spaces
pub fn collapse_whitespace(input: &str) -> String {
    let mut output = String::with_capacity(input.len());
    let mut in_space = false;
    for c in input.chars() {
        if c.is_ascii_whitespace() {
            if !in_space {
                output.push(' ');
            }
            in_space = true;
        } else {
            output.push(c);
            in_space = false;
        }
    }
    output
}

/// True when the nodes contain no visible character
pub fn is_blank(nodes: &[CaptionNode]) -> bool {
    nodes.iter().all(|node| match node {
        CaptionNode::Text(text) => text.chars().all(char::is_whitespace),
        CaptionNode::LineBreak => true,
        CaptionNode::Style { children, .. } => is_blank(children),
    })
}

/// Flatten a node tree into lines of text, dropping all styling.
///
/// `LineBreak` nodes and newlines embedded in text both end a line. Lines
/// that are empty after trimming are dropped, so the result never holds a
/// blank line that a block-based format would read as a separator.
pub fn plain_lines(nodes: &[CaptionNode], escape: fn(&str) -> Cow<'_, str>) -> Vec<String> {
    let mut lines = vec![String::new()];
    collect_lines(nodes, escape, &mut lines);
    lines
        .into_iter()
        .map(|line| line.trim().to_string())
        .filter(|line| !line.is_empty())
        .collect()
}

fn collect_lines(nodes: &[CaptionNode], escape: fn(&str) -> Cow<'_, str>, lines: &mut Vec<String>) {
    for node in nodes {
        match node {
            CaptionNode::Text(text) => {
                let mut segments = text.split('\n');
                if let Some(first) = segments.next() {
                    push_segment(lines, first, escape);
                }
                for segment in segments {
                    lines.push(String::new());
                    push_segment(lines, segment, escape);
                }
            }
            CaptionNode::LineBreak => lines.push(String::new()),
            CaptionNode::Style { children, .. } => collect_lines(children, escape, lines),
        }
    }
}

fn push_segment(lines: &mut [String], segment: &str, escape: fn(&str) -> Cow<'_, str>) {
    let segment = segment.trim_end_matches('\r');
    if let Some(line) = lines.last_mut() {
        line.push_str(&escape(segment));
    }
}
