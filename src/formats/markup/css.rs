/*!
 * Forgiving parser for the CSS subset used in caption stylesheets.
 *
 * Only class selectors (`.name { ... }`) become style rules. A rule with a
 * missing closing brace ends where the next rule's selector begins, and
 * declarations may be separated by newlines instead of semicolons.
 */

use log::{debug, trace};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::caption::style::{StyleAttributes, StyleRule};

/// `/* ... */` comments
static CSS_COMMENT_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)/\*.*?\*/").expect("Invalid CSS comment regex")
});

/// SGML comment markers wrapped around stylesheets for old browsers
static SGML_COMMENT_MARKER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<!--|-->").expect("Invalid comment marker regex")
});

/// Split a declaration block into `(property, value)` pairs.
///
/// Property names are lowercased; values are trimmed but keep their case.
pub fn parse_declarations(block: &str) -> Vec<(String, String)> {
    block
        .split([';', '\n'])
        .filter_map(|declaration| {
            let declaration = declaration.trim();
            if declaration.is_empty() {
                return None;
            }
            match declaration.split_once(':') {
                Some((name, value)) if !name.trim().is_empty() => {
                    Some((name.trim().to_ascii_lowercase(), value.trim().to_string()))
                }
                _ => {
                    trace!("Ignoring CSS declaration without a value: {}", declaration);
                    None
                }
            }
        })
        .collect()
}

/// Style attributes from an inline `style="..."` attribute
pub fn parse_inline_style(block: &str) -> StyleAttributes {
    let mut attributes = StyleAttributes::default();
    for (name, value) in parse_declarations(block) {
        if !attributes.apply_css_property(&name, &value) {
            trace!("Ignoring unsupported inline style {}: {}", name, value);
        }
    }
    attributes
}

/// Build a class rule from its declarations
pub fn rule_from_declarations(class_name: &str, declarations: Vec<(String, String)>) -> StyleRule {
    let mut rule = StyleRule::new(class_name);
    for (name, value) in declarations {
        if name == "lang" {
            if !value.is_empty() {
                rule.language = Some(value);
            }
        } else if !rule.attributes.apply_css_property(&name, &value) {
            rule.extra.push((name, value));
        }
    }
    rule
}

/// Parse a stylesheet into class rules, in source order
pub fn parse_stylesheet(source: &str) -> Vec<StyleRule> {
    let without_comments = CSS_COMMENT_REGEX.replace_all(source, " ");
    let text = SGML_COMMENT_MARKER_REGEX.replace_all(&without_comments, " ");
    let text = text.as_ref();

    let mut rules = Vec::new();
    let mut pos = 0;
    while let Some(open_offset) = text[pos..].find('{') {
        let open = pos + open_offset;
        let selector = text[pos..open].trim();
        let body_start = open + 1;
        let next_close = text[body_start..].find('}').map(|offset| body_start + offset);
        let next_open = text[body_start..].find('{').map(|offset| body_start + offset);

        let (body, next_pos) = match (next_close, next_open) {
            (Some(close), Some(reopen)) if reopen < close => {
                // Missing `}`: the body ends where the next selector begins.
                let segment = &text[body_start..reopen];
                let cut = next_selector_start(segment);
                debug!("Unclosed CSS rule for selector '{}', recovering", selector);
                (&segment[..cut], body_start + cut)
            }
            (Some(close), _) => (&text[body_start..close], close + 1),
            (None, Some(reopen)) => {
                let segment = &text[body_start..reopen];
                let cut = next_selector_start(segment);
                debug!("Unclosed CSS rule for selector '{}', recovering", selector);
                (&segment[..cut], body_start + cut)
            }
            (None, None) => (&text[body_start..], text.len()),
        };

        let declarations = parse_declarations(body);
        for selector in selector.split(',').map(str::trim) {
            match selector.strip_prefix('.') {
                Some(class_name) if !class_name.trim().is_empty() => {
                    rules.push(rule_from_declarations(class_name.trim(), declarations.clone()));
                }
                _ => debug!("Skipping non-class CSS selector '{}'", selector),
            }
        }

        pos = next_pos;
    }

    rules
}

/// Offset of the selector that trails the body of an unclosed rule.
///
/// The selector is the last `.class` word (with any `, .class` list members
/// before it) followed by nothing that looks like a declaration. Without one,
/// the body ends after its last separator.
fn next_selector_start(segment: &str) -> usize {
    let bytes = segment.as_bytes();
    let is_class_start = |index: usize| {
        bytes[index] == b'.'
            && (index == 0 || matches!(bytes[index - 1], b' ' | b'\t' | b'\r' | b'\n' | b';' | b','))
            && bytes
                .get(index + 1)
                .is_some_and(|&next| next.is_ascii_alphabetic() || next == b'_' || next == b'-')
    };
    let is_selector = |start: usize| !segment[start..].contains([':', ';']);

    let last_class = (0..segment.len()).rev().find(|&index| is_class_start(index));
    let Some(mut start) = last_class.filter(|&index| is_selector(index)) else {
        return segment.rfind([';', '\n']).map_or(0, |index| index + 1);
    };

    while let Some(comma) = segment[..start].trim_end().strip_suffix(',').map(str::len) {
        match (0..comma).rev().find(|&index| is_class_start(index)) {
            Some(previous) if is_selector(previous) => start = previous,
            _ => break,
        }
    }
    start
}
