/*!
 * Builds a well-formed caption node tree from inline markup that may not be.
 *
 * Open spans live on an explicit stack. A close tag pops back to the
 * nearest open span of the same kind, closing anything opened after it; a
 * close tag with no matching open span is ignored; whatever is still open
 * when the caption ends is closed there.
 */

use log::{debug, trace};

use crate::caption::model::CaptionNode;
use crate::caption::style::StyleAttributes;
use crate::caption::text;
use crate::formats::markup::css;

/// Inline elements that open a styled span
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InlineKind {
    Bold,
    Italic,
    Underline,
    Span,
    Font,
}

impl InlineKind {
    pub fn from_tag(name: &str) -> Option<Self> {
        match name {
            "b" | "strong" => Some(Self::Bold),
            "i" | "em" => Some(Self::Italic),
            "u" => Some(Self::Underline),
            "span" => Some(Self::Span),
            "font" => Some(Self::Font),
            _ => None,
        }
    }

    /// Style carried by a start tag of this kind
    pub fn style_for(&self, attributes: &[(String, String)]) -> StyleAttributes {
        let attribute = |name: &str| {
            attributes
                .iter()
                .find(|(key, _)| key == name)
                .map(|(_, value)| text::decode_entities(value).into_owned())
        };

        match self {
            Self::Bold => StyleAttributes::bold(),
            Self::Italic => StyleAttributes::italics(),
            Self::Underline => StyleAttributes::underline(),
            Self::Span => attribute("style")
                .map(|style| css::parse_inline_style(&style))
                .unwrap_or_default(),
            Self::Font => StyleAttributes {
                font_color: attribute("color").filter(|v| !v.is_empty()),
                font_family: attribute("face").filter(|v| !v.is_empty()),
                ..StyleAttributes::default()
            },
        }
    }
}

/// Deepest span nesting kept; deeper start tags are ignored with their close tags
const MAX_NESTING: usize = 32;

struct OpenSpan {
    kind: InlineKind,
    style: StyleAttributes,
    children: Vec<CaptionNode>,
}

/// Incremental builder for one caption's content
pub struct InlineBuilder {
    root: Vec<CaptionNode>,
    stack: Vec<OpenSpan>,
    /// Kinds of start tags ignored past the nesting limit
    ignored: Vec<InlineKind>,
    collapse_whitespace: bool,
}

impl InlineBuilder {
    /// `collapse_whitespace` treats runs of whitespace (newlines included)
    /// as a single space, the way HTML-like formats do.
    pub fn new(collapse_whitespace: bool) -> Self {
        Self {
            root: Vec::new(),
            stack: Vec::new(),
            ignored: Vec::new(),
            collapse_whitespace,
        }
    }

    fn current(&mut self) -> &mut Vec<CaptionNode> {
        match self.stack.last_mut() {
            Some(span) => &mut span.children,
            None => &mut self.root,
        }
    }

    /// Append decoded text
    pub fn push_text(&mut self, content: &str) {
        if content.is_empty() {
            return;
        }
        let content = if self.collapse_whitespace {
            text::collapse_whitespace(content)
        } else {
            content.to_string()
        };

        let container = self.current();
        if let Some(CaptionNode::Text(previous)) = container.last_mut() {
            previous.push_str(&content);
        } else {
            container.push(CaptionNode::Text(content));
        }
    }

    pub fn line_break(&mut self) {
        self.current().push(CaptionNode::LineBreak);
    }

    pub fn open(&mut self, kind: InlineKind, style: StyleAttributes) {
        if self.stack.len() >= MAX_NESTING {
            trace!("Ignoring {:?} nested deeper than {} spans", kind, MAX_NESTING);
            self.ignored.push(kind);
            return;
        }
        self.stack.push(OpenSpan {
            kind,
            style,
            children: Vec::new(),
        });
    }

    /// Close the nearest open span of `kind`. Returns false when none is open.
    pub fn close(&mut self, kind: InlineKind) -> bool {
        if let Some(index) = self.ignored.iter().rposition(|ignored| *ignored == kind) {
            self.ignored.remove(index);
            return true;
        }
        let Some(index) = self.stack.iter().rposition(|span| span.kind == kind) else {
            debug!("Ignoring close tag for {:?} with no open span", kind);
            return false;
        };

        while self.stack.len() > index {
            let closing_inner = self.stack.len() - 1 > index;
            if closing_inner {
                trace!("Closing {:?} implicitly", self.stack.last().map(|s| s.kind));
            }
            self.pop_span();
        }
        true
    }

    fn pop_span(&mut self) {
        let Some(span) = self.stack.pop() else {
            return;
        };
        if span.children.is_empty() {
            return;
        }
        if !span.style.is_empty() {
            self.current().push(CaptionNode::Style {
                style: span.style,
                children: span.children,
            });
            return;
        }

        // A span with no recognized style adds nothing; keep its content.
        let container = self.current();
        for child in span.children {
            if let (Some(CaptionNode::Text(previous)), CaptionNode::Text(next)) = (container.last_mut(), &child) {
                previous.push_str(next);
                continue;
            }
            container.push(child);
        }
    }

    /// Handle an inline start tag; returns false for tags that are not inline markup
    pub fn start_tag(&mut self, name: &str, attributes: &[(String, String)], self_closing: bool) -> bool {
        if name == "br" {
            self.line_break();
            return true;
        }
        match InlineKind::from_tag(name) {
            Some(kind) if !self_closing => {
                let style = kind.style_for(attributes);
                self.open(kind, style);
                true
            }
            Some(_) => true,
            None => false,
        }
    }

    /// Handle an inline end tag; returns false for tags that are not inline markup
    pub fn end_tag(&mut self, name: &str) -> bool {
        if name == "br" {
            // `</br>` is treated as a break by browsers.
            self.line_break();
            return true;
        }
        match InlineKind::from_tag(name) {
            Some(kind) => {
                self.close(kind);
                true
            }
            None => false,
        }
    }

    /// Close everything still open and return the normalized node tree
    pub fn finish(mut self) -> Vec<CaptionNode> {
        if !self.stack.is_empty() {
            debug!("Auto-closing {} unclosed inline tag(s)", self.stack.len());
        }
        while !self.stack.is_empty() {
            self.pop_span();
        }
        normalize(self.root)
    }
}

/// Where the previous visible output left the line
#[derive(Clone, Copy, PartialEq, Eq)]
enum LineState {
    LineStart,
    AfterSpace,
    AfterText,
}

/// Trim whitespace at line edges, merge spaces across span boundaries and
/// drop text and spans that end up empty.
pub fn normalize(nodes: Vec<CaptionNode>) -> Vec<CaptionNode> {
    let mut state = LineState::LineStart;
    let mut nodes = trim_leading(nodes, &mut state);
    let mut at_line_end = true;
    trim_trailing(&mut nodes, &mut at_line_end);
    prune(nodes)
}

fn trim_leading(nodes: Vec<CaptionNode>, state: &mut LineState) -> Vec<CaptionNode> {
    nodes
        .into_iter()
        .map(|node| match node {
            CaptionNode::Text(content) => {
                let content = if *state == LineState::AfterText {
                    content
                } else {
                    content.trim_start_matches(|c: char| c.is_ascii_whitespace()).to_string()
                };
                if let Some(last) = content.chars().last() {
                    *state = if last.is_ascii_whitespace() {
                        LineState::AfterSpace
                    } else {
                        LineState::AfterText
                    };
                }
                CaptionNode::Text(content)
            }
            CaptionNode::LineBreak => {
                *state = LineState::LineStart;
                CaptionNode::LineBreak
            }
            CaptionNode::Style { style, children } => CaptionNode::Style {
                style,
                children: trim_leading(children, state),
            },
        })
        .collect()
}

fn trim_trailing(nodes: &mut [CaptionNode], at_line_end: &mut bool) {
    for node in nodes.iter_mut().rev() {
        match node {
            CaptionNode::Text(content) => {
                if *at_line_end {
                    let trimmed_len = content.trim_end_matches(|c: char| c.is_ascii_whitespace()).len();
                    content.truncate(trimmed_len);
                }
                if !content.is_empty() {
                    *at_line_end = false;
                }
            }
            CaptionNode::LineBreak => *at_line_end = true,
            CaptionNode::Style { children, .. } => trim_trailing(children, at_line_end),
        }
    }
}

fn prune(nodes: Vec<CaptionNode>) -> Vec<CaptionNode> {
    nodes
        .into_iter()
        .filter_map(|node| match node {
            CaptionNode::Text(content) if content.is_empty() => None,
            CaptionNode::Style { style, children } => {
                let children = prune(children);
                if children.is_empty() {
                    None
                } else {
                    Some(CaptionNode::Style { style, children })
                }
            }
            other => Some(other),
        })
        .collect()
}
