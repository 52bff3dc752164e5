/*!
 * Lenient tag scanner for HTML-like caption markup.
 *
 * The scanner never fails. Tag and attribute names are lowercased,
 * attribute values may be double-quoted, single-quoted or bare, a `<` that
 * cannot start a tag is text, and a tag cut off by the end of input ends
 * there. The content of `<style>` is raw text up to the matching close tag.
 */

/// One lexical item of the markup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token<'a> {
    /// Character data, entities still encoded
    Text(&'a str),

    /// `<name attr=value ...>` or `<name ... />`
    StartTag {
        name: String,
        attributes: Vec<(String, String)>,
        self_closing: bool,
    },

    /// `</name>`
    EndTag { name: String },

    /// `<!-- ... -->` body
    Comment(&'a str),
}

impl Token<'_> {
    /// Value of an attribute on a start tag, matched case-insensitively
    pub fn attribute(&self, name: &str) -> Option<&str> {
        match self {
            Token::StartTag { attributes, .. } => attributes
                .iter()
                .find(|(key, _)| key.eq_ignore_ascii_case(name))
                .map(|(_, value)| value.as_str()),
            _ => None,
        }
    }
}

/// Elements whose content is not markup
const RAW_TEXT_ELEMENTS: [&str; 2] = ["style", "script"];

/// Finite-state scanner producing `Token`s
pub struct Scanner<'a> {
    input: &'a str,
    pos: usize,
    raw_text_until: Option<String>,
}

impl<'a> Scanner<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            raw_text_until: None,
        }
    }

    fn bytes(&self) -> &'a [u8] {
        self.input.as_bytes()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.bytes().get(self.pos + offset).copied()
    }

    fn skip_whitespace(&mut self) {
        while self.peek_at(0).is_some_and(|b| b.is_ascii_whitespace()) {
            self.pos += 1;
        }
    }

    /// Consume bytes while `accept` holds and return them lowercased
    fn read_name(&mut self, accept: impl Fn(u8) -> bool) -> String {
        let start = self.pos;
        while self.peek_at(0).is_some_and(&accept) {
            self.pos += 1;
        }
        self.input[start..self.pos].to_ascii_lowercase()
    }

    /// Move past the next `>` (or to the end of input)
    fn skip_past_tag_end(&mut self) {
        match self.input[self.pos..].find('>') {
            Some(offset) => self.pos += offset + 1,
            None => self.pos = self.input.len(),
        }
    }

    fn scan_raw_text(&mut self, element: String) -> Option<Token<'a>> {
        let start = self.pos;
        let closing = format!("</{}", element);
        let rest = &self.input[start..];
        let end = find_ignore_ascii_case(rest, &closing).map_or(self.input.len(), |offset| start + offset);
        self.pos = end;
        if end > start {
            Some(Token::Text(&self.input[start..end]))
        } else {
            None
        }
    }

    fn scan_comment(&mut self) -> Token<'a> {
        let body_start = self.pos + 4;
        match self.input[body_start..].find("-->") {
            Some(offset) => {
                self.pos = body_start + offset + 3;
                Token::Comment(&self.input[body_start..body_start + offset])
            }
            None => {
                self.pos = self.input.len();
                Token::Comment(&self.input[body_start..])
            }
        }
    }

    fn scan_end_tag(&mut self) -> Token<'a> {
        self.pos += 2;
        let name = self.read_name(is_name_byte);
        self.skip_past_tag_end();
        Token::EndTag { name }
    }

    fn scan_start_tag(&mut self) -> Token<'a> {
        self.pos += 1;
        let name = self.read_name(is_name_byte);
        let mut attributes = Vec::new();
        let mut self_closing = false;

        loop {
            self.skip_whitespace();
            match self.peek_at(0) {
                None => break,
                Some(b'>') => {
                    self.pos += 1;
                    break;
                }
                Some(b'/') => {
                    self.pos += 1;
                    if self.peek_at(0) == Some(b'>') {
                        self_closing = true;
                    }
                }
                Some(_) => {
                    let key = self.read_name(|b| !b.is_ascii_whitespace() && !matches!(b, b'=' | b'>' | b'/'));
                    if key.is_empty() {
                        // Stray byte such as a lone quote; drop it.
                        self.pos += 1;
                        continue;
                    }
                    self.skip_whitespace();
                    let value = if self.peek_at(0) == Some(b'=') {
                        self.pos += 1;
                        self.skip_whitespace();
                        self.read_attribute_value()
                    } else {
                        String::new()
                    };
                    attributes.push((key, value));
                }
            }
        }

        if !self_closing && RAW_TEXT_ELEMENTS.contains(&name.as_str()) {
            self.raw_text_until = Some(name.clone());
        }

        Token::StartTag {
            name,
            attributes,
            self_closing,
        }
    }

    fn read_attribute_value(&mut self) -> String {
        match self.peek_at(0) {
            Some(quote @ (b'"' | b'\'')) => {
                let start = self.pos + 1;
                let rest = &self.input[start..];
                // An unterminated quote runs to the end of the tag.
                let end = rest
                    .find(quote as char)
                    .or_else(|| rest.find('>'))
                    .map_or(self.input.len(), |offset| start + offset);
                self.pos = if self.bytes().get(end) == Some(&quote) { end + 1 } else { end };
                self.input[start..end].to_string()
            }
            _ => {
                let start = self.pos;
                while self
                    .peek_at(0)
                    .is_some_and(|b| !b.is_ascii_whitespace() && b != b'>')
                {
                    self.pos += 1;
                }
                self.input[start..self.pos].to_string()
            }
        }
    }

    fn scan_text(&mut self) -> Token<'a> {
        let start = self.pos;
        self.pos += self.input[start..].chars().next().map_or(1, char::len_utf8);
        while let Some(offset) = self.input[self.pos..].find('<') {
            let candidate = self.pos + offset;
            self.pos = candidate;
            if self.starts_markup() {
                return Token::Text(&self.input[start..candidate]);
            }
            self.pos += 1;
        }
        self.pos = self.input.len();
        Token::Text(&self.input[start..])
    }

    /// Whether the `<` at the current position opens markup
    fn starts_markup(&self) -> bool {
        match self.peek_at(1) {
            Some(b'!') | Some(b'?') => true,
            Some(b'/') => self.peek_at(2).is_some_and(|b| b.is_ascii_alphabetic()),
            Some(b) => b.is_ascii_alphabetic(),
            None => false,
        }
    }
}

impl<'a> Iterator for Scanner<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Token<'a>> {
        if let Some(element) = self.raw_text_until.take() {
            if let Some(token) = self.scan_raw_text(element) {
                return Some(token);
            }
        }

        loop {
            if self.pos >= self.input.len() {
                return None;
            }

            if self.peek_at(0) != Some(b'<') || !self.starts_markup() {
                return Some(self.scan_text());
            }

            match self.peek_at(1) {
                Some(b'!') if self.input[self.pos..].starts_with("<!--") => return Some(self.scan_comment()),
                // Doctype or processing instruction; not meaningful here.
                Some(b'!') | Some(b'?') => self.skip_past_tag_end(),
                Some(b'/') => return Some(self.scan_end_tag()),
                _ => return Some(self.scan_start_tag()),
            }
        }
    }
}

fn is_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b':')
}

/// Byte offset of `needle` in `haystack`, comparing ASCII case-insensitively
pub fn find_ignore_ascii_case(haystack: &str, needle: &str) -> Option<usize> {
    let needle = needle.as_bytes();
    if needle.is_empty() {
        return Some(0);
    }
    haystack
        .as_bytes()
        .windows(needle.len())
        .position(|window| window.eq_ignore_ascii_case(needle))
}
