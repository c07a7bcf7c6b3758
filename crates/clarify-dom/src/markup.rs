//! Markup serialization and parsing.
//!
//! The parser is lenient in the way pages need (unknown end tags are ignored,
//! unclosed elements are closed at the end of input) and exact on the markup
//! the serializer emits, which is what back-references depend on.

use crate::document::Document;
use crate::node::{NodeId, NodeKind};

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

pub(crate) fn is_void(tag: &str) -> bool {
    VOID_ELEMENTS.contains(&tag)
}

fn is_raw_text(tag: &str) -> bool {
    RAW_TEXT_ELEMENTS.contains(&tag)
}

impl Document {
    /// Parse a whole page.
    pub fn parse(html: &str) -> Document {
        let mut doc = Document::new();
        let root = doc.root();
        Parser::new(html).parse_into(&mut doc, root);
        doc
    }

    /// Parse markup into a new detached fragment.
    pub fn parse_fragment(&mut self, markup: &str) -> NodeId {
        let fragment = self.create_fragment();
        Parser::new(markup).parse_into(self, fragment);
        fragment
    }

    /// Markup of the children of `id` (innerHTML).
    pub fn serialize_children(&self, id: NodeId) -> String {
        let mut out = String::new();
        let raw = self.tag(id).map(is_raw_text).unwrap_or(false);
        for child in self.children(id) {
            self.write_node(*child, raw, &mut out);
        }
        out
    }

    /// Markup of `id` including itself (outerHTML).
    pub fn serialize(&self, id: NodeId) -> String {
        let mut out = String::new();
        let raw = self
            .parent(id)
            .and_then(|p| self.tag(p))
            .map(is_raw_text)
            .unwrap_or(false);
        self.write_node(id, raw, &mut out);
        out
    }

    /// Markup of the whole document.
    pub fn to_html(&self) -> String {
        self.serialize_children(self.root())
    }

    fn write_node(&self, id: NodeId, raw_parent: bool, out: &mut String) {
        match self.kind(id) {
            NodeKind::Document | NodeKind::Fragment => {
                out.push_str(&self.serialize_children(id));
            }
            NodeKind::Doctype(text) => {
                out.push_str("<!");
                out.push_str(text);
                out.push('>');
            }
            NodeKind::Comment(text) => {
                out.push_str("<!--");
                out.push_str(text);
                out.push_str("-->");
            }
            NodeKind::Text(text) => {
                if raw_parent {
                    out.push_str(text);
                } else {
                    escape_text(text, out);
                }
            }
            NodeKind::Element(el) => {
                out.push('<');
                out.push_str(&el.tag);
                for (name, value) in &el.attrs {
                    out.push(' ');
                    out.push_str(name);
                    out.push_str("=\"");
                    escape_attr(value, out);
                    out.push('"');
                }
                out.push('>');
                if is_void(&el.tag) {
                    return;
                }
                let raw = is_raw_text(&el.tag);
                for child in self.children(id) {
                    self.write_node(*child, raw, out);
                }
                out.push_str("</");
                out.push_str(&el.tag);
                out.push('>');
            }
        }
    }
}

fn escape_text(text: &str, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            c => out.push(c),
        }
    }
}

fn escape_attr(value: &str, out: &mut String) {
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            c => out.push(c),
        }
    }
}

/// Decode character references. Unknown references are kept literally.
pub(crate) fn decode_entities(input: &str) -> String {
    if !input.contains('&') {
        return input.to_string();
    }
    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(pos) = rest.find('&') {
        out.push_str(&rest[..pos]);
        rest = &rest[pos..];
        let decoded = rest[1..].find(';').filter(|end| *end <= 10).and_then(|end| {
            let name = &rest[1..1 + end];
            decode_reference(name).map(|c| (c, end + 2))
        });
        match decoded {
            Some((c, consumed)) => {
                out.push(c);
                rest = &rest[consumed..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn decode_reference(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{a0}'),
        _ => {
            let digits = name.strip_prefix('#')?;
            let code = match digits.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => digits.parse::<u32>().ok()?,
            };
            char::from_u32(code)
        }
    }
}

struct Parser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn parse_into(&mut self, doc: &mut Document, container: NodeId) {
        let mut stack = vec![container];

        while self.pos < self.input.len() {
            let rest = self.rest();
            let top = stack.last().copied().unwrap_or(container);

            if rest.starts_with("<!--") {
                let body_start = self.pos + 4;
                let (text, next) = match self.input[body_start..].find("-->") {
                    Some(end) => (&self.input[body_start..body_start + end], body_start + end + 3),
                    None => (&self.input[body_start..], self.input.len()),
                };
                let node = doc.create_comment(text);
                let _ = doc.append_child(top, node);
                self.pos = next;
            } else if rest.starts_with("<!") {
                let body_start = self.pos + 2;
                let (text, next) = match self.input[body_start..].find('>') {
                    Some(end) => (&self.input[body_start..body_start + end], body_start + end + 1),
                    None => (&self.input[body_start..], self.input.len()),
                };
                let node = doc.create_doctype(text);
                let _ = doc.append_child(top, node);
                self.pos = next;
            } else if rest.starts_with("</") && starts_with_alpha(&rest[2..]) {
                let body_start = self.pos + 2;
                let end = self.input[body_start..]
                    .find('>')
                    .map(|e| body_start + e)
                    .unwrap_or(self.input.len());
                let name = self.input[body_start..end]
                    .trim()
                    .to_ascii_lowercase();
                self.pos = (end + 1).min(self.input.len());
                close_element(doc, &mut stack, &name);
            } else if rest.starts_with('<') && starts_with_alpha(&rest[1..]) {
                self.pos += 1;
                self.parse_start_tag(doc, &mut stack);
            } else {
                let first = rest.chars().next().map(char::len_utf8).unwrap_or(1);
                let end = rest[first..]
                    .find('<')
                    .map(|e| self.pos + first + e)
                    .unwrap_or(self.input.len());
                let text = decode_entities(&self.input[self.pos..end]);
                append_text(doc, top, &text);
                self.pos = end;
            }
        }
    }

    fn parse_start_tag(&mut self, doc: &mut Document, stack: &mut Vec<NodeId>) {
        let name = self.take_while(|c| c.is_ascii_alphanumeric() || c == '-' || c == ':');
        let tag = name.to_ascii_lowercase();
        let element = doc.create_element(&tag);
        let mut self_closing = false;

        loop {
            self.skip_whitespace();
            let rest = self.rest();
            if rest.is_empty() {
                break;
            }
            if rest.starts_with("/>") {
                self.pos += 2;
                self_closing = true;
                break;
            }
            if rest.starts_with('>') {
                self.pos += 1;
                break;
            }
            if rest.starts_with('/') {
                self.pos += 1;
                continue;
            }

            let attr_name = self
                .take_while(|c| !c.is_whitespace() && c != '=' && c != '>' && c != '/')
                .to_ascii_lowercase();
            self.skip_whitespace();
            let value = if self.rest().starts_with('=') {
                self.pos += 1;
                self.skip_whitespace();
                self.attr_value()
            } else {
                String::new()
            };
            if attr_name.is_empty() {
                continue;
            }
            if let Some(el) = doc.element_mut(element) {
                if el.attr(&attr_name).is_none() {
                    el.set_attr(&attr_name, value);
                }
            }
        }

        let top = stack.last().copied().unwrap_or_else(|| doc.root());
        let _ = doc.append_child(top, element);

        if self_closing || is_void(&tag) {
            return;
        }

        if is_raw_text(&tag) {
            let closing = format!("</{}", tag);
            let rest_lower = self.rest().to_ascii_lowercase();
            let end = rest_lower.find(&closing).map(|e| self.pos + e);
            let text_end = end.unwrap_or(self.input.len());
            let text = &self.input[self.pos..text_end];
            if !text.is_empty() {
                let node = doc.create_text(text);
                let _ = doc.append_child(element, node);
            }
            self.pos = match end {
                Some(e) => self.input[e..]
                    .find('>')
                    .map(|g| e + g + 1)
                    .unwrap_or(self.input.len()),
                None => self.input.len(),
            };
            return;
        }

        stack.push(element);
    }

    fn attr_value(&mut self) -> String {
        let rest = self.rest();
        match rest.chars().next() {
            Some(quote @ ('"' | '\'')) => {
                let start = self.pos + 1;
                let end = self.input[start..]
                    .find(quote)
                    .map(|e| start + e)
                    .unwrap_or(self.input.len());
                self.pos = (end + 1).min(self.input.len());
                decode_entities(&self.input[start..end])
            }
            _ => {
                let raw = self.take_while(|c| !c.is_whitespace() && c != '>');
                decode_entities(raw)
            }
        }
    }

    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> &'a str {
        let rest = self.rest();
        let len = rest
            .char_indices()
            .find(|(_, c)| !pred(*c))
            .map(|(i, _)| i)
            .unwrap_or(rest.len());
        self.pos += len;
        &rest[..len]
    }

    fn skip_whitespace(&mut self) {
        self.take_while(char::is_whitespace);
    }
}

fn starts_with_alpha(s: &str) -> bool {
    s.chars().next().is_some_and(|c| c.is_ascii_alphabetic())
}

/// Text directly following another text node is merged into it.
fn append_text(doc: &mut Document, parent: NodeId, text: &str) {
    if text.is_empty() {
        return;
    }
    if let Some(last) = doc.children(parent).last().copied() {
        if doc.is_text(last) {
            let mut merged = doc.char_data(last).unwrap_or_default().to_string();
            merged.push_str(text);
            doc.set_char_data(last, merged);
            return;
        }
    }
    let node = doc.create_text(text);
    let _ = doc.append_child(parent, node);
}

/// Pop the stack up to the nearest open element named `name`. End tags
/// without a matching open element are ignored.
fn close_element(doc: &Document, stack: &mut Vec<NodeId>, name: &str) {
    let position = stack
        .iter()
        .skip(1)
        .rposition(|n| doc.tag(*n) == Some(name))
        .map(|p| p + 1);
    if let Some(p) = position {
        stack.truncate(p);
    }
}

#[cfg(test)]
#[path = "markup_tests.rs"]
mod tests;
