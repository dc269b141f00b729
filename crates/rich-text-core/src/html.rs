//! HTML codec for the editable surface.
//!
//! `set_content` accepts an HTML fragment and `get_content` returns one, so
//! the tree needs a forgiving parser and a deterministic serializer. The
//! parser is a small hand-written tokenizer: unknown tags are kept, unclosed
//! tags auto-close when their parent closes, comments and doctypes are
//! skipped. The serializer emits attributes in sorted order with the `style`
//! attribute last, which makes a parse/serialize cycle a fixed point after the
//! first normalization pass.

use crate::dom::{Dom, NodeId};
use unicode_segmentation::UnicodeSegmentation;

/// Tags serialized without a closing tag.
const VOID_TAGS: &[&str] = &["br", "hr", "img", "input", "meta", "base"];

/// User-perceived length of a string in grapheme clusters.
///
/// The max-length guard counts what the user sees: one emoji is one
/// character regardless of its code-point count.
pub fn visible_len(text: &str) -> usize {
    text.graphemes(true).count()
}

// -- serialization ----------------------------------------------------------

/// Serialize the children of `node` (its "inner HTML").
pub fn inner_html(dom: &Dom, node: NodeId) -> String {
    let mut out = String::new();
    for &child in dom.children(node) {
        serialize_node(dom, child, &mut out);
    }
    out
}

fn serialize_node(dom: &Dom, node: NodeId, out: &mut String) {
    if let Some(text) = dom.text(node) {
        out.push_str(&escape_text(text));
        return;
    }

    let Some(element) = dom.element(node) else {
        return;
    };

    out.push('<');
    out.push_str(&element.tag);
    for (name, value) in &element.attrs {
        out.push(' ');
        out.push_str(name);
        out.push_str("=\"");
        out.push_str(&escape_attr(value));
        out.push('"');
    }
    if !element.styles.is_empty() {
        let declarations: Vec<String> = element
            .styles
            .iter()
            .map(|(property, value)| format!("{}: {}", property, value))
            .collect();
        out.push_str(" style=\"");
        out.push_str(&escape_attr(&declarations.join("; ")));
        out.push('"');
    }
    out.push('>');

    if VOID_TAGS.contains(&element.tag.as_str()) {
        return;
    }

    for &child in dom.children(node) {
        serialize_node(dom, child, out);
    }
    out.push_str("</");
    out.push_str(dom.tag(node).unwrap_or_default());
    out.push('>');
}

fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            '\u{feff}' => out.push_str("&#65279;"),
            other => out.push(other),
        }
    }
    out
}

fn escape_attr(value: &str) -> String {
    escape_text(value).replace('"', "&quot;")
}

// -- parsing ----------------------------------------------------------------

/// Replace the children of `node` with the parse of `html`.
pub fn set_inner_html(dom: &mut Dom, node: NodeId, html: &str) {
    dom.clear_children(node);
    for child in parse_fragment(dom, html) {
        dom.append_child(node, child);
    }
}

/// Parse an HTML fragment into detached top-level nodes.
pub fn parse_fragment(dom: &mut Dom, html: &str) -> Vec<NodeId> {
    Parser::new(html).run(dom)
}

struct Parser<'a> {
    input: &'a [u8],
    source: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            input: source.as_bytes(),
            source,
            pos: 0,
        }
    }

    fn run(mut self, dom: &mut Dom) -> Vec<NodeId> {
        let mut roots: Vec<NodeId> = Vec::new();
        // Stack of open elements; children attach to the top.
        let mut stack: Vec<NodeId> = Vec::new();

        while self.pos < self.input.len() {
            if self.peek() == b'<' {
                if self.starts_with("<!--") {
                    self.skip_comment();
                } else if self.starts_with("<!") {
                    self.skip_until(b'>');
                } else if self.starts_with("</") {
                    let tag = self.read_closing_tag();
                    // Pop to the matching open element; unmatched closers are
                    // dropped, everything inside auto-closes.
                    if let Some(depth) = stack
                        .iter()
                        .rposition(|&open| dom.tag(open) == Some(tag.as_str()))
                    {
                        stack.truncate(depth);
                    }
                } else if let Some((element, self_closing)) = self.read_open_tag(dom) {
                    attach(dom, &mut roots, &stack, element);
                    let tag = dom.tag(element).unwrap_or_default().to_string();
                    if !self_closing && !VOID_TAGS.contains(&tag.as_str()) {
                        stack.push(element);
                    }
                } else {
                    // A lone '<' that opens nothing parses as text.
                    let text = dom.create_text("<");
                    attach(dom, &mut roots, &stack, text);
                    self.pos += 1;
                }
            } else {
                let raw = self.read_text();
                let decoded = decode_entities(&raw);
                if !decoded.is_empty() {
                    let text = dom.create_text(&decoded);
                    attach(dom, &mut roots, &stack, text);
                }
            }
        }

        roots
    }

    fn peek(&self) -> u8 {
        self.input[self.pos]
    }

    fn starts_with(&self, prefix: &str) -> bool {
        self.source[self.pos..].starts_with(prefix)
    }

    fn skip_comment(&mut self) {
        if let Some(end) = self.source[self.pos..].find("-->") {
            self.pos += end + 3;
        } else {
            self.pos = self.input.len();
        }
    }

    fn skip_until(&mut self, byte: u8) {
        while self.pos < self.input.len() && self.input[self.pos] != byte {
            self.pos += 1;
        }
        if self.pos < self.input.len() {
            self.pos += 1;
        }
    }

    fn read_text(&mut self) -> String {
        let start = self.pos;
        while self.pos < self.input.len() && self.input[self.pos] != b'<' {
            self.pos += 1;
        }
        self.source[start..self.pos].to_string()
    }

    fn read_closing_tag(&mut self) -> String {
        self.pos += 2; // consume "</"
        let start = self.pos;
        while self.pos < self.input.len() && self.input[self.pos] != b'>' {
            self.pos += 1;
        }
        let tag = self.source[start..self.pos].trim().to_ascii_lowercase();
        if self.pos < self.input.len() {
            self.pos += 1;
        }
        tag
    }

    /// Parse `<tag attr="v" ...>`; returns the created element and whether the
    /// tag was self-closing. Returns `None` if no tag name follows the `<`.
    fn read_open_tag(&mut self, dom: &mut Dom) -> Option<(NodeId, bool)> {
        let mark = self.pos;
        self.pos += 1; // consume '<'
        let name_start = self.pos;
        while self.pos < self.input.len() && self.input[self.pos].is_ascii_alphanumeric() {
            self.pos += 1;
        }
        if self.pos == name_start {
            self.pos = mark;
            return None;
        }
        let tag = self.source[name_start..self.pos].to_ascii_lowercase();
        let element = dom.create_element(&tag);

        let mut self_closing = false;
        loop {
            self.skip_whitespace();
            if self.pos >= self.input.len() {
                break;
            }
            match self.peek() {
                b'>' => {
                    self.pos += 1;
                    break;
                }
                b'/' => {
                    self.pos += 1;
                    self_closing = true;
                }
                _ => {
                    let (name, value) = self.read_attribute();
                    if name == "style" {
                        apply_style_attribute(dom, element, &value);
                    } else if !name.is_empty() {
                        dom.set_attr(element, &name, &value);
                    }
                }
            }
        }

        Some((element, self_closing))
    }

    fn read_attribute(&mut self) -> (String, String) {
        let start = self.pos;
        while self.pos < self.input.len()
            && !matches!(self.peek(), b'=' | b'>' | b'/' | b' ' | b'\t' | b'\n' | b'\r')
        {
            self.pos += 1;
        }
        let name = self.source[start..self.pos].to_ascii_lowercase();

        self.skip_whitespace();
        if self.pos >= self.input.len() || self.peek() != b'=' {
            return (name, String::new());
        }
        self.pos += 1; // consume '='
        self.skip_whitespace();

        if self.pos < self.input.len() && (self.peek() == b'"' || self.peek() == b'\'') {
            let quote = self.peek();
            self.pos += 1;
            let value_start = self.pos;
            while self.pos < self.input.len() && self.input[self.pos] != quote {
                self.pos += 1;
            }
            let value = decode_entities(&self.source[value_start..self.pos]);
            if self.pos < self.input.len() {
                self.pos += 1;
            }
            (name, value)
        } else {
            let value_start = self.pos;
            while self.pos < self.input.len()
                && !matches!(self.peek(), b'>' | b' ' | b'\t' | b'\n' | b'\r')
            {
                self.pos += 1;
            }
            (
                name,
                decode_entities(&self.source[value_start..self.pos]),
            )
        }
    }

    fn skip_whitespace(&mut self) {
        while self.pos < self.input.len() && self.input[self.pos].is_ascii_whitespace() {
            self.pos += 1;
        }
    }
}

fn attach(dom: &mut Dom, roots: &mut Vec<NodeId>, stack: &[NodeId], node: NodeId) {
    if let Some(&parent) = stack.last() {
        dom.append_child(parent, node);
    } else {
        roots.push(node);
    }
}

fn apply_style_attribute(dom: &mut Dom, element: NodeId, value: &str) {
    for declaration in value.split(';') {
        if let Some((property, prop_value)) = declaration.split_once(':') {
            let property = property.trim().to_ascii_lowercase();
            let prop_value = prop_value.trim();
            if !property.is_empty() && !prop_value.is_empty() {
                dom.set_style(element, &property, prop_value);
            }
        }
    }
}

/// Decode the entity set the surface produces, plus numeric references.
pub fn decode_entities(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];
        let Some(semi) = rest.find(';') else {
            out.push_str(rest);
            return out;
        };
        let entity = &rest[1..semi];
        let decoded = match entity {
            "amp" => Some('&'),
            "lt" => Some('<'),
            "gt" => Some('>'),
            "quot" => Some('"'),
            "apos" => Some('\''),
            "nbsp" => Some('\u{a0}'),
            _ => entity
                .strip_prefix("#x")
                .or_else(|| entity.strip_prefix("#X"))
                .and_then(|hex| u32::from_str_radix(hex, 16).ok())
                .or_else(|| entity.strip_prefix('#').and_then(|dec| dec.parse().ok()))
                .and_then(char::from_u32),
        };
        match decoded {
            Some(ch) => {
                out.push(ch);
                rest = &rest[semi + 1..];
            }
            None => {
                // Unknown entity: keep the ampersand literally.
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}
