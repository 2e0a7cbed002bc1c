// ABOUTME: Owned output tree of converted tags and the fresh document they are appended to.
// ABOUTME: Serializes to minimal HTML with escaped text and attribute values.

use std::fmt;

use serde::{Serialize, Serializer};

/// A node in the output tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagNode {
    Element(Element),
    Text(String),
}

impl TagNode {
    fn write_html(&self, out: &mut String) {
        match self {
            TagNode::Element(el) => el.write_html(out),
            TagNode::Text(text) => out.push_str(&escape_text(text)),
        }
    }

    fn write_text(&self, out: &mut String) {
        match self {
            TagNode::Element(el) => el.write_text(out),
            TagNode::Text(text) => out.push_str(text),
        }
    }
}

impl From<Element> for TagNode {
    fn from(el: Element) -> Self {
        TagNode::Element(el)
    }
}

/// A newly built tag. Never shares structure with the source document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    name: String,
    attrs: Vec<(String, String)>,
    children: Vec<TagNode>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attrs(&self) -> &[(String, String)] {
        &self.attrs
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn children(&self) -> &[TagNode] {
        &self.children
    }

    pub fn set_attrs(&mut self, attrs: Vec<(String, String)>) {
        self.attrs = attrs;
    }

    pub fn push(&mut self, node: impl Into<TagNode>) {
        self.children.push(node.into());
    }

    /// Append text, merging with a trailing text node.
    pub fn push_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        if let Some(TagNode::Text(last)) = self.children.last_mut() {
            last.push_str(text);
        } else {
            self.children.push(TagNode::Text(text.to_string()));
        }
    }

    /// Concatenated text of all descendants.
    pub fn text(&self) -> String {
        let mut out = String::new();
        self.write_text(&mut out);
        out
    }

    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.name);
        for (k, v) in &self.attrs {
            out.push(' ');
            out.push_str(k);
            out.push_str("=\"");
            out.push_str(&escape_attr(v));
            out.push('"');
        }

        if is_void_element(&self.name) {
            out.push_str(" />");
            return;
        }

        out.push('>');
        for child in &self.children {
            child.write_html(out);
        }
        out.push_str("</");
        out.push_str(&self.name);
        out.push('>');
    }

    fn write_text(&self, out: &mut String) {
        if self.name == "br" {
            out.push('\n');
        }
        for child in &self.children {
            child.write_text(out);
        }
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_html())
    }
}

/// The assembled result: converted tags as direct children, in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputDocument {
    children: Vec<Element>,
}

impl OutputDocument {
    /// A fresh, empty document.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, element: Element) {
        self.children.push(element);
    }

    pub fn children(&self) -> &[Element] {
        &self.children
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn to_html(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            child.write_html(&mut out);
        }
        out
    }

    /// Block texts separated by blank lines.
    pub fn text(&self) -> String {
        self.children
            .iter()
            .map(|el| el.text().trim().to_string())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

impl fmt::Display for OutputDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_html())
    }
}

impl Serialize for OutputDocument {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_html())
    }
}

/// Escape text content
fn escape_text(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Escape attribute value
fn escape_attr(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Check if tag is void element
pub(crate) fn is_void_element(tag: &str) -> bool {
    matches!(
        tag,
        "area"
            | "base"
            | "br"
            | "col"
            | "embed"
            | "hr"
            | "img"
            | "input"
            | "link"
            | "meta"
            | "param"
            | "source"
            | "track"
            | "wbr"
    )
}
