// ABOUTME: Output format converters for built pages: HTML, plain text, Markdown, and Telegraph nodes.
// ABOUTME: Telegraph nodes are the JSON content array the publishing API accepts.

//! Output formats.
//!
//! The Telegraph API takes page content as an array of nodes, where a node is
//! either a string or `{"tag": ..., "attrs": {...}, "children": [...]}`.
//! `attrs` and `children` are omitted when empty.

use std::collections::BTreeMap;
use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::tag::{Element, OutputDocument, TagNode};

static BLANK_LINES_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());

/// The format of rendered output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContentType {
    #[default]
    Html,
    Markdown,
    Text,
    Nodes,
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ContentType::Html => "html",
            ContentType::Markdown => "markdown",
            ContentType::Text => "text",
            ContentType::Nodes => "nodes",
        };
        write!(f, "{}", s)
    }
}

impl From<&str> for ContentType {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "markdown" | "md" => ContentType::Markdown,
            "text" | "txt" => ContentType::Text,
            "nodes" | "json" => ContentType::Nodes,
            _ => ContentType::Html,
        }
    }
}

/// A Telegraph content node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Node {
    Text(String),
    Element(NodeElement),
}

/// A Telegraph element node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeElement {
    pub tag: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attrs: Option<BTreeMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<Node>>,
}

impl From<&Element> for Node {
    fn from(el: &Element) -> Self {
        let attrs: BTreeMap<String, String> = el.attrs().iter().cloned().collect();
        let children: Vec<Node> = el
            .children()
            .iter()
            .map(|child| match child {
                TagNode::Element(nested) => Node::from(nested),
                TagNode::Text(text) => Node::Text(text.clone()),
            })
            .collect();
        Node::Element(NodeElement {
            tag: el.name().to_string(),
            attrs: (!attrs.is_empty()).then_some(attrs),
            children: (!children.is_empty()).then_some(children),
        })
    }
}

/// Convert a document into Telegraph content nodes.
pub fn to_nodes(doc: &OutputDocument) -> Vec<Node> {
    doc.children().iter().map(Node::from).collect()
}

/// Serialize a document as a Telegraph content JSON array.
pub fn to_nodes_json(doc: &OutputDocument) -> serde_json::Result<String> {
    serde_json::to_string(&to_nodes(doc))
}

/// Convert a document to Markdown using htmd.
///
/// On conversion error, returns the HTML unchanged.
pub fn to_markdown(doc: &OutputDocument) -> String {
    let html = doc.to_html();
    let converter = htmd::HtmlToMarkdown::builder()
        .skip_tags(vec!["script", "style"])
        .build();
    let md = converter.convert(&html).unwrap_or_else(|_| html.clone());
    BLANK_LINES_RE
        .replace_all(md.trim(), "\n\n")
        .to_string()
}

/// Render a document in the requested format.
pub fn render(doc: &OutputDocument, content_type: ContentType) -> serde_json::Result<String> {
    Ok(match content_type {
        ContentType::Html => doc.to_html(),
        ContentType::Markdown => to_markdown(doc),
        ContentType::Text => doc.text(),
        ContentType::Nodes => to_nodes_json(doc)?,
    })
}
