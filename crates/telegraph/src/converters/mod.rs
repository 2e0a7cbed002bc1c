// ABOUTME: Pluggable per-tag converters that rebuild source tags in the restricted vocabulary.
// ABOUTME: Each converter returns its tags keyed by source position; the builder merges them.

//! Tag converters.
//!
//! A converter is a plain function over the source body. It finds every
//! occurrence of its tag type, builds a fresh replacement with filtered
//! attributes, and keys it by where the original started. Converters know
//! nothing about each other; the article builder merges their results and
//! drops tags that an enclosing converted block already carries.
//!
//! Elements the parser created without a start tag in the source, such as
//! the empty paragraph a stray `</p>` produces, have no position and are
//! skipped.

pub mod blockquote;
pub mod blocks;

use std::collections::BTreeMap;

use scraper::{ElementRef, Node, Selector};
use tracing::debug;

use crate::error::ConvertTagError;
use crate::policy::{self, AttributePolicy};
use crate::position::{self, PositionKey};
use crate::source::SourceBody;
use crate::tag::Element;

pub use blockquote::convert_blockquote;
pub use blocks::{convert_heading, convert_list, convert_paragraph};

/// Converted tags keyed by source position. Iterates in document order.
pub type ConvertedTags = BTreeMap<PositionKey, Element>;

/// `Ok(None)` means the converter found nothing to contribute.
pub type ConvertResult = Result<Option<ConvertedTags>, ConvertTagError>;

/// A converter for one tag type.
pub type TagConverter = fn(&SourceBody<'_>) -> ConvertResult;

/// Every built-in converter, in registration order.
pub fn default_converters() -> Vec<TagConverter> {
    vec![
        convert_blockquote,
        convert_paragraph,
        convert_heading,
        convert_list,
    ]
}

/// Convert every match of `selector`, naming the new tag with `rename`.
pub(crate) fn convert_selected(
    body: &SourceBody<'_>,
    selector: &Selector,
    rename: fn(&str) -> &str,
) -> ConvertResult {
    let mut tags = ConvertedTags::new();

    for source in body.select(selector) {
        let Some(loc) = body.location(&source) else {
            debug!(tag = source.value().name(), "skipping element without a start tag");
            continue;
        };
        let element = rebuild(source, rename(source.value().name()));
        tags.insert(position::encode(loc.line, loc.column, None), element);
    }

    Ok(if tags.is_empty() { None } else { Some(tags) })
}

/// Keeps the source tag name.
pub(crate) fn same_name(name: &str) -> &str {
    name
}

/// Build a new tag named `name` from `source`, applying the attribute policy.
pub fn rebuild(source: ElementRef<'_>, name: &str) -> Element {
    let mut element = Element::new(name);
    element.set_attrs(AttributePolicy::for_tag(name).filter(source.value().attrs()));
    copy_children(source, &mut element);
    element
}

/// Copy text and vocabulary tags. Tags outside the vocabulary are unwrapped.
fn copy_children(parent: ElementRef<'_>, into: &mut Element) {
    for child in parent.children() {
        match child.value() {
            Node::Text(text) => into.push_text(text),
            Node::Element(el) => {
                let Some(child_ref) = ElementRef::wrap(child) else {
                    continue;
                };
                let name = el.name();
                if policy::is_dropped_tag(name) {
                    continue;
                }
                if policy::is_allowed_tag(name) {
                    into.push(rebuild(child_ref, name));
                } else {
                    copy_children(child_ref, into);
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::SourceDocument;

    #[test]
    fn rebuild_unwraps_unknown_tags_and_drops_scripts() {
        let doc = SourceDocument::parse_fragment(
            r#"<p class="x">a <span class="hl">b</span><script>alert(1)</script> <em style="c">d</em></p>"#,
        );
        let sel = Selector::parse("p").unwrap();
        let source = doc.html().select(&sel).next().unwrap();

        let rebuilt = rebuild(source, "p");
        assert_eq!(rebuilt.to_html(), "<p>a b <em>d</em></p>");
    }

    #[test]
    fn rebuild_keeps_allowed_attributes() {
        let doc = SourceDocument::parse_fragment(
            r#"<p><a class="lnk" href="https://vk.com/away.php?to=x">link</a></p>"#,
        );
        let sel = Selector::parse("p").unwrap();
        let source = doc.html().select(&sel).next().unwrap();

        assert_eq!(
            rebuild(source, "p").to_html(),
            r#"<p><a href="https://vk.com/away.php?to=x">link</a></p>"#
        );
    }

    #[test]
    fn converter_ignores_enclosing_tags() {
        let doc = SourceDocument::parse_fragment(
            "<blockquote><p>inner</p></blockquote><div><p>outer</p></div>",
        );
        let tags = convert_paragraph(&doc.root()).unwrap().unwrap();

        let html: Vec<String> = tags.values().map(Element::to_html).collect();
        assert_eq!(html, vec!["<p>inner</p>", "<p>outer</p>"]);
    }

    #[test]
    fn implied_paragraph_is_skipped() {
        let doc = SourceDocument::parse_fragment("<p>a</p></p>\n<p>b</p>");
        let tags = convert_paragraph(&doc.root()).unwrap().unwrap();

        let keys: Vec<String> = tags.keys().map(PositionKey::as_key).collect();
        assert_eq!(keys, vec!["00000010000001", "00000020000001"]);
        let html: Vec<String> = tags.values().map(Element::to_html).collect();
        assert_eq!(html, vec!["<p>a</p>", "<p>b</p>"]);
    }

    #[test]
    fn default_converters_cover_every_block_type() {
        let doc = SourceDocument::parse_fragment(
            "<h1>t</h1><p>p</p><blockquote>q</blockquote><ul><li>i</li></ul>",
        );
        let body = doc.root();
        let contributed = default_converters()
            .iter()
            .filter_map(|convert| convert(&body).unwrap())
            .count();
        assert_eq!(contributed, 4);
    }
}
