// ABOUTME: Blockquote converter: rebuilds every top-level blockquote without its class attribute.
// ABOUTME: Nested vocabulary tags keep their structure, also without class.

use once_cell::sync::Lazy;
use scraper::Selector;

use super::{convert_selected, same_name, ConvertResult};
use crate::source::SourceBody;

static BLOCKQUOTE: Lazy<Selector> = Lazy::new(|| Selector::parse("blockquote").unwrap());

/// Convert `<blockquote>` tags.
pub fn convert_blockquote(body: &SourceBody<'_>) -> ConvertResult {
    convert_selected(body, &BLOCKQUOTE, same_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::encode;
    use crate::source::SourceDocument;

    #[test]
    fn strips_class_attribute() {
        let doc = SourceDocument::parse_fragment(
            r#"<blockquote class="article_decoration_first article_decoration_last">Будут ли разные виды феодализма?</blockquote>"#,
        );
        let tags = convert_blockquote(&doc.root()).unwrap().unwrap();

        assert_eq!(tags.len(), 1);
        let (key, tag) = tags.iter().next().unwrap();
        assert_eq!(*key, encode(1, 0, None));
        assert_eq!(
            tag.to_html(),
            "<blockquote>Будут ли разные виды феодализма?</blockquote>"
        );
    }

    #[test]
    fn keeps_nested_strong_without_class() {
        let doc = SourceDocument::parse_fragment(
            r#"<blockquote class="article_decoration_first">«<strong class="">адАккарийский народ</strong>!</blockquote>"#,
        );
        let tags = convert_blockquote(&doc.root()).unwrap().unwrap();
        let tag = tags.values().next().unwrap();

        assert_eq!(
            tag.to_html(),
            "<blockquote>«<strong>адАккарийский народ</strong>!</blockquote>"
        );
    }

    #[test]
    fn keys_follow_source_lines() {
        let doc = SourceDocument::parse_fragment(
            "<blockquote>one</blockquote>\n\n  <blockquote>two</blockquote>",
        );
        let tags = convert_blockquote(&doc.root()).unwrap().unwrap();
        let keys: Vec<String> = tags.keys().map(|k| k.as_key()).collect();

        assert_eq!(keys, vec!["00000010000001", "00000030000201"]);
    }

    #[test]
    fn no_blockquotes_contributes_nothing() {
        let doc = SourceDocument::parse_fragment("<p>plain</p>");
        assert_eq!(convert_blockquote(&doc.root()).unwrap(), None);
    }

    #[test]
    fn does_not_touch_source() {
        let html = r#"<blockquote class="a">x</blockquote>"#;
        let doc = SourceDocument::parse_fragment(html);
        let before = doc.html().html();
        let _ = convert_blockquote(&doc.root()).unwrap();
        assert_eq!(doc.html().html(), before);
    }
}
