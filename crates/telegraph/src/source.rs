// ABOUTME: Parsed source document with a line/column index of every start tag in the raw HTML.
// ABOUTME: Converters read element positions from here to build position keys.

//! Source documents.
//!
//! html5ever does not report where an element started in the input, so the raw
//! text is scanned once for start tags. Each parsed element is then matched to
//! its start tag by its ordinal among same-named elements.
//!
//! Some parsed elements have no start tag at all: a stray `</p>` makes the
//! parser insert an empty paragraph, and `</br>` becomes a line break. The
//! scan records those end tags as implied entries so the ordinals of later
//! elements stay aligned. Implied entries never yield a location.

use std::collections::HashMap;

use ego_tree::NodeId;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::error::ConvertTagError;

/// Comments, doctype, processing instructions, end tags, and start tags.
/// End tags capture their name in group 1, start tags in group 2.
static MARKUP_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?s)<!--.*?-->|<![^>]*>|<\?[^>]*>|</([A-Za-z][^\s/>]*)[^>]*>|</[^>]*>|<([A-Za-z][^\s/>]*)(?:[^>"']|"[^"]*"|'[^']*')*>"#)
        .unwrap()
});

static DOCTYPE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^\s*<!doctype\s+html\b([^>]*)>").unwrap());

// Elements whose content is not markup
const RAW_TEXT_TAGS: &[&str] = &[
    "script", "style", "textarea", "title", "xmp", "iframe", "noembed", "noframes", "noscript",
];

// Start tags that keep the parser in the document head
const HEAD_TAGS: &[&str] = &[
    "html", "head", "meta", "title", "link", "base", "style", "script", "noscript", "template",
    "basefont", "bgsound",
];

// Start tags that close an open paragraph
const CLOSES_PARAGRAPH: &[&str] = &[
    "address", "article", "aside", "blockquote", "center", "dd", "details", "dialog", "dir", "div",
    "dl", "dt", "fieldset", "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5",
    "h6", "header", "hgroup", "hr", "li", "listing", "main", "menu", "nav", "ol", "p", "plaintext",
    "pre", "search", "section", "summary", "ul", "xmp",
];

// End tags of elements that may hold a paragraph, besides the block set above
const ENDS_PARAGRAPH: &[&str] = &[
    "applet", "body", "button", "caption", "html", "marquee", "object", "table", "td", "template",
    "th", "tr",
];

/// Where a start tag begins in the raw text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SourceLocation {
    /// 1-based line number.
    pub line: usize,
    /// 0-based character offset of the `<` within the line.
    pub column: usize,
}

/// Byte offsets of every line start, for offset -> (line, column) lookups.
struct LineIndex<'s> {
    source: &'s str,
    starts: Vec<usize>,
}

impl<'s> LineIndex<'s> {
    fn new(source: &'s str) -> Self {
        let mut starts = vec![0];
        starts.extend(
            source
                .bytes()
                .enumerate()
                .filter(|(_, b)| *b == b'\n')
                .map(|(i, _)| i + 1),
        );
        Self { source, starts }
    }

    fn locate(&self, offset: usize) -> SourceLocation {
        let idx = match self.starts.binary_search(&offset) {
            Ok(i) => i,
            Err(i) => i - 1,
        };
        let line_start = self.starts[idx];
        SourceLocation {
            line: idx + 1,
            column: self.source[line_start..offset].chars().count(),
        }
    }
}

/// One recorded tag. `None` marks an element the parser creates from an end tag.
type Slot = Option<SourceLocation>;

const VOID_TAGS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Whether a paragraph is open, as far as the parser's recovery rules go.
#[derive(Default)]
struct ParagraphState {
    in_body: bool,
    open: bool,
    table_closes: bool,
    // Elements opened inside the current paragraph
    inner: Vec<String>,
}

impl ParagraphState {
    fn start(&mut self, name: &str) {
        if !HEAD_TAGS.contains(&name) {
            self.in_body = true;
        }
        if name == "p" {
            self.open = true;
            self.inner.clear();
        } else if CLOSES_PARAGRAPH.contains(&name) || (name == "table" && self.table_closes) {
            self.open = false;
        } else if self.open && !VOID_TAGS.contains(&name) {
            self.inner.push(name.to_string());
        }
    }

    /// Returns true when the end tag makes the parser insert an empty paragraph.
    fn end(&mut self, name: &str) -> bool {
        if name == "p" {
            let stray = self.in_body && !self.open;
            self.open = false;
            return stray;
        }
        if !self.open {
            return false;
        }
        if let Some(pos) = self.inner.iter().rposition(|n| n == name) {
            self.inner.truncate(pos);
        } else if CLOSES_PARAGRAPH.contains(&name) || ENDS_PARAGRAPH.contains(&name) {
            self.open = false;
        }
        false
    }
}

/// Start tag locations grouped by lowercase tag name, in source order.
#[derive(Debug, Clone, Default)]
pub struct SourceMap {
    tags: HashMap<String, Vec<Slot>>,
}

impl SourceMap {
    /// Scan a full HTML document for start tags.
    pub fn scan(source: &str) -> Self {
        // Without a standards doctype the parser runs in quirks mode, where
        // <table> does not close a paragraph.
        let table_closes = DOCTYPE_RE.captures(source).is_some_and(|caps| {
            let rest = caps.get(1).map_or("", |m| m.as_str()).to_ascii_lowercase();
            !rest.contains("transitional") && !rest.contains("frameset")
        });
        Self::scan_with(
            source,
            ParagraphState {
                table_closes,
                ..ParagraphState::default()
            },
        )
    }

    /// Scan an HTML fragment. Fragments are parsed in a body context.
    pub fn scan_fragment(source: &str) -> Self {
        Self::scan_with(
            source,
            ParagraphState {
                in_body: true,
                table_closes: true,
                ..ParagraphState::default()
            },
        )
    }

    fn scan_with(source: &str, mut paragraph: ParagraphState) -> Self {
        let lines = LineIndex::new(source);
        let lower = source.to_ascii_lowercase();
        let mut map = SourceMap::default();
        let mut at = 0;

        while let Some(caps) = MARKUP_RE.captures_at(source, at) {
            let Some(whole) = caps.get(0) else { break };
            at = whole.end();

            if let Some(name) = caps.get(1) {
                let name = name.as_str().to_ascii_lowercase();
                if paragraph.end(&name) {
                    map.push("p", None);
                } else if name == "br" {
                    map.push("br", None);
                }
                continue;
            }

            let Some(name) = caps.get(2) else { continue };
            let name = name.as_str().to_ascii_lowercase();
            paragraph.start(&name);
            map.push(&name, Some(lines.locate(whole.start())));

            if RAW_TEXT_TAGS.contains(&name.as_str()) {
                let closing = format!("</{}", name);
                at = lower[at..]
                    .find(&closing)
                    .map(|i| at + i)
                    .unwrap_or(source.len());
            }
        }

        map
    }

    fn push(&mut self, name: &str, slot: Slot) {
        self.tags.entry(name.to_string()).or_default().push(slot);
    }

    /// Location of the `ordinal`-th (0-based) element named `name`.
    ///
    /// Returns `None` past the last recorded tag and for elements the parser
    /// creates without a start tag.
    pub fn nth(&self, name: &str, ordinal: usize) -> Option<SourceLocation> {
        self.tags.get(name).and_then(|v| v.get(ordinal)).copied().flatten()
    }
}

/// A parsed HTML document together with the source location of its elements.
pub struct SourceDocument {
    html: Html,
    locations: HashMap<NodeId, SourceLocation>,
    elements: HashMap<SourceLocation, NodeId>,
}

impl SourceDocument {
    /// Parse a full HTML document. Malformed markup is recovered by html5ever.
    pub fn parse(source: &str) -> Self {
        Self::from_html(Html::parse_document(source), SourceMap::scan(source))
    }

    /// Parse an HTML fragment, e.g. a single tag.
    pub fn parse_fragment(source: &str) -> Self {
        Self::from_html(Html::parse_fragment(source), SourceMap::scan_fragment(source))
    }

    fn from_html(html: Html, map: SourceMap) -> Self {
        let mut ordinals: HashMap<&str, usize> = HashMap::new();
        let mut locations = HashMap::new();
        let mut elements = HashMap::new();

        for node in html.tree.root().descendants() {
            let Some(el) = node.value().as_element() else {
                continue;
            };
            let ordinal = ordinals.entry(el.name()).or_insert(0);
            if let Some(loc) = map.nth(el.name(), *ordinal) {
                locations.insert(node.id(), loc);
                elements.insert(loc, node.id());
            }
            *ordinal += 1;
        }

        Self {
            html,
            locations,
            elements,
        }
    }

    pub fn html(&self) -> &Html {
        &self.html
    }

    /// The first element matching `selector`.
    pub fn find(&self, selector: &Selector) -> Option<ElementRef<'_>> {
        self.html.select(selector).next()
    }

    /// Source location of a parsed element, if it came from a start tag.
    pub fn location(&self, element: &ElementRef<'_>) -> Option<SourceLocation> {
        self.locations.get(&element.id()).copied()
    }

    /// The element whose start tag begins at `location`.
    pub fn element_at(&self, location: SourceLocation) -> Option<ElementRef<'_>> {
        let id = self.elements.get(&location)?;
        self.html.tree.get(*id).and_then(ElementRef::wrap)
    }

    /// The `<body>` element, if the source actually contains one.
    ///
    /// html5ever always synthesizes a body, so an implied body with no start
    /// tag in the source counts as missing.
    pub fn body(&self) -> Option<SourceBody<'_>> {
        static BODY: Lazy<Selector> = Lazy::new(|| Selector::parse("body").unwrap());
        let body = self.find(&BODY)?;
        self.location(&body)?;
        Some(SourceBody {
            element: body,
            document: self,
        })
    }

    /// The whole document as a conversion root. Used for fragments.
    pub fn root(&self) -> SourceBody<'_> {
        SourceBody {
            element: self.html.root_element(),
            document: self,
        }
    }
}

/// The subtree converters scan. Read-only.
#[derive(Clone, Copy)]
pub struct SourceBody<'a> {
    element: ElementRef<'a>,
    document: &'a SourceDocument,
}

impl<'a> SourceBody<'a> {
    pub fn element(&self) -> ElementRef<'a> {
        self.element
    }

    /// Descendant elements matching `selector`, in document order.
    pub fn select<'s>(
        &self,
        selector: &'s Selector,
    ) -> impl Iterator<Item = ElementRef<'a>> + 's
    where
        'a: 's,
    {
        self.element.select(selector)
    }

    pub fn location(&self, element: &ElementRef<'a>) -> Option<SourceLocation> {
        self.document.location(element)
    }

    pub fn element_at(&self, location: SourceLocation) -> Option<ElementRef<'a>> {
        self.document.element_at(location)
    }

    /// Location of `element`, or a [`ConvertTagError`] naming the closest
    /// located ancestor's line when the element has no start tag.
    pub fn locate(&self, element: &ElementRef<'a>) -> Result<SourceLocation, ConvertTagError> {
        if let Some(loc) = self.location(element) {
            return Ok(loc);
        }
        let line = element
            .ancestors()
            .filter_map(ElementRef::wrap)
            .find_map(|a| self.location(&a))
            .map_or(0, |loc| loc.line);
        Err(ConvertTagError::new(element.value().name(), line))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scan_records_line_and_column() {
        let html = "<html>\n<body>\n  <blockquote>a</blockquote>\n<p>b</p><p>c</p>\n</body></html>";
        let map = SourceMap::scan(html);

        assert_eq!(map.nth("html", 0), Some(SourceLocation { line: 1, column: 0 }));
        assert_eq!(map.nth("body", 0), Some(SourceLocation { line: 2, column: 0 }));
        assert_eq!(
            map.nth("blockquote", 0),
            Some(SourceLocation { line: 3, column: 2 })
        );
        assert_eq!(map.nth("p", 0), Some(SourceLocation { line: 4, column: 0 }));
        assert_eq!(map.nth("p", 1), Some(SourceLocation { line: 4, column: 8 }));
        assert_eq!(map.nth("p", 2), None);
    }

    #[test]
    fn scan_counts_columns_in_characters() {
        let html = "<p>«Привет»</p><p>x</p>";
        let map = SourceMap::scan(html);
        assert_eq!(map.nth("p", 1), Some(SourceLocation { line: 1, column: 15 }));
    }

    #[test]
    fn scan_skips_comments_and_raw_text() {
        let html = r#"<!-- <p>no</p> --><script>if (a<b) { x = "<p>"; }</script><p>yes</p>"#;
        let map = SourceMap::scan(html);
        assert_eq!(map.nth("p", 0).map(|l| l.column), Some(58));
        assert_eq!(map.nth("p", 1), None);
        assert_eq!(map.nth("script", 1), None);
    }

    #[test]
    fn scan_ignores_markup_inside_attribute_values() {
        let html = r#"<div title="<p>">x</div><p>y</p>"#;
        let map = SourceMap::scan(html);
        assert_eq!(map.nth("div", 1), None);
        assert_eq!(map.nth("p", 0).map(|l| l.column), Some(24));
        assert_eq!(map.nth("p", 1), None);
    }

    #[test]
    fn scan_lowercases_tag_names() {
        let map = SourceMap::scan("<BLOCKQUOTE>x</BLOCKQUOTE>");
        assert_eq!(
            map.nth("blockquote", 0),
            Some(SourceLocation { line: 1, column: 0 })
        );
    }

    #[test]
    fn stray_paragraph_end_reserves_an_implied_slot() {
        let map = SourceMap::scan("<body>\n<p>a</p></p>\n<p>b</p>\n</body>");
        assert_eq!(map.nth("p", 0), Some(SourceLocation { line: 2, column: 0 }));
        assert_eq!(map.nth("p", 1), None);
        assert_eq!(map.nth("p", 2), Some(SourceLocation { line: 3, column: 0 }));
    }

    #[test]
    fn paragraph_closed_by_block_makes_end_tag_stray() {
        let map = SourceMap::scan_fragment("<p>a<div>b</div></p><p>c</p>");
        assert_eq!(map.nth("p", 0), Some(SourceLocation { line: 1, column: 0 }));
        assert_eq!(map.nth("p", 1), None);
        assert_eq!(map.nth("p", 2), Some(SourceLocation { line: 1, column: 20 }));
    }

    #[test]
    fn paragraph_end_in_head_is_ignored() {
        let map = SourceMap::scan("<html><head></p></head><body><p>x</p></body></html>");
        assert_eq!(map.nth("p", 0), Some(SourceLocation { line: 1, column: 29 }));
    }

    #[test]
    fn quirks_mode_table_stays_inside_paragraph() {
        let html = "<p>a<table><tr><td>x</td></tr></table></p><p>b</p>";
        let quirks = SourceMap::scan(&format!("<html><body>{}</body></html>", html));
        assert_eq!(quirks.nth("p", 1).map(|l| l.column), Some(54));

        let standard = SourceMap::scan(&format!("<!DOCTYPE html><html><body>{}</body></html>", html));
        assert_eq!(standard.nth("p", 1), None);
        assert_eq!(standard.nth("p", 2).map(|l| l.column), Some(69));
    }

    #[test]
    fn document_skips_elements_without_start_tag() {
        let doc = SourceDocument::parse("<body>\n<p>a</p></p>\n<p>b</p>\n</body>");
        let sel = Selector::parse("p").unwrap();
        let located: Vec<_> = doc
            .html()
            .select(&sel)
            .map(|el| (el.text().collect::<String>(), doc.location(&el)))
            .collect();
        assert_eq!(
            located,
            vec![
                ("a".to_string(), Some(SourceLocation { line: 2, column: 0 })),
                (String::new(), None),
                ("b".to_string(), Some(SourceLocation { line: 3, column: 0 })),
            ]
        );
    }

    #[test]
    fn leading_paragraph_end_keeps_real_paragraph_located() {
        let doc = SourceDocument::parse("<body></p>\n<p>real</p></body>");
        let sel = Selector::parse("p").unwrap();
        let real = doc.html().select(&sel).nth(1).unwrap();
        assert_eq!(real.text().collect::<String>(), "real");
        assert_eq!(doc.location(&real), Some(SourceLocation { line: 2, column: 0 }));
    }

    #[test]
    fn element_at_finds_located_elements() {
        let doc = SourceDocument::parse("<html><body>\n  <blockquote>q</blockquote></body></html>");
        let el = doc
            .element_at(SourceLocation { line: 2, column: 2 })
            .unwrap();
        assert_eq!(el.value().name(), "blockquote");
        assert!(doc.element_at(SourceLocation { line: 2, column: 3 }).is_none());
    }

    #[test]
    fn document_locates_parsed_elements() {
        let doc = SourceDocument::parse("<html><body>\n<p>a</p>\n   <p>b</p></body></html>");
        let sel = Selector::parse("p").unwrap();
        let locs: Vec<_> = doc
            .html()
            .select(&sel)
            .map(|el| doc.location(&el))
            .collect();
        assert_eq!(
            locs,
            vec![
                Some(SourceLocation { line: 2, column: 0 }),
                Some(SourceLocation { line: 3, column: 3 }),
            ]
        );
    }

    #[test]
    fn implied_body_is_missing() {
        let doc = SourceDocument::parse("<html><head></head></html>");
        assert!(doc.body().is_none());

        let doc = SourceDocument::parse("<html><body><p>x</p></body></html>");
        assert!(doc.body().is_some());
    }

    #[test]
    fn locate_reports_ancestor_line_for_implied_elements() {
        // html5ever implies <tbody>; it has no start tag in the source
        let doc = SourceDocument::parse("<html><body>\n<table><tr><td>x</td></tr></table></body></html>");
        let body = doc.body().unwrap();
        let sel = Selector::parse("tbody").unwrap();
        let tbody = body.select(&sel).next().unwrap();

        let err = body.locate(&tbody).unwrap_err();
        assert_eq!(err.tag_name, "tbody");
        assert_eq!(err.line, 2);
    }
}
