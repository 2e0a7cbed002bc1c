// ABOUTME: Article builder: validates a scraped page, runs the converters, and merges their tags in source order.
// ABOUTME: Produces a Page whose body is a fresh document containing only converted tags.

//! Article building.
//!
//! [`ArticleBuilder::build`] parses the page, rejects error pages, restricted
//! placeholders, and pages without a title or body, then hands the body to
//! [`convert`]. `convert` runs the converters one after another, unions their
//! results by [`PositionKey`](crate::position::PositionKey), and appends the
//! tags to a new document in key order. A tag whose source element sits
//! inside another converted tag's source element is dropped, since the outer
//! tag already reproduces it.

use std::collections::btree_map::Entry;
use std::collections::HashSet;

use ego_tree::NodeId;

use once_cell::sync::Lazy;
use scraper::Selector;
use tracing::{debug, warn};

use crate::converters::{ConvertedTags, TagConverter};
use crate::error::{ConvertTagError, HtmlParseError, PublishingError};
use crate::options::{CollisionPolicy, Options, OptionsBuilder};
use crate::page::Page;
use crate::position::PositionKey;
use crate::source::{SourceBody, SourceDocument, SourceLocation};
use crate::tag::OutputDocument;

static META: Lazy<Selector> = Lazy::new(|| Selector::parse("meta").unwrap());

/// Builds publishable pages from scraped article HTML.
#[derive(Debug, Clone)]
pub struct ArticleBuilder {
    opts: Options,
}

impl ArticleBuilder {
    pub fn new(opts: Options) -> Self {
        Self { opts }
    }

    /// Start configuring a builder.
    pub fn builder() -> OptionsBuilder {
        OptionsBuilder::new()
    }

    pub fn options(&self) -> &Options {
        &self.opts
    }

    /// Convert a scraped article page into a [`Page`].
    pub fn build(&self, source_html: &str) -> Result<Page, PublishingError> {
        let error_marker = compile(&self.opts.error_marker)?;
        let placeholder = compile(&self.opts.placeholder_marker)?;
        let title_meta = compile(&format!(
            "meta[property='{}']",
            self.opts.title_property
        ))?;

        let doc = SourceDocument::parse(source_html);

        if let Some(marker) = doc.find(&error_marker) {
            let detail = element_text(marker);
            warn!(detail = %detail, "page is a service error");
            return Err(HtmlParseError::service_error(detail).into());
        }

        if let Some(marker) = doc.find(&placeholder) {
            let detail = element_text(marker);
            warn!(detail = %detail, "page content is restricted");
            return Err(HtmlParseError::restricted(detail).into());
        }

        let title = doc
            .find(&title_meta)
            .and_then(|meta| meta.value().attr("content"))
            .filter(|t| !t.trim().is_empty())
            .map(str::to_string);
        let Some(title) = title else {
            let first_meta = doc.find(&META).map(|m| m.html());
            warn!(property = %self.opts.title_property, "title meta tag not found");
            return Err(HtmlParseError::title_not_found(first_meta.as_deref()).into());
        };

        let Some(body) = doc.body() else {
            warn!("body tag not found");
            return Err(HtmlParseError::body_not_found().into());
        };

        let html = convert(&body, &self.opts.converters, self.opts.collision)?;
        debug!(title = %title, tags = html.len(), "article built");
        Ok(Page::new(title, html))
    }
}

impl Default for ArticleBuilder {
    fn default() -> Self {
        Self::new(Options::default())
    }
}

/// Build a page with the given converters and default options otherwise.
pub fn build(source_html: &str, converters: &[TagConverter]) -> Result<Page, PublishingError> {
    ArticleBuilder::builder()
        .converters(converters.to_vec())
        .build()
        .build(source_html)
}

/// Run `converters` over `body` in order and assemble their tags in source order.
///
/// Tags with the same position key are resolved by `collision`. Tags nested
/// inside another converted tag in the source are left to that tag.
pub fn convert(
    body: &SourceBody<'_>,
    converters: &[TagConverter],
    collision: CollisionPolicy,
) -> Result<OutputDocument, ConvertTagError> {
    let mut tags_with_position = ConvertedTags::new();

    for (index, converter) in converters.iter().enumerate() {
        let Some(converted) = converter(body)? else {
            debug!(converter = index, "converter found nothing");
            continue;
        };
        debug!(converter = index, tags = converted.len(), "converter contributed");

        for (key, tag) in converted {
            match tags_with_position.entry(key) {
                Entry::Vacant(slot) => {
                    slot.insert(tag);
                }
                Entry::Occupied(mut slot) => {
                    debug!(key = %key, policy = %collision, "position key collision");
                    if collision == CollisionPolicy::KeepLast {
                        slot.insert(tag);
                    }
                }
            }
        }
    }

    drop_nested(body, &mut tags_with_position);

    let mut document = OutputDocument::new();
    for tag in tags_with_position.into_values() {
        document.append(tag);
    }
    Ok(document)
}

fn drop_nested(body: &SourceBody<'_>, tags: &mut ConvertedTags) {
    let emitted: HashSet<NodeId> = tags
        .keys()
        .filter_map(|key| source_element(body, key))
        .map(|el| el.id())
        .collect();

    tags.retain(|key, _| {
        let Some(source) = source_element(body, key) else {
            return true;
        };
        let nested = source.ancestors().any(|a| emitted.contains(&a.id()));
        if nested {
            debug!(key = %key, "tag is carried by its enclosing block");
        }
        !nested
    });
}

fn source_element<'a>(body: &SourceBody<'a>, key: &PositionKey) -> Option<scraper::ElementRef<'a>> {
    body.element_at(SourceLocation {
        line: key.line(),
        column: key.column(),
    })
}

fn compile(selector: &str) -> Result<Selector, HtmlParseError> {
    Selector::parse(selector).map_err(|_| HtmlParseError::invalid_selector(selector))
}

fn element_text(element: scraper::ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}
