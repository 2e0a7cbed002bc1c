// ABOUTME: Paragraph, heading, and list converters for the Telegraph vocabulary.
// ABOUTME: Headings are normalized to h3/h4, the only levels the platform renders.

use once_cell::sync::Lazy;
use scraper::Selector;

use super::{convert_selected, same_name, ConvertResult};
use crate::source::SourceBody;

static PARAGRAPH: Lazy<Selector> = Lazy::new(|| Selector::parse("p").unwrap());
static HEADING: Lazy<Selector> = Lazy::new(|| Selector::parse("h1, h2, h3, h4, h5, h6").unwrap());
static LIST: Lazy<Selector> = Lazy::new(|| Selector::parse("ul, ol").unwrap());

/// Convert `<p>` tags.
pub fn convert_paragraph(body: &SourceBody<'_>) -> ConvertResult {
    convert_selected(body, &PARAGRAPH, same_name)
}

/// Convert `<h1>`..`<h6>` into `<h3>` or `<h4>`.
pub fn convert_heading(body: &SourceBody<'_>) -> ConvertResult {
    convert_selected(body, &HEADING, heading_level)
}

/// Convert `<ul>` and `<ol>` tags with their items.
pub fn convert_list(body: &SourceBody<'_>) -> ConvertResult {
    convert_selected(body, &LIST, same_name)
}

fn heading_level(name: &str) -> &str {
    match name {
        "h1" | "h2" | "h3" => "h3",
        _ => "h4",
    }
}
