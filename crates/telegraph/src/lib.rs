// ABOUTME: Main library entry point for the Telegraph article converter.
// ABOUTME: Re-exports the public API: ArticleBuilder, Page, converters, position keys, errors, and formats.

//! Telegraph - converts scraped article pages into Telegraph-ready markup.
//!
//! Each registered converter rebuilds one tag type in the platform's
//! restricted vocabulary. The builder merges converter results by source
//! position so the output keeps the article's original order.
//!
//! # Example
//!
//! ```
//! use digests_telegraph::{ArticleBuilder, PublishingError};
//!
//! fn main() -> Result<(), PublishingError> {
//!     let html = r#"<html><head><meta property="og:title" content="Title"></head>
//! <body><blockquote class="article_decoration_first">Quote</blockquote></body></html>"#;
//!     let page = ArticleBuilder::default().build(html)?;
//!     assert_eq!(page.title(), "Title");
//!     assert_eq!(page.html().to_html(), "<blockquote>Quote</blockquote>");
//!     Ok(())
//! }
//! ```

pub mod builder;
pub mod converters;
pub mod decode;
pub mod error;
pub mod formats;
pub mod options;
pub mod page;
pub mod policy;
pub mod position;
pub mod source;
pub mod tag;

pub use crate::builder::{build, convert, ArticleBuilder};
pub use crate::converters::{
    convert_blockquote, convert_heading, convert_list, convert_paragraph, default_converters,
    ConvertResult, ConvertedTags, TagConverter,
};
pub use crate::decode::decode_html_bytes;
pub use crate::error::{ConvertTagError, HtmlParseError, PublishingError};
pub use crate::formats::ContentType;
pub use crate::options::{CollisionPolicy, Options, OptionsBuilder};
pub use crate::page::Page;
pub use crate::position::{encode, PositionKey};
pub use crate::source::{SourceBody, SourceDocument, SourceLocation};
pub use crate::tag::{Element, OutputDocument, TagNode};
