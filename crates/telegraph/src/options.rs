// ABOUTME: Configuration for the article builder: converters, collision policy, and marker selectors.
// ABOUTME: OptionsBuilder provides a fluent API for constructing ArticleBuilder instances.

use std::fmt;

use crate::builder::ArticleBuilder;
use crate::converters::{default_converters, TagConverter};

/// Selector of the element a site renders instead of an article on errors.
pub const DEFAULT_ERROR_MARKER: &str = "div.service_msg_error";
/// Selector of the placeholder shown for restricted articles.
pub const DEFAULT_PLACEHOLDER_MARKER: &str = "div.article_layer_placeholder__text";
/// Meta property holding the article title.
pub const DEFAULT_TITLE_PROPERTY: &str = "og:title";

/// Which tag wins when two converters produce the same position key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CollisionPolicy {
    /// The converter registered later wins.
    #[default]
    KeepLast,
    /// The converter registered earlier wins.
    KeepFirst,
}

impl fmt::Display for CollisionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CollisionPolicy::KeepLast => "keep-last",
            CollisionPolicy::KeepFirst => "keep-first",
        };
        write!(f, "{}", s)
    }
}

/// Configuration options for the article builder.
#[derive(Debug, Clone)]
pub struct Options {
    pub converters: Vec<TagConverter>,
    pub collision: CollisionPolicy,
    pub error_marker: String,
    pub placeholder_marker: String,
    pub title_property: String,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            converters: default_converters(),
            collision: CollisionPolicy::KeepLast,
            error_marker: DEFAULT_ERROR_MARKER.to_string(),
            placeholder_marker: DEFAULT_PLACEHOLDER_MARKER.to_string(),
            title_property: DEFAULT_TITLE_PROPERTY.to_string(),
        }
    }
}

/// Builder for constructing ArticleBuilder instances with custom configuration.
#[derive(Debug, Clone)]
pub struct OptionsBuilder {
    opts: Options,
}

impl OptionsBuilder {
    /// Create a new OptionsBuilder with default options.
    pub fn new() -> Self {
        Self {
            opts: Options::default(),
        }
    }

    /// Replace the converter list.
    pub fn converters(mut self, converters: Vec<TagConverter>) -> Self {
        self.opts.converters = converters;
        self
    }

    /// Register one more converter after the current ones.
    pub fn converter(mut self, converter: TagConverter) -> Self {
        self.opts.converters.push(converter);
        self
    }

    /// Set the position key collision policy.
    pub fn collision(mut self, collision: CollisionPolicy) -> Self {
        self.opts.collision = collision;
        self
    }

    /// Set the CSS selector of the service error marker.
    pub fn error_marker(mut self, selector: impl Into<String>) -> Self {
        self.opts.error_marker = selector.into();
        self
    }

    /// Set the CSS selector of the restricted-content placeholder.
    pub fn placeholder_marker(mut self, selector: impl Into<String>) -> Self {
        self.opts.placeholder_marker = selector.into();
        self
    }

    /// Set the meta property the title is read from.
    pub fn title_property(mut self, property: impl Into<String>) -> Self {
        self.opts.title_property = property.into();
        self
    }

    /// Build the ArticleBuilder with the configured options.
    pub fn build(self) -> ArticleBuilder {
        ArticleBuilder::new(self.opts)
    }
}

impl Default for OptionsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::converters::convert_blockquote;

    #[test]
    fn defaults() {
        let opts = Options::default();
        assert_eq!(opts.converters.len(), 4);
        assert_eq!(opts.collision, CollisionPolicy::KeepLast);
        assert_eq!(opts.error_marker, "div.service_msg_error");
        assert_eq!(opts.placeholder_marker, "div.article_layer_placeholder__text");
        assert_eq!(opts.title_property, "og:title");
    }

    #[test]
    fn builder_overrides() {
        let builder = OptionsBuilder::new()
            .converters(vec![convert_blockquote])
            .converter(convert_blockquote)
            .collision(CollisionPolicy::KeepFirst)
            .error_marker("div.error")
            .placeholder_marker("div.locked")
            .title_property("twitter:title")
            .build();

        let opts = builder.options();
        assert_eq!(opts.converters.len(), 2);
        assert_eq!(opts.collision, CollisionPolicy::KeepFirst);
        assert_eq!(opts.error_marker, "div.error");
        assert_eq!(opts.placeholder_marker, "div.locked");
        assert_eq!(opts.title_property, "twitter:title");
    }

    #[test]
    fn collision_policy_display() {
        assert_eq!(CollisionPolicy::KeepLast.to_string(), "keep-last");
        assert_eq!(CollisionPolicy::KeepFirst.to_string(), "keep-first");
    }
}
