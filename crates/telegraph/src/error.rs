// ABOUTME: Error types for the Telegraph publishing pipeline.
// ABOUTME: PublishingError wraps HtmlParseError (document preconditions) and ConvertTagError (per-tag failures).

use thiserror::Error;

/// A source document failed a structural precondition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to parse HTML document: {message}")]
pub struct HtmlParseError {
    pub message: String,
}

impl HtmlParseError {
    /// Creates an error with the given detail message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The service reported an error page instead of an article.
    pub fn service_error(detail: impl Into<String>) -> Self {
        Self::new(detail)
    }

    /// The article is hidden behind a restricted-content placeholder.
    pub fn restricted(detail: impl Into<String>) -> Self {
        Self::new(detail)
    }

    /// No usable title meta tag. `first_meta` is the first meta tag found, if any.
    pub fn title_not_found(first_meta: Option<&str>) -> Self {
        Self::new(format!(
            "article title tag not found. Tag {}",
            first_meta.unwrap_or("None")
        ))
    }

    /// The document has no body element.
    pub fn body_not_found() -> Self {
        Self::new("article body tag not found")
    }

    /// A configured selector could not be compiled.
    pub fn invalid_selector(selector: &str) -> Self {
        Self::new(format!("invalid selector '{}'", selector))
    }
}

/// A single tag failed to convert.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to convert tag '{tag_name}' at line {line}")]
pub struct ConvertTagError {
    pub tag_name: String,
    pub line: usize,
}

impl ConvertTagError {
    pub fn new(tag_name: impl Into<String>, line: usize) -> Self {
        Self {
            tag_name: tag_name.into(),
            line,
        }
    }
}

/// Any failure of the publishing pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PublishingError {
    #[error(transparent)]
    HtmlParse(#[from] HtmlParseError),

    #[error(transparent)]
    ConvertTag(#[from] ConvertTagError),
}

impl PublishingError {
    /// Returns true if the source document failed a precondition.
    pub fn is_html_parse(&self) -> bool {
        matches!(self, PublishingError::HtmlParse(_))
    }

    /// Returns true if a single tag failed to convert.
    pub fn is_convert_tag(&self) -> bool {
        matches!(self, PublishingError::ConvertTag(_))
    }
}
