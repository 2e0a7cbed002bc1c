// ABOUTME: Page value holding a converted article's title and body markup.
// ABOUTME: The publish URL and path stay unset until an external publishing step records them.

use serde::Serialize;

use crate::tag::OutputDocument;

/// A publishable article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page {
    title: String,
    html: OutputDocument,
    url: Option<String>,
    path: Option<String>,
}

impl Page {
    /// A page that has not been published yet.
    pub fn new(title: impl Into<String>, html: OutputDocument) -> Self {
        Self {
            title: title.into(),
            html,
            url: None,
            path: None,
        }
    }

    /// Record where the page was published.
    pub fn with_location(self, url: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            path: Some(path.into()),
            ..self
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn html(&self) -> &OutputDocument {
        &self.html
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// Returns true once a publish location has been recorded.
    pub fn is_published(&self) -> bool {
        self.url.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tag::Element;

    fn sample() -> Page {
        let mut doc = OutputDocument::new();
        let mut p = Element::new("p");
        p.push_text("body");
        doc.append(p);
        Page::new("Title", doc)
    }

    #[test]
    fn new_page_is_unpublished() {
        let page = sample();
        assert_eq!(page.title(), "Title");
        assert_eq!(page.html().to_html(), "<p>body</p>");
        assert_eq!(page.url(), None);
        assert_eq!(page.path(), None);
        assert!(!page.is_published());
    }

    #[test]
    fn with_location_records_url_and_path() {
        let page = sample().with_location("https://telegra.ph/Title-10-17", "Title-10-17");
        assert!(page.is_published());
        assert_eq!(page.url(), Some("https://telegra.ph/Title-10-17"));
        assert_eq!(page.path(), Some("Title-10-17"));
        assert_eq!(page.title(), "Title");
    }

    #[test]
    fn serializes_html_as_markup() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "title": "Title",
                "html": "<p>body</p>",
                "url": null,
                "path": null
            })
        );
    }
}
