// ABOUTME: Telegraph markup policy: the allowed tag vocabulary and per-tag disallowed attributes.
// ABOUTME: Changing these tables changes what the publishing platform accepts.

use std::collections::HashMap;

use once_cell::sync::Lazy;

/// Tags the publishing platform accepts.
pub const ALLOWED_TAGS: &[&str] = &[
    "a", "aside", "b", "blockquote", "br", "code", "em", "figcaption", "figure", "h3", "h4", "hr",
    "i", "iframe", "img", "li", "ol", "p", "pre", "s", "strong", "u", "ul", "video",
];

/// Elements dropped together with their content.
pub const DROPPED_TAGS: &[&str] = &["script", "style", "noscript", "template", "head"];

/// Attributes removed from tags without their own entry.
const DEFAULT_DISALLOWED: &[&str] = &["class", "style", "align"];

/// Attributes removed per tag type.
const DISALLOWED_BY_TAG: &[(&str, &[&str])] = &[("blockquote", &["class"])];

static DISALLOWED: Lazy<HashMap<&'static str, &'static [&'static str]>> =
    Lazy::new(|| DISALLOWED_BY_TAG.iter().copied().collect());

/// Attribute filtering rule for one tag type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributePolicy {
    tag: &'static str,
    disallowed: &'static [&'static str],
}

impl AttributePolicy {
    /// The policy for `tag`, falling back to the default set.
    pub fn for_tag(tag: &str) -> Self {
        match DISALLOWED.get_key_value(tag) {
            Some((name, disallowed)) => Self {
                tag: *name,
                disallowed: *disallowed,
            },
            None => Self {
                tag: "*",
                disallowed: DEFAULT_DISALLOWED,
            },
        }
    }

    /// Returns true if the attribute may be kept.
    pub fn allows(&self, attr: &str) -> bool {
        let attr = attr.to_ascii_lowercase();
        !self.disallowed.contains(&attr.as_str())
    }

    /// Keep only allowed attributes, preserving their order.
    pub fn filter<'a, I>(&self, attrs: I) -> Vec<(String, String)>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        attrs
            .into_iter()
            .filter(|(k, _)| self.allows(k))
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    pub fn tag(&self) -> &'static str {
        self.tag
    }
}

/// Returns true if the platform accepts `tag`.
pub fn is_allowed_tag(tag: &str) -> bool {
    ALLOWED_TAGS.contains(&tag)
}

/// Returns true if `tag` and its content never reach the output.
pub fn is_dropped_tag(tag: &str) -> bool {
    DROPPED_TAGS.contains(&tag)
}
