// ABOUTME: Decodes raw page bytes to a String using a declared charset or chardetng detection.
// ABOUTME: Scraped article pages are frequently windows-1251 rather than UTF-8.

use encoding_rs::Encoding;
use tracing::debug;

/// Decode page bytes using the charset from a Content-Type value or label,
/// falling back to detection.
pub fn decode_html_bytes(body: &[u8], content_type: Option<&str>) -> String {
    if let Some(ct) = content_type {
        let label = extract_charset(ct).unwrap_or_else(|| ct.trim().to_lowercase());
        if let Some(encoding) = Encoding::for_label(label.as_bytes()) {
            let (decoded, _, _) = encoding.decode(body);
            return decoded.into_owned();
        }
        debug!(label = %label, "unknown charset, detecting");
    }

    let mut detector = chardetng::EncodingDetector::new();
    detector.feed(body, true);
    let encoding = detector.guess(None, true);
    debug!(encoding = encoding.name(), "detected charset");
    let (decoded, _, _) = encoding.decode(body);
    decoded.into_owned()
}

/// Extract charset value from Content-Type header.
fn extract_charset(content_type: &str) -> Option<String> {
    let lower = content_type.to_lowercase();
    for part in lower.split(';') {
        let trimmed = part.trim();
        if let Some(charset) = trimmed.strip_prefix("charset=") {
            let charset = charset.trim_matches('"').trim_matches('\'');
            return Some(charset.to_string());
        }
    }
    None
}
