//! URL extraction from free-text notes.

use once_cell::sync::Lazy;
use regex::Regex;

static URL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)https?://[^\s<>"`{}|\\^\[\]]*[^\s<>"`{}|\\^\[\].,;:!?()]"#)
        .expect("valid url regex")
});

/// Returns http(s) URLs found in `text`, in order of appearance.
///
/// Trailing sentence punctuation is not considered part of a URL.
pub fn extract_links(text: &str) -> Vec<&str> {
    URL_RE.find_iter(text).map(|m| m.as_str()).collect()
}
