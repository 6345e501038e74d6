//! "Show more" cursor pagination on timeline mirrors.
//!
//! Timeline mirrors render the next page as a link inside a `show-more`
//! block carrying a `cursor` query parameter:
//!
//! ```text
//! <div class="show-more"><a href="?cursor=DAABCgAB...">Load more</a></div>
//! ```
//!
//! The top-of-timeline "Load newest" block uses the same class without a
//! cursor and is skipped.

use std::sync::LazyLock;

use regex::Regex;

use super::html::decode_entities;

static SHOW_MORE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)class="show-more[^"]*"[^>]*>\s*<a\s[^>]*href="([^"]*)""#)
        .expect("valid show-more regex")
});

/// The cursor for the next timeline page, if the page offers one.
#[must_use]
pub fn extract_next_cursor(html: &str) -> Option<String> {
    SHOW_MORE_RE
        .captures_iter(html)
        .filter_map(|cap| cap.get(1))
        .find_map(|m| extract_query_param(&decode_entities(m.as_str()), "cursor"))
}

/// The URL of the page after `current_url` for `cursor`.
///
/// The cursor is appended as rendered; mirrors emit it already URL-safe.
#[must_use]
pub fn next_page_url(current_url: &str, cursor: &str) -> String {
    format!("{}?cursor={cursor}", super::origin::strip_query(current_url))
}

/// Extracts the value of a named query parameter from a URL or bare query.
///
/// Does not decode percent-encoded characters.
fn extract_query_param(url: &str, param: &str) -> Option<String> {
    let query_start = url.find('?')? + 1;
    let query = &url[query_start..];

    let needle = format!("{param}=");
    for pair in query.split('&') {
        if let Some(value) = pair.strip_prefix(needle.as_str()) {
            let value = value.split('#').next().unwrap_or(value);
            if !value.is_empty() {
                return Some(value.to_owned());
            }
        }
    }
    None
}
