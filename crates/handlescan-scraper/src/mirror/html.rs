//! Small regex-based HTML helpers shared by the mirror parsers.

use std::sync::LazyLock;

use regex::Regex;

static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<[^>]+>").expect("valid tags regex"));

static NUMERIC_ENTITY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&#(x[0-9a-fA-F]+|\d+);").expect("valid entity regex"));

static CLASS_ATTR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"class="([^"]*)""#).expect("valid class regex"));

static HREF_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<a\s[^>]*href\s*=\s*["']([^"']+)["']"#).expect("valid href regex")
});

/// Strips tags, decodes entities and collapses whitespace.
pub(crate) fn clean_text(input: &str) -> String {
    let no_tags = TAG_RE.replace_all(input, " ");
    decode_entities(&no_tags)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Decodes the named entities the mirrors emit plus numeric references.
pub(crate) fn decode_entities(input: &str) -> String {
    let numeric = NUMERIC_ENTITY_RE.replace_all(input, |cap: &regex::Captures<'_>| {
        let code = &cap[1];
        let value = code
            .strip_prefix('x')
            .map_or_else(|| code.parse::<u32>().ok(), |hex| u32::from_str_radix(hex, 16).ok());
        value
            .and_then(char::from_u32)
            .map_or_else(|| cap[0].to_owned(), String::from)
    });
    numeric
        .replace("&nbsp;", " ")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

/// Every `<a href>` value in `html`, entity-decoded.
pub(crate) fn extract_hrefs(html: &str) -> Vec<String> {
    HREF_RE
        .captures_iter(html)
        .filter_map(|cap| cap.get(1))
        .map(|m| decode_entities(m.as_str()))
        .collect()
}

/// Resolves a root-relative `href` against `origin`.
pub(crate) fn absolutize(href: &str, origin: &str) -> String {
    if href.starts_with("http://") || href.starts_with("https://") {
        href.to_owned()
    } else if let Some(rest) = href.strip_prefix("//") {
        format!("https://{rest}")
    } else if href.starts_with('/') {
        format!("{}{href}", origin.trim_end_matches('/'))
    } else {
        format!("{}/{href}", origin.trim_end_matches('/'))
    }
}

/// The inner HTML of the first element whose opening tag carries `class`,
/// up to the first closing `</tag>`. Only suitable for elements that do not
/// nest their own tag name.
pub(crate) fn inner_of_class<'a>(html: &'a str, tag: &str, class: &str) -> Option<&'a str> {
    let needle = format!("class=\"{class}");
    let at = html.find(&needle)?;
    let open_end = at + html[at..].find('>')? + 1;
    let close = format!("</{tag}>");
    let len = html[open_end..].find(&close)?;
    Some(&html[open_end..open_end + len])
}

/// `true` when some element in `html` carries `class` as one of its classes.
pub(crate) fn has_class(html: &str, class: &str) -> bool {
    CLASS_ATTR_RE
        .captures_iter(html)
        .any(|cap| cap[1].split_whitespace().any(|c| c == class))
}
