//! URL origin and domain helpers for the mirror adapters.

/// Scheme + host (+ port) of `url`.
///
/// Given `"https://nitter.net/jack?cursor=abc"`, returns `"https://nitter.net"`.
#[must_use]
pub fn extract_origin(url: &str) -> String {
    reqwest::Url::parse(url).map_or_else(
        |e| {
            tracing::warn!(
                url,
                error = %e,
                "could not parse URL; falling back to string split for origin extraction"
            );
            url.trim_end_matches('/')
                .splitn(4, '/')
                .take(3)
                .collect::<Vec<_>>()
                .join("/")
        },
        |u| u.origin().ascii_serialization(),
    )
}

/// Host name of `url` for error messages. Falls back to the full string.
#[must_use]
pub fn extract_domain(url: &str) -> String {
    reqwest::Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_owned))
        .unwrap_or_else(|| url.to_owned())
}

/// `url` without its query string and fragment.
pub(crate) fn strip_query(url: &str) -> &str {
    let end = url.find(['?', '#']).unwrap_or(url.len());
    &url[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_drops_path_and_query() {
        assert_eq!(
            extract_origin("https://nitter.net/jack?cursor=abc"),
            "https://nitter.net"
        );
        assert_eq!(
            extract_origin("http://127.0.0.1:8080/jack"),
            "http://127.0.0.1:8080"
        );
    }

    #[test]
    fn origin_falls_back_on_unparsable_input() {
        assert_eq!(extract_origin("nitter.net/jack"), "nitter.net/jack");
    }

    #[test]
    fn domain_is_host_only() {
        assert_eq!(extract_domain("https://www.instagram.com/jack/"), "www.instagram.com");
        assert_eq!(extract_domain("not a url"), "not a url");
    }

    #[test]
    fn strip_query_keeps_path() {
        assert_eq!(strip_query("https://a.example/jack?cursor=1#m"), "https://a.example/jack");
        assert_eq!(strip_query("https://a.example/jack"), "https://a.example/jack");
    }
}
