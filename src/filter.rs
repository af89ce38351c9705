use serde::{Deserialize, Serialize};
use url::Url;

/// Toggles applied while enumerating links on a page
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkFilter {
    /// Keep only links on the page's own host[:port] and under the page URL
    #[serde(default)]
    pub same_domain: bool,

    /// Keep only links whose anchor text is non-empty
    #[serde(default)]
    pub with_text_only: bool,
}

impl LinkFilter {
    /// Determine if a candidate link passes the filter
    pub fn accepts(&self, page_url: &str, href: &str, title: &str) -> bool {
        if self.same_domain && !same_domain(page_url, href, page_url) {
            return false;
        }
        if self.with_text_only && title.is_empty() {
            return false;
        }
        true
    }
}

/// Returns the host[:port] part of a URL
///
/// URLs that cannot be parsed, relative references included, have an empty
/// location. Two such URLs therefore compare equal in [`same_domain`].
pub fn network_location(url: &str) -> String {
    let Ok(parsed) = Url::parse(url) else {
        return String::new();
    };

    match (parsed.host_str(), parsed.port()) {
        (Some(host), Some(port)) => format!("{host}:{port}"),
        (Some(host), None) => host.to_string(),
        (None, _) => String::new(),
    }
}

/// Checks that `url_b` shares the network location of `url_a` and, when
/// `base_url` is non-empty, starts with `base_url` literally.
pub fn same_domain(url_a: &str, url_b: &str, base_url: &str) -> bool {
    let same_location = network_location(url_a) == network_location(url_b);
    let under_base = base_url.is_empty() || url_b.starts_with(base_url);
    same_location && under_base
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_url_is_same_domain() {
        for url in [
            "http://a.com/x",
            "https://example.com:8443/docs?q=1",
            "https://user@example.org/",
        ] {
            assert!(same_domain(url, url, ""), "{url} should match itself");
        }
    }

    #[test]
    fn test_different_hosts() {
        assert!(!same_domain("http://a.com/x", "http://b.com/x", ""));
        assert!(!same_domain("http://a.com/x", "http://a.com:8080/x", ""));
    }

    #[test]
    fn test_base_prefix() {
        assert!(!same_domain(
            "http://a.com/x",
            "http://a.com/y",
            "http://a.com/z"
        ));
        assert!(same_domain(
            "http://a.com/x",
            "http://a.com/base/y",
            "http://a.com/base"
        ));
    }

    #[test]
    fn test_network_location() {
        assert_eq!(network_location("https://example.com/page"), "example.com");
        assert_eq!(network_location("http://example.com:8080/"), "example.com:8080");
        // Default ports are dropped by the URL parser
        assert_eq!(network_location("https://example.com:443/"), "example.com");
        assert_eq!(network_location("/relative/path"), "");
        assert_eq!(network_location("not a url"), "");
    }

    #[test]
    fn test_unparseable_urls_compare_equal() {
        // Known looseness: both locations are empty
        assert!(same_domain("/a", "garbage", ""));
        assert!(!same_domain("https://a.com/", "/a", ""));
    }

    #[test]
    fn test_link_filter() {
        let page = "https://example.com/blog/";

        let filter = LinkFilter::default();
        assert!(filter.accepts(page, "https://other.com/", ""));

        let filter = LinkFilter {
            same_domain: true,
            with_text_only: false,
        };
        assert!(filter.accepts(page, "https://example.com/blog/post-1", ""));
        assert!(!filter.accepts(page, "https://example.com/about", "About"));
        assert!(!filter.accepts(page, "https://other.com/blog/", "Other"));

        let filter = LinkFilter {
            same_domain: false,
            with_text_only: true,
        };
        assert!(filter.accepts(page, "/a", "A"));
        assert!(!filter.accepts(page, "/c", ""));
    }
}
