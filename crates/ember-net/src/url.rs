//! URL splitting for the fetcher.
//!
//! Only the scheme prefix, host, and path are recognised. There is no
//! port, query, or fragment handling: everything after the first `/`
//! is sent to the server as the request path.

use std::fmt;

/// Transport scheme of a fetchable URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheme {
    Http,
    Https,
}

impl Scheme {
    pub fn default_port(self) -> u16 {
        match self {
            Scheme::Http => 80,
            Scheme::Https => 443,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Scheme::Http => "http",
            Scheme::Https => "https",
        }
    }
}

/// A URL split into the pieces the request line needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedUrl {
    pub scheme: Scheme,
    pub host: String,
    pub path: String,
}

impl ParsedUrl {
    /// Split `url`. A missing or unknown scheme prefix means `https`,
    /// and the whole string is treated as `host/path`.
    pub fn parse(url: &str) -> Self {
        let (scheme, rest) = if let Some(rest) = url.strip_prefix("https://") {
            (Scheme::Https, rest)
        } else if let Some(rest) = url.strip_prefix("http://") {
            (Scheme::Http, rest)
        } else {
            (Scheme::Https, url)
        };

        let (host, path) = match rest.split_once('/') {
            Some((host, path)) => (host.to_string(), format!("/{path}")),
            None => (rest.to_string(), "/".to_string()),
        };

        Self { scheme, host, path }
    }

    pub fn port(&self) -> u16 {
        self.scheme.default_port()
    }

    /// Resolve a link target found on this page to an absolute URL.
    ///
    /// Targets with their own scheme are returned unchanged. No `..`
    /// collapsing is done; the server sees the joined path as is.
    pub fn join(&self, href: &str) -> String {
        if has_scheme(href) {
            return href.to_string();
        }

        let scheme = self.scheme.as_str();
        if let Some(rest) = href.strip_prefix("//") {
            return format!("{scheme}://{rest}");
        }
        if href.starts_with('/') {
            return format!("{scheme}://{}{href}", self.host);
        }

        let path = self.path.split(['?', '#']).next().unwrap_or("/");
        if href.starts_with('?') || href.starts_with('#') {
            return format!("{scheme}://{}{path}{href}", self.host);
        }
        let dir = path.rfind('/').map_or("/", |i| &path[..=i]);
        format!("{scheme}://{}{dir}{href}", self.host)
    }
}

/// `href` starts with `scheme:`, where the scheme is an ASCII letter
/// followed by letters, digits, `+`, `-` or `.`. A colon later in a
/// path or query does not count.
fn has_scheme(href: &str) -> bool {
    let Some((scheme, _)) = href.split_once(':') else {
        return false;
    };
    let mut chars = scheme.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

impl fmt::Display for ParsedUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}{}", self.scheme.as_str(), self.host, self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn https_with_path() {
        let u = ParsedUrl::parse("https://example.com/a/b.html");
        assert_eq!(u.scheme, Scheme::Https);
        assert_eq!(u.host, "example.com");
        assert_eq!(u.path, "/a/b.html");
        assert_eq!(u.port(), 443);
    }

    #[test]
    fn http_without_path_gets_root() {
        let u = ParsedUrl::parse("http://example.com");
        assert_eq!(u.scheme, Scheme::Http);
        assert_eq!(u.host, "example.com");
        assert_eq!(u.path, "/");
        assert_eq!(u.port(), 80);
    }

    #[test]
    fn trailing_slash_is_root() {
        assert_eq!(ParsedUrl::parse("http://example.com/").path, "/");
    }

    #[test]
    fn missing_scheme_defaults_to_https() {
        let u = ParsedUrl::parse("example.org/index.html");
        assert_eq!(u.scheme, Scheme::Https);
        assert_eq!(u.host, "example.org");
        assert_eq!(u.path, "/index.html");
    }

    #[test]
    fn unknown_scheme_is_part_of_host() {
        // Not a recognised prefix, so the text before the first `/`
        // becomes the host verbatim.
        let u = ParsedUrl::parse("ftp://files.test/x");
        assert_eq!(u.scheme, Scheme::Https);
        assert_eq!(u.host, "ftp:");
        assert_eq!(u.path, "//files.test/x");
    }

    #[test]
    fn query_stays_in_path() {
        let u = ParsedUrl::parse("https://www.google.com/search?q=rust+lang");
        assert_eq!(u.path, "/search?q=rust+lang");
    }

    #[test]
    fn join_absolute_and_scheme_relative() {
        let base = ParsedUrl::parse("http://a.test/dir/page.html");
        assert_eq!(base.join("https://b.test/x"), "https://b.test/x");
        assert_eq!(base.join("home://"), "home://");
        assert_eq!(base.join("//cdn.test/lib"), "http://cdn.test/lib");
    }

    #[test]
    fn join_root_and_document_relative() {
        let base = ParsedUrl::parse("https://a.test/dir/page.html?q=1/2");
        assert_eq!(base.join("/about"), "https://a.test/about");
        assert_eq!(base.join("other.html"), "https://a.test/dir/other.html");
        assert_eq!(base.join("?q=3"), "https://a.test/dir/page.html?q=3");
        assert_eq!(base.join("#top"), "https://a.test/dir/page.html#top");
        assert_eq!(base.join("search?q=a:b"), "https://a.test/dir/search?q=a:b");
        assert_eq!(base.join("item?t=10:30"), "https://a.test/dir/item?t=10:30");
        assert_eq!(base.join("/clock/12:00"), "https://a.test/clock/12:00");
    }

    #[test]
    fn only_scheme_shaped_prefixes_are_absolute() {
        let base = ParsedUrl::parse("https://a.test/");
        assert_eq!(base.join("mailto:me@a.test"), "mailto:me@a.test");
        assert_eq!(base.join("view-source+x.1:y"), "view-source+x.1:y");
        assert_eq!(base.join("1abc:x"), "https://a.test/1abc:x");
        assert_eq!(base.join(":x"), "https://a.test/:x");
        assert_eq!(base.join("#a:b"), "https://a.test/#a:b");
    }

    #[test]
    fn join_from_root_page() {
        let base = ParsedUrl::parse("https://a.test");
        assert_eq!(base.join("x.html"), "https://a.test/x.html");
    }

    #[test]
    fn display_round_trips_normal_urls() {
        let u = ParsedUrl::parse("http://example.com/x");
        assert_eq!(u.to_string(), "http://example.com/x");
    }
}
