//! URL helper functions

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

use crate::config::SiteConfig;

/// Characters escaped inside a single path segment
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'&')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}')
    .add(b'%');

/// Generate a URL with the root path
///
/// # Examples
/// ```ignore
/// url_for(&config, "/css/style.css") // -> "/portfolio/css/style.css"
/// ```
pub fn url_for(config: &SiteConfig, path: &str) -> String {
    let root = config.root.trim_end_matches('/');
    let path = path.trim_start_matches('/');

    if path.is_empty() {
        format!("{}/", root)
    } else {
        format!("{}/{}", root, path)
    }
}

/// Generate a full URL including the domain
///
/// # Examples
/// ```ignore
/// full_url_for(&config, "/blog/") // -> "https://example.com/portfolio/blog/"
/// ```
pub fn full_url_for(config: &SiteConfig, path: &str) -> String {
    format!("{}{}", config.url.trim_end_matches('/'), url_for(config, path))
}

/// Whether a reference points off-site
pub fn is_external_url(path: &str) -> bool {
    path.starts_with("http://") || path.starts_with("https://") || path.starts_with("//")
}

/// Resolve `relative` against the directory `base`, folding `.` and `..`
///
/// # Examples
/// ```ignore
/// join_url_path("blog/trip", "../img/a.png") // -> "blog/img/a.png"
/// ```
pub fn join_url_path(base: &str, relative: &str) -> String {
    let mut parts: Vec<&str> = base.split('/').filter(|p| !p.is_empty()).collect();

    for part in relative.split('/') {
        match part {
            "" | "." => {}
            ".." => {
                parts.pop();
            }
            other => parts.push(other),
        }
    }

    parts.join("/")
}

/// Percent-encode each segment of a path, keeping the separators
pub fn encode_path(path: &str) -> String {
    path.split('/')
        .map(|segment| utf8_percent_encode(segment, SEGMENT).to_string())
        .collect::<Vec<_>>()
        .join("/")
}

/// Whether a nav target is the current route, ignoring trailing slashes
pub fn is_current(current: &str, target: &str) -> bool {
    current.trim_end_matches('/') == target.trim_end_matches('/')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> SiteConfig {
        SiteConfig {
            url: "https://example.com".to_string(),
            root: "/portfolio/".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_url_for() {
        let config = test_config();
        assert_eq!(url_for(&config, "/css/style.css"), "/portfolio/css/style.css");
        assert_eq!(url_for(&config, "blog/"), "/portfolio/blog/");
        assert_eq!(url_for(&config, "/"), "/portfolio/");
        assert_eq!(url_for(&SiteConfig::default(), "/blog/"), "/blog/");
    }

    #[test]
    fn test_full_url_for() {
        let config = test_config();
        assert_eq!(
            full_url_for(&config, "/blog/"),
            "https://example.com/portfolio/blog/"
        );
    }

    #[test]
    fn test_join_url_path() {
        assert_eq!(join_url_path("blog/trip", "./a.png"), "blog/trip/a.png");
        assert_eq!(join_url_path("blog/trip", "../img/a.png"), "blog/img/a.png");
        assert_eq!(join_url_path("", "a.png"), "a.png");
        assert_eq!(join_url_path("a", "../../b.png"), "b.png");
    }

    #[test]
    fn test_encode_path() {
        assert_eq!(encode_path("img/my photo#1.png"), "img/my%20photo%231.png");
        assert_eq!(encode_path("plain/path.png"), "plain/path.png");
        assert_eq!(encode_path("/blog/tips&tricks/"), "/blog/tips%26tricks/");
    }

    #[test]
    fn test_is_current() {
        assert!(is_current("/blog/", "/blog"));
        assert!(is_current("/", "/"));
        assert!(!is_current("/blog/hello/", "/blog/"));
        assert!(!is_current("/blog/", "/"));
    }
}
