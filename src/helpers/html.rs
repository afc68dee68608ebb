//! HTML and XML text helpers

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref TAG: Regex = Regex::new(r"<[^>]*>").unwrap();
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
}

/// Escape HTML special characters
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Escape XML special characters
pub fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// Strip HTML tags and collapse whitespace
pub fn strip_html(s: &str) -> String {
    let text = TAG.replace_all(s, " ");
    WHITESPACE.replace_all(text.trim(), " ").into_owned()
}

/// Truncate to `length` characters, appending `omission` when cut
pub fn truncate(s: &str, length: usize, omission: &str) -> String {
    if s.chars().count() <= length {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(length).collect();
        format!("{}{}", truncated.trim_end(), omission)
    }
}

/// Point root-relative `href`/`src` attributes at `base_url`
pub fn absolutize_urls(content: &str, base_url: &str) -> String {
    content
        .replace("href=\"/", &format!("href=\"{}/", base_url))
        .replace("src=\"/", &format!("src=\"{}/", base_url))
        .replace("href='/", &format!("href='{}/", base_url))
        .replace("src='/", &format!("src='{}/", base_url))
}

/// Strip characters XML 1.0 does not allow
pub fn strip_invalid_xml_chars(s: &str) -> String {
    s.chars()
        .filter(|&c| {
            matches!(c, '\t' | '\n' | '\r')
                || ('\u{0020}'..='\u{D7FF}').contains(&c)
                || ('\u{E000}'..='\u{FFFD}').contains(&c)
                || ('\u{10000}'..='\u{10FFFF}').contains(&c)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_html() {
        assert_eq!(strip_html("<p>Hello <b>World</b></p>"), "Hello World");
        assert_eq!(strip_html("<p>One</p>\n<p>Two</p>"), "One Two");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Hello World", 5, "..."), "Hello...");
        assert_eq!(truncate("Hi", 10, "..."), "Hi");
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape_html("<a & 'b'>"), "&lt;a &amp; &#39;b&#39;&gt;");
        assert_eq!(escape_xml("Tom & \"Jerry\""), "Tom &amp; &quot;Jerry&quot;");
    }

    #[test]
    fn test_absolutize_urls() {
        let html = r#"<img src="/img/a.png"><a href="https://x.com">x</a>"#;
        assert_eq!(
            absolutize_urls(html, "https://example.com"),
            r#"<img src="https://example.com/img/a.png"><a href="https://x.com">x</a>"#
        );
    }

    #[test]
    fn test_strip_invalid_xml_chars() {
        assert_eq!(strip_invalid_xml_chars("a\u{0008}b\n"), "ab\n");
    }
}
